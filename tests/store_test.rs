use field_sync::store::records::{
    Answer, Coach, EntityKind, Feedback, ImageRecord, Session, SyncStatus, Teacher,
};
use field_sync::store::{ChangeCollector, LocalStore};
use tempfile::tempdir;

#[test]
fn store_survives_reopen() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("field.db");

    let store = LocalStore::open(&db).unwrap();
    let teacher = Teacher::new("Mariatu", "Sesay", "school-1");
    store.save_teacher(&teacher).unwrap();
    drop(store);

    let store = LocalStore::open(&db).unwrap();
    let pending = ChangeCollector::new(&store).pending_teachers().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, teacher.id);
    assert_eq!(pending[0].status, SyncStatus::Pending);
}

#[test]
fn collect_covers_all_six_entity_types() {
    let dir = tempdir().unwrap();
    let store = LocalStore::open(dir.path().join("field.db")).unwrap();

    let coach = Coach::new("Ada", "Kamara", "school-1");
    let teacher = Teacher::new("Mariatu", "Sesay", "school-1");
    let session = Session::new(&coach.id, &teacher.id);
    store.save_image(&ImageRecord::from_bytes("board.jpg", b"jpeg")).unwrap();
    store.save_coach(&coach).unwrap();
    store.save_teacher(&teacher).unwrap();
    store.save_session(&session).unwrap();
    store.save_answer(&Answer::new(&session.id, 4, "often")).unwrap();
    store
        .save_feedback(&Feedback::new(&session.id, "strong start to the lesson"))
        .unwrap();

    let changes = ChangeCollector::new(&store).collect().unwrap();
    assert_eq!(changes.images.len(), 1);
    assert_eq!(changes.coaches.len(), 1);
    assert_eq!(changes.teachers.len(), 1);
    assert_eq!(changes.sessions.len(), 1);
    assert_eq!(changes.answers.len(), 1);
    assert_eq!(changes.feedbacks.len(), 1);
    assert_eq!(changes.total(), 6);
}

#[test]
fn mark_synced_is_scoped_to_listed_ids() {
    let dir = tempdir().unwrap();
    let store = LocalStore::open(dir.path().join("field.db")).unwrap();

    let first = Teacher::new("Mariatu", "Sesay", "school-1");
    let second = Teacher::new("Ibrahim", "Conteh", "school-1");
    store.save_teacher(&first).unwrap();
    store.save_teacher(&second).unwrap();

    let updated = store
        .mark_synced(EntityKind::Teacher, &[first.id.clone()])
        .unwrap();
    assert_eq!(updated, 1);

    let pending = ChangeCollector::new(&store).pending_teachers().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);
}

#[test]
fn upsert_regresses_synced_record_to_pending() {
    let dir = tempdir().unwrap();
    let store = LocalStore::open(dir.path().join("field.db")).unwrap();

    let mut teacher = Teacher::new("Mariatu", "Sesay", "school-1");
    store.save_teacher(&teacher).unwrap();
    store
        .mark_synced(EntityKind::Teacher, &[teacher.id.clone()])
        .unwrap();
    assert!(ChangeCollector::new(&store)
        .pending_teachers()
        .unwrap()
        .is_empty());

    teacher.subject = Some("mathematics".to_string());
    store.save_teacher(&teacher).unwrap();

    let pending = ChangeCollector::new(&store).pending_teachers().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].subject.as_deref(), Some("mathematics"));
}

#[test]
fn unknown_status_values_read_as_dirty() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("field.db");
    let store = LocalStore::open(&db).unwrap();

    let teacher = Teacher::new("Mariatu", "Sesay", "school-1");
    store.save_teacher(&teacher).unwrap();

    // A legacy app version wrote a status value this one never produces.
    let raw = rusqlite::Connection::open(&db).unwrap();
    raw.execute("UPDATE teacher SET _status = 'queued'", []).unwrap();

    let collector = ChangeCollector::new(&store);
    let pending = collector.pending_teachers().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, SyncStatus::Pending);
    assert_eq!(collector.unsynced_counts().unwrap().pending_teachers, 1);
}

#[test]
fn unsynced_counts_tracks_three_tables() {
    let dir = tempdir().unwrap();
    let store = LocalStore::open(dir.path().join("field.db")).unwrap();

    store.save_teacher(&Teacher::new("A", "B", "school-1")).unwrap();
    store.save_teacher(&Teacher::new("C", "D", "school-1")).unwrap();
    store
        .save_feedback(&Feedback::new("session-1", "good pacing"))
        .unwrap();
    let retired = Session::new("c1", "t1");
    store.save_session(&retired).unwrap();
    store
        .mark_synced(EntityKind::Session, &[retired.id.clone()])
        .unwrap();
    store.save_session(&Session::new("c1", "t2")).unwrap();

    let counts = ChangeCollector::new(&store).unsynced_counts().unwrap();
    assert_eq!(counts.pending_teachers, 2);
    assert_eq!(counts.pending_feedbacks, 1);
    assert_eq!(counts.pending_sessions, 1);
}

#[test]
fn mark_synced_chunks_large_id_lists() {
    let dir = tempdir().unwrap();
    let store = LocalStore::open(dir.path().join("field.db")).unwrap();

    let mut ids = Vec::new();
    for i in 0..600 {
        let answer = Answer::new("session-1", i, "yes");
        ids.push(answer.id.clone());
        store.save_answer(&answer).unwrap();
    }

    let updated = store.mark_synced(EntityKind::Answer, &ids).unwrap();
    assert_eq!(updated, 600);
    assert!(ChangeCollector::new(&store)
        .pending_answers()
        .unwrap()
        .is_empty());
}
