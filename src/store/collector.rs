use serde::Serialize;

use crate::error::SyncError;
use crate::store::records::{Answer, Coach, Feedback, ImageRecord, Session, SyncStatus, Teacher};
use crate::store::LocalStore;
use crate::sync::batch::PendingChanges;

/// Read-only view over the store that selects records not yet marked synced.
///
/// The six entity types are queried independently, in the fixed order the
/// outbound payload expects: images, coaches, teachers, sessions, answers,
/// feedbacks.
pub struct ChangeCollector<'a> {
    store: &'a LocalStore,
}

impl<'a> ChangeCollector<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    pub fn collect(&self) -> Result<PendingChanges, SyncError> {
        Ok(PendingChanges {
            images: self.pending_images()?,
            coaches: self.pending_coaches()?,
            teachers: self.pending_teachers()?,
            sessions: self.pending_sessions()?,
            answers: self.pending_answers()?,
            feedbacks: self.pending_feedbacks()?,
        })
    }

    pub fn pending_images(&self) -> Result<Vec<ImageRecord>, SyncError> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, name, value, _status FROM image
             WHERE _status != 'synced' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    value: row.get(2)?,
                    status: SyncStatus::parse(&row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn pending_coaches(&self) -> Result<Vec<Coach>, SyncError> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, name, surname, email, school_id, created_at, _status FROM coach
             WHERE _status != 'synced' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Coach {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    surname: row.get(2)?,
                    email: row.get(3)?,
                    school_id: row.get(4)?,
                    created_at: row.get(5)?,
                    status: SyncStatus::parse(&row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn pending_teachers(&self) -> Result<Vec<Teacher>, SyncError> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, name, surname, subject, school_id, created_at, _status FROM teacher
             WHERE _status != 'synced' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Teacher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    surname: row.get(2)?,
                    subject: row.get(3)?,
                    school_id: row.get(4)?,
                    created_at: row.get(5)?,
                    status: SyncStatus::parse(&row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn pending_sessions(&self) -> Result<Vec<Session>, SyncError> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, coach_id, teacher_id, subject, objective, started_at, _status FROM session
             WHERE _status != 'synced' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Session {
                    id: row.get(0)?,
                    coach_id: row.get(1)?,
                    teacher_id: row.get(2)?,
                    subject: row.get(3)?,
                    objective: row.get(4)?,
                    started_at: row.get(5)?,
                    status: SyncStatus::parse(&row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn pending_answers(&self) -> Result<Vec<Answer>, SyncError> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, session_id, question_id, value, _status FROM answer
             WHERE _status != 'synced' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Answer {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    question_id: row.get(2)?,
                    value: row.get(3)?,
                    status: SyncStatus::parse(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn pending_feedbacks(&self) -> Result<Vec<Feedback>, SyncError> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, session_id, competence_id, notes, created_at, _status FROM feedback
             WHERE _status != 'synced' ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Feedback {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    competence_id: row.get(2)?,
                    notes: row.get(3)?,
                    created_at: row.get(4)?,
                    status: SyncStatus::parse(&row.get::<_, String>(5)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Diagnostic counts for the three tables the home screen surfaces.
    /// Three independent scalar subqueries; no transactional relationship.
    pub fn unsynced_counts(&self) -> Result<UnsyncedCounts, SyncError> {
        let counts = self.store.conn().query_row(
            "SELECT
                (SELECT COUNT(*) FROM teacher WHERE _status != 'synced'),
                (SELECT COUNT(*) FROM feedback WHERE _status != 'synced'),
                (SELECT COUNT(*) FROM session WHERE _status != 'synced')",
            [],
            |row| {
                Ok(UnsyncedCounts {
                    pending_teachers: row.get(0)?,
                    pending_feedbacks: row.get(1)?,
                    pending_sessions: row.get(2)?,
                })
            },
        )?;
        Ok(counts)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsyncedCounts {
    pub pending_teachers: i64,
    pub pending_feedbacks: i64,
    pub pending_sessions: i64,
}
