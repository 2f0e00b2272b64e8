// ABOUTME: SQLite-backed local store for field records
// ABOUTME: Owns the connection, migrations, and synced-status transitions

pub mod collector;
pub mod records;

pub use collector::{ChangeCollector, UnsyncedCounts};

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::SyncError;
use records::{Answer, Coach, EntityKind, Feedback, ImageRecord, Session, Teacher};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS image (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    value       TEXT NOT NULL,
    _status     TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS coach (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    surname     TEXT NOT NULL,
    email       TEXT,
    school_id   TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    _status     TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS teacher (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    surname     TEXT NOT NULL,
    subject     TEXT,
    school_id   TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    _status     TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS session (
    id          TEXT PRIMARY KEY,
    coach_id    TEXT NOT NULL,
    teacher_id  TEXT NOT NULL,
    subject     TEXT,
    objective   TEXT,
    started_at  TEXT NOT NULL,
    _status     TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS answer (
    id          TEXT PRIMARY KEY,
    session_id  TEXT NOT NULL,
    question_id INTEGER NOT NULL,
    value       TEXT NOT NULL,
    _status     TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS feedback (
    id            TEXT PRIMARY KEY,
    session_id    TEXT NOT NULL,
    competence_id TEXT,
    notes         TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    _status       TEXT NOT NULL DEFAULT 'pending'
);
"#;

/// Stay under SQLite's bound-parameter limit when marking large id lists.
const MARK_SYNCED_CHUNK: usize = 500;

/// Table-per-entity SQLite storage shared by the recording UI (writer of
/// dirty records) and the sync engine (reader during collection, writer
/// during mark-synced).
pub struct LocalStore {
    path: PathBuf,
    conn: Connection,
}

impl LocalStore {
    /// Open (or create) the store. Safe to call repeatedly: parent
    /// directories are created as needed and migrations are `IF NOT EXISTS`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SyncError::StorageUnavailable(format!(
                    "failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", &"wal")?;
        conn.pragma_update(None, "synchronous", &"normal").ok();
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("local store ready at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // Upserts below force `_status` back to 'pending': creation and local
    // mutation both dirty the record. The sync engine never regresses a
    // status; these are the only writers that do.

    pub fn save_image(&self, image: &ImageRecord) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO image(id, name, value, _status) VALUES (?1, ?2, ?3, 'pending')
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, value = excluded.value, _status = 'pending'",
            params![image.id, image.name, image.value],
        )?;
        Ok(())
    }

    pub fn save_coach(&self, coach: &Coach) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO coach(id, name, surname, email, school_id, created_at, _status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending')
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, surname = excluded.surname, email = excluded.email,
                school_id = excluded.school_id, created_at = excluded.created_at,
                _status = 'pending'",
            params![
                coach.id,
                coach.name,
                coach.surname,
                coach.email,
                coach.school_id,
                coach.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn save_teacher(&self, teacher: &Teacher) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO teacher(id, name, surname, subject, school_id, created_at, _status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending')
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, surname = excluded.surname, subject = excluded.subject,
                school_id = excluded.school_id, created_at = excluded.created_at,
                _status = 'pending'",
            params![
                teacher.id,
                teacher.name,
                teacher.surname,
                teacher.subject,
                teacher.school_id,
                teacher.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn save_session(&self, session: &Session) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO session(id, coach_id, teacher_id, subject, objective, started_at, _status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending')
             ON CONFLICT(id) DO UPDATE SET
                coach_id = excluded.coach_id, teacher_id = excluded.teacher_id,
                subject = excluded.subject, objective = excluded.objective,
                started_at = excluded.started_at, _status = 'pending'",
            params![
                session.id,
                session.coach_id,
                session.teacher_id,
                session.subject,
                session.objective,
                session.started_at,
            ],
        )?;
        Ok(())
    }

    pub fn save_answer(&self, answer: &Answer) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO answer(id, session_id, question_id, value, _status)
             VALUES (?1, ?2, ?3, ?4, 'pending')
             ON CONFLICT(id) DO UPDATE SET
                session_id = excluded.session_id, question_id = excluded.question_id,
                value = excluded.value, _status = 'pending'",
            params![
                answer.id,
                answer.session_id,
                answer.question_id,
                answer.value,
            ],
        )?;
        Ok(())
    }

    pub fn save_feedback(&self, feedback: &Feedback) -> Result<(), SyncError> {
        self.conn.execute(
            "INSERT INTO feedback(id, session_id, competence_id, notes, created_at, _status)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending')
             ON CONFLICT(id) DO UPDATE SET
                session_id = excluded.session_id, competence_id = excluded.competence_id,
                notes = excluded.notes, created_at = excluded.created_at,
                _status = 'pending'",
            params![
                feedback.id,
                feedback.session_id,
                feedback.competence_id,
                feedback.notes,
                feedback.created_at,
            ],
        )?;
        Ok(())
    }

    /// Mark exactly the listed records synced.
    ///
    /// The update is restricted to identities collected at the start of the
    /// attempt, so a record dirtied after collection keeps its pending status
    /// and is re-sent by the next attempt.
    pub fn mark_synced(&self, kind: EntityKind, ids: &[String]) -> Result<usize, SyncError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut updated = 0;
        for chunk in ids.chunks(MARK_SYNCED_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "UPDATE {} SET _status = 'synced' WHERE id IN ({})",
                kind.table(),
                placeholders
            );
            updated += self
                .conn
                .execute(&sql, rusqlite::params_from_iter(chunk.iter()))?;
        }
        tracing::debug!("marked {} {} record(s) synced", updated, kind);
        Ok(updated)
    }
}
