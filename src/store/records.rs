use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Synchronization state of a locally persisted record.
///
/// Stored as text; only the value `synced` is terminal. Anything else found
/// in the column (including values written by older app versions) reads as
/// `Pending` and gets picked up by the next sync attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
}

impl SyncStatus {
    pub fn parse(value: &str) -> Self {
        if value == "synced" {
            SyncStatus::Synced
        } else {
            SyncStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }
}

impl Serialize for SyncStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SyncStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SyncStatus::parse(&value))
    }
}

/// The six record types carried by a sync batch, in payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Image,
    Coach,
    Teacher,
    Session,
    Answer,
    Feedback,
}

impl EntityKind {
    /// Collection order, which is also the outbound payload shape.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Image,
        EntityKind::Coach,
        EntityKind::Teacher,
        EntityKind::Session,
        EntityKind::Answer,
        EntityKind::Feedback,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Image => "image",
            EntityKind::Coach => "coach",
            EntityKind::Teacher => "teacher",
            EntityKind::Session => "session",
            EntityKind::Answer => "answer",
            EntityKind::Feedback => "feedback",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_status", default)]
    pub status: SyncStatus,
}

impl Coach {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        school_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            surname: surname.into(),
            email: None,
            school_id: school_id.into(),
            created_at: Utc::now(),
            status: SyncStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub school_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_status", default)]
    pub status: SyncStatus,
}

impl Teacher {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        school_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            surname: surname.into(),
            subject: None,
            school_id: school_id.into(),
            created_at: Utc::now(),
            status: SyncStatus::Pending,
        }
    }
}

/// One class observation visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub coach_id: String,
    pub teacher_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "_status", default)]
    pub status: SyncStatus,
}

impl Session {
    pub fn new(coach_id: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coach_id: coach_id.into(),
            teacher_id: teacher_id.into(),
            subject: None,
            objective: None,
            started_at: Utc::now(),
            status: SyncStatus::Pending,
        }
    }
}

/// A single questionnaire answer recorded during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub session_id: String,
    pub question_id: i64,
    pub value: String,
    #[serde(rename = "_status", default)]
    pub status: SyncStatus,
}

impl Answer {
    pub fn new(session_id: impl Into<String>, question_id: i64, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            question_id,
            value: value.into(),
            status: SyncStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competence_id: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_status", default)]
    pub status: SyncStatus,
}

impl Feedback {
    pub fn new(session_id: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            competence_id: None,
            notes: notes.into(),
            created_at: Utc::now(),
            status: SyncStatus::Pending,
        }
    }
}

/// A captured photo, stored base64-encoded so the row is self-contained.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
    pub value: String,
    #[serde(rename = "_status", default)]
    pub status: SyncStatus,
}

impl ImageRecord {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            value: STANDARD.encode(bytes),
            status: SyncStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_synced_as_terminal() {
        assert_eq!(SyncStatus::parse("synced"), SyncStatus::Synced);
        assert_eq!(SyncStatus::parse("pending"), SyncStatus::Pending);
        assert_eq!(SyncStatus::parse(""), SyncStatus::Pending);
        assert_eq!(SyncStatus::parse("SYNCED"), SyncStatus::Pending);
        assert_eq!(SyncStatus::parse("garbage"), SyncStatus::Pending);
    }

    #[test]
    fn records_serialize_status_under_original_column_name() {
        let coach = Coach::new("Ada", "Kamara", "school-1");
        let value = serde_json::to_value(&coach).unwrap();
        assert_eq!(value["_status"], "pending");
        assert_eq!(value["schoolId"], "school-1");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn image_round_trips_base64_payload() {
        let image = ImageRecord::from_bytes("board.jpg", b"\x00\x01\x02");
        assert_eq!(image.value, "AAEC");
        assert!(!image.status.is_synced());
    }
}
