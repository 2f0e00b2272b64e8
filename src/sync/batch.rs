use serde::Serialize;

use crate::device::Geolocation;
use crate::store::records::{
    Answer, Coach, EntityKind, Feedback, ImageRecord, Session, Teacher,
};

/// All records awaiting transmission, one list per entity type.
///
/// Field order is the outbound payload shape; it carries no semantic weight
/// but must stay stable for compatibility with the server.
#[derive(Debug, Default, Serialize)]
pub struct PendingChanges {
    pub images: Vec<ImageRecord>,
    pub coaches: Vec<Coach>,
    pub teachers: Vec<Teacher>,
    pub sessions: Vec<Session>,
    pub answers: Vec<Answer>,
    pub feedbacks: Vec<Feedback>,
}

impl PendingChanges {
    pub fn total(&self) -> usize {
        self.images.len()
            + self.coaches.len()
            + self.teachers.len()
            + self.sessions.len()
            + self.answers.len()
            + self.feedbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Snapshot of the collected identities, used for the conditional
    /// mark-synced step after the server acknowledges the batch. Kinds with
    /// nothing collected are omitted.
    pub fn collected_ids(&self) -> Vec<(EntityKind, Vec<String>)> {
        let mut out = Vec::new();
        let mut push = |kind: EntityKind, ids: Vec<String>| {
            if !ids.is_empty() {
                out.push((kind, ids));
            }
        };
        push(
            EntityKind::Image,
            self.images.iter().map(|r| r.id.clone()).collect(),
        );
        push(
            EntityKind::Coach,
            self.coaches.iter().map(|r| r.id.clone()).collect(),
        );
        push(
            EntityKind::Teacher,
            self.teachers.iter().map(|r| r.id.clone()).collect(),
        );
        push(
            EntityKind::Session,
            self.sessions.iter().map(|r| r.id.clone()).collect(),
        );
        push(
            EntityKind::Answer,
            self.answers.iter().map(|r| r.id.clone()).collect(),
        );
        push(
            EntityKind::Feedback,
            self.feedbacks.iter().map(|r| r.id.clone()).collect(),
        );
        out
    }
}

/// One transmission's worth of state: the pending changes plus the device
/// context they were recorded on. Built fresh per attempt, never persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBatch {
    pub changes: PendingChanges,
    pub model: String,
    pub api_level: i64,
    pub device_id: String,
    #[serde(flatten)]
    pub location: Option<Geolocation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(location: Option<Geolocation>) -> SyncBatch {
        SyncBatch {
            changes: PendingChanges::default(),
            model: "linux-x86_64".to_string(),
            api_level: 34,
            device_id: "dev-1".to_string(),
            location,
        }
    }

    #[test]
    fn changes_serialize_in_fixed_entity_order() {
        let json = serde_json::to_string(&batch(None)).unwrap();
        let positions: Vec<usize> = [
            "\"images\"",
            "\"coaches\"",
            "\"teachers\"",
            "\"sessions\"",
            "\"answers\"",
            "\"feedbacks\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn device_fields_use_camel_case() {
        let value = serde_json::to_value(batch(None)).unwrap();
        assert_eq!(value["model"], "linux-x86_64");
        assert_eq!(value["apiLevel"], 34);
        assert_eq!(value["deviceId"], "dev-1");
    }

    #[test]
    fn location_flattens_when_present_and_vanishes_when_absent() {
        let with = serde_json::to_value(batch(Some(Geolocation {
            latitude: 8.46,
            longitude: -13.23,
        })))
        .unwrap();
        assert_eq!(with["latitude"], 8.46);
        assert_eq!(with["longitude"], -13.23);

        let without = serde_json::to_value(batch(None)).unwrap();
        assert!(without.get("latitude").is_none());
        assert!(without.get("longitude").is_none());
    }

    #[test]
    fn collected_ids_skip_empty_kinds() {
        let mut changes = PendingChanges::default();
        changes
            .sessions
            .push(crate::store::records::Session::new("c1", "t1"));
        let collected = changes.collected_ids();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].0, EntityKind::Session);
        assert_eq!(collected[0].1.len(), 1);
    }
}
