// src/view.rs
//
// LiveView - the local replica every command is validated against.
// Decoded fresh from the store's watch snapshots; derived lookups only,
// no mutation. Undecodable documents (a newer peer writing fields we
// do not know) are skipped with a warning rather than poisoning the
// whole view.

use serde_json::Value;

use crate::models::core::{Group, GroupListing, Idea, Participant};

#[derive(Debug, Clone, Default)]
pub struct LiveView {
    pub participants: Vec<Participant>,
    pub groups: Vec<Group>,
    pub ideas: Vec<Idea>,
}

fn decode_all<T: serde::de::DeserializeOwned>(raw: &[Value], what: &str) -> Vec<T> {
    raw.iter()
        .filter_map(|doc| match serde_json::from_value(doc.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("⚠️ [VIEW] skipping undecodable {what}: {e}");
                None
            }
        })
        .collect()
}

impl LiveView {
    pub fn decode(participants: &[Value], groups: &[Value], ideas: &[Value]) -> Self {
        Self {
            participants: decode_all(participants, "participant"),
            groups: decode_all(groups, "group"),
            ideas: decode_all(ideas, "idea"),
        }
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn idea(&self, id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    /// The group the given participant currently belongs to, if any.
    pub fn group_of(&self, participant_id: &str) -> Option<&Group> {
        self.participant(participant_id)
            .and_then(|p| p.group_id.as_deref())
            .and_then(|gid| self.group(gid))
    }

    pub fn members(&self, group_id: &str) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.group_id.as_deref() == Some(group_id))
            .collect()
    }

    pub fn group_ideas(&self, group_id: &str) -> Vec<&Idea> {
        self.ideas
            .iter()
            .filter(|i| i.group_id == group_id)
            .collect()
    }

    pub fn selected_ideas(&self, group_id: &str) -> Vec<&Idea> {
        self.ideas
            .iter()
            .filter(|i| i.group_id == group_id && i.selected)
            .collect()
    }

    pub fn selected_count(&self, group_id: &str) -> usize {
        self.selected_ideas(group_id).len()
    }

    /// Lobby listing: every group with its member count, computed by
    /// joining against the participant collection. Unordered beyond
    /// the store's snapshot order.
    pub fn listings(&self) -> Vec<GroupListing> {
        self.groups
            .iter()
            .map(|group| GroupListing {
                group: group.clone(),
                member_count: self.members(&group.id).len(),
            })
            .collect()
    }
}
