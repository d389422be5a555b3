// src/models/events.rs
//
// Events pushed to the embedding UI layer. Mirrors the command channel
// in the opposite direction: the actor owns the authoritative view and
// tells the UI what changed; the UI never computes shared state itself.

use serde::{Deserialize, Serialize};

use crate::models::core::{GroupListing, Idea, Participant, Phase};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppEvent {
    /// Session identity resolved; commands are accepted from here on.
    IdentityReady {
        participant_id: String,
    },
    /// Lobby listing changed (groups created, members joined/left).
    GroupsChanged {
        listings: Vec<GroupListing>,
    },
    /// Membership of the caller's group changed.
    MembersChanged {
        group_id: String,
        members: Vec<Participant>,
    },
    /// Idea board of the caller's group changed.
    IdeasChanged {
        group_id: String,
        ideas: Vec<Idea>,
    },
    /// The caller's group moved phase (or the shared clock anchor was
    /// reset). The countdown restarts from this.
    PhaseChanged {
        group_id: String,
        phase: Phase,
        phase_start_time: i64,
    },
    /// Once-per-second derived countdown refresh. Purely local; never
    /// written back to shared state.
    CountdownTick {
        group_id: String,
        phase: Phase,
        remaining_secs: u64,
        display: String,
    },
    /// A command was validated and refused; state is unchanged.
    CommandRejected {
        reason: String,
    },
    /// Store-level failure surfaced for display. Not retried.
    Error {
        message: String,
    },
}
