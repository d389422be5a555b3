// src/models/commands.rs
//
// Every mutation in the workshop is a discrete command. Commands are
// validated by the WorkshopActor against its live replica before any
// store write happens; the store itself is pure replication transport.
// Re-sending a command is safe: upserts and flag/score overwrites land
// on the same state.

use serde::{Deserialize, Serialize};

use crate::models::core::Rating;

/// The two scoring axes of the prioritization matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAxis {
    Benefit,
    Effort,
}

impl ScoreAxis {
    /// Document field written by a score update.
    pub fn field(self) -> &'static str {
        match self {
            ScoreAxis::Benefit => "benefit",
            ScoreAxis::Effort => "effort",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandMsg {
    // ═══════════════════════════════════════════════════════════════════════
    // PROFILE COMMANDS
    // ═══════════════════════════════════════════════════════════════════════
    /// Create or rename the caller's profile (idempotent upsert; group
    /// membership survives a rename).
    SaveProfile {
        name: String,
    },
    /// Point the caller's profile at a group. The group id is taken on
    /// trust; a bad id fails at the store and is logged, nothing more.
    JoinGroup {
        group_id: String,
    },
    LeaveGroup,

    // ═══════════════════════════════════════════════════════════════════════
    // GROUP COMMANDS
    // ═══════════════════════════════════════════════════════════════════════
    /// Create a group at Kickoff and join the caller to it. The two
    /// writes are not transactional; a crash in between leaves an
    /// orphaned group in the listing.
    CreateGroup {
        name: String,
    },
    /// Move the group to its next phase. Rejected at WrapUp, and
    /// rejected when leaving Selection without exactly three selected
    /// ideas - the handler re-checks, it does not trust the caller.
    AdvancePhase {
        group_id: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // IDEA COMMANDS
    // ═══════════════════════════════════════════════════════════════════════
    AddIdea {
        text: String,
    },
    /// Delete an idea card, subject to the configured delete policy.
    RemoveIdea {
        idea_id: String,
    },
    /// Flip the shortlist flag. Selecting past the limit of three is a
    /// no-op; deselecting is never blocked.
    ToggleSelect {
        idea_id: String,
    },
    SetScore {
        idea_id: String,
        axis: ScoreAxis,
        value: Rating,
    },
}
