// src/phases.rs
//
// Phase state machine and the derived countdown.
//
// Phases only ever move forward, one step at a time, by an explicit
// member action; the countdown is display sugar and never advances
// anything when it hits zero. The remaining time is a pure function of
// the group's shared clock anchor plus the local wall clock, which is
// what keeps every member's display converged without a tick
// broadcaster: same inputs, same number.

use anyhow::Result;
use serde_json::json;

use crate::Outcome;
use crate::board::SELECTION_LIMIT;
use crate::models::core::Phase;
use crate::store::{Collection, DocStore};
use crate::view::LiveView;

/// Advance a group to its next phase.
///
/// The Selection exit condition is re-checked here, against the local
/// authoritative replica - a hand-rolled client that skipped its own
/// check cannot move the group on with fewer than three picks. Both
/// phase fields land in one document update so every member observes
/// the new phase together with its clock anchor.
pub async fn advance_phase(
    store: &dyn DocStore,
    view: &LiveView,
    group_id: &str,
) -> Result<Outcome> {
    let Some(group) = view.group(group_id) else {
        return Ok(Outcome::Rejected("unknown group"));
    };
    let Some(next) = group.current_phase.next() else {
        return Ok(Outcome::Rejected("the workshop is already at its final phase"));
    };
    if group.current_phase == Phase::Selection && view.selected_count(group_id) != SELECTION_LIMIT {
        return Ok(Outcome::Rejected(
            "leaving the selection phase requires exactly three selected ideas",
        ));
    }

    store
        .update_fields(
            Collection::Groups,
            group_id,
            json!({
                "current_phase": next,
                "phase_start_time": chrono::Utc::now().timestamp_millis(),
            }),
        )
        .await?;

    tracing::info!(
        "⏭️ [PHASES] group {}… advanced to {} ({})",
        &group_id[..16.min(group_id.len())],
        next.index(),
        next.title()
    );
    Ok(Outcome::Applied)
}

/// Seconds left in the current phase, clamped at zero. Clock skew that
/// puts `now` before the anchor reads as "nothing elapsed yet".
pub fn remaining_secs(phase: Phase, phase_start_time: i64, now_millis: i64) -> u64 {
    let elapsed = ((now_millis - phase_start_time) / 1000).max(0) as u64;
    phase.duration_secs().saturating_sub(elapsed)
}

/// MM:SS for the header clock.
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
