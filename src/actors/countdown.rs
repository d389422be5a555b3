// src/actors/countdown.rs
//
// The one recurring local task in the system. Recomputes the remaining
// time from the shared (phase, phase_start_time) anchor once per
// second and pushes a display tick to the UI. Never touches shared
// state; the owner aborts and respawns it whenever the observed anchor
// changes.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::core::Phase;
use crate::models::events::AppEvent;
use crate::phases;

pub fn spawn_countdown(
    group_id: String,
    phase: Phase,
    phase_start_time: i64,
    event_tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let now = chrono::Utc::now().timestamp_millis();
            let remaining = phases::remaining_secs(phase, phase_start_time, now);
            let tick = AppEvent::CountdownTick {
                group_id: group_id.clone(),
                phase,
                remaining_secs: remaining,
                display: phases::format_mmss(remaining),
            };
            if event_tx.send(tick).is_err() {
                // UI side is gone; nothing left to refresh
                break;
            }
        }
    })
}
