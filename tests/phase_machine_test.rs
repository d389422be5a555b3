// tests/phase_machine_test.rs
//
// Forward-only phase progression with a shared clock anchor, plus the
// pure countdown math every member derives their display from.

use std::sync::Arc;

use huddle_backend::{CommandMsg, MemoryStore, Phase, phases};

mod common;
use common::{add_ideas, drain_rejections, profile_and_group, start_member, wait_until};

#[tokio::test]
async fn new_group_starts_at_kickoff_and_advances_once() {
    let store = Arc::new(MemoryStore::new());
    let (system, _event_rx) = start_member(&store, "member-ana");

    let t0 = chrono::Utc::now().timestamp_millis();
    let group_id = profile_and_group(&system, "Ana", "Finanzas").await;

    let group = system.my_group().expect("group exists");
    assert_eq!(group.current_phase, Phase::Kickoff);
    assert!(group.phase_start_time >= t0);

    let t1 = chrono::Utc::now().timestamp_millis();
    system.send(CommandMsg::AdvancePhase {
        group_id: group_id.clone(),
    });
    assert!(
        wait_until(|| {
            system
                .my_group()
                .is_some_and(|g| g.current_phase == Phase::Ideation)
        })
        .await
    );

    // the clock anchor was reset together with the phase
    let group = system.my_group().expect("group exists");
    assert!(group.phase_start_time >= t1);

    system.shutdown().await;
}

#[tokio::test]
async fn selection_exit_requires_exactly_three_picks() {
    let store = Arc::new(MemoryStore::new());
    let (system, mut event_rx) = start_member(&store, "member-luis");

    let group_id = profile_and_group(&system, "Luis", "Logística").await;

    // Kickoff -> Ideation -> Selection
    for _ in 0..2 {
        system.send(CommandMsg::AdvancePhase {
            group_id: group_id.clone(),
        });
    }
    assert!(
        wait_until(|| {
            system
                .my_group()
                .is_some_and(|g| g.current_phase == Phase::Selection)
        })
        .await
    );

    // no picks yet: the authoritative handler refuses to move on,
    // whatever the submitting client believed
    system.send(CommandMsg::AdvancePhase {
        group_id: group_id.clone(),
    });
    assert!(wait_until(|| !drain_rejections(&mut event_rx).is_empty()).await);
    assert_eq!(
        system.my_group().expect("group exists").current_phase,
        Phase::Selection
    );

    // with exactly three picks the transition goes through
    let ideas = add_ideas(&system, &group_id, 3).await;
    for idea_id in &ideas {
        system.send(CommandMsg::ToggleSelect {
            idea_id: idea_id.clone(),
        });
    }
    assert!(wait_until(|| system.view().selected_count(&group_id) == 3).await);

    system.send(CommandMsg::AdvancePhase {
        group_id: group_id.clone(),
    });
    assert!(
        wait_until(|| {
            system
                .my_group()
                .is_some_and(|g| g.current_phase == Phase::Prioritization)
        })
        .await
    );

    system.shutdown().await;
}

#[tokio::test]
async fn phase_is_monotonic_and_stops_at_wrap_up() {
    let store = Arc::new(MemoryStore::new());
    let (system, mut event_rx) = start_member(&store, "member-eva");

    let group_id = profile_and_group(&system, "Eva", "Compras").await;

    // drive the group to WrapUp (three picks to clear the Selection gate)
    for _ in 0..2 {
        system.send(CommandMsg::AdvancePhase {
            group_id: group_id.clone(),
        });
    }
    let ideas = add_ideas(&system, &group_id, 3).await;
    for idea_id in &ideas {
        system.send(CommandMsg::ToggleSelect {
            idea_id: idea_id.clone(),
        });
    }
    for _ in 0..2 {
        system.send(CommandMsg::AdvancePhase {
            group_id: group_id.clone(),
        });
    }
    assert!(
        wait_until(|| {
            system
                .my_group()
                .is_some_and(|g| g.current_phase == Phase::WrapUp)
        })
        .await
    );

    // terminal: a further advance is refused and nothing moves
    drain_rejections(&mut event_rx);
    system.send(CommandMsg::AdvancePhase {
        group_id: group_id.clone(),
    });
    assert!(wait_until(|| !drain_rejections(&mut event_rx).is_empty()).await);
    assert_eq!(
        system.my_group().expect("group exists").current_phase,
        Phase::WrapUp
    );

    system.shutdown().await;
}

// ═══════════════════════════════════════════════════════════════════════════
// PURE COUNTDOWN MATH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn countdown_is_deterministic() {
    let start = 1_000_000;

    // Ideation runs 300 s
    assert_eq!(phases::remaining_secs(Phase::Ideation, start, start), 300);
    assert_eq!(
        phases::remaining_secs(Phase::Ideation, start, start + 60_000),
        240
    );
    assert_eq!(
        phases::remaining_secs(Phase::Ideation, start, start + 299_999),
        1
    );
    // past expiry clamps at zero, it never goes negative
    assert_eq!(
        phases::remaining_secs(Phase::Ideation, start, start + 301_000),
        0
    );
    // a skewed clock before the anchor reads as nothing elapsed
    assert_eq!(
        phases::remaining_secs(Phase::Ideation, start, start - 5_000),
        300
    );
}

#[test]
fn phase_durations_match_the_agenda() {
    assert_eq!(Phase::Kickoff.duration_secs(), 120);
    assert_eq!(Phase::Ideation.duration_secs(), 300);
    assert_eq!(Phase::Selection.duration_secs(), 300);
    assert_eq!(Phase::Prioritization.duration_secs(), 180);
    assert_eq!(Phase::WrapUp.duration_secs(), 300);
}

#[test]
fn phase_order_is_fixed_and_terminal() {
    assert_eq!(Phase::Kickoff.next(), Some(Phase::Ideation));
    assert_eq!(Phase::Ideation.next(), Some(Phase::Selection));
    assert_eq!(Phase::Selection.next(), Some(Phase::Prioritization));
    assert_eq!(Phase::Prioritization.next(), Some(Phase::WrapUp));
    assert_eq!(Phase::WrapUp.next(), None);
    assert!(Phase::WrapUp.is_terminal());
}

#[test]
fn countdown_formats_mm_ss() {
    assert_eq!(phases::format_mmss(0), "00:00");
    assert_eq!(phases::format_mmss(61), "01:01");
    assert_eq!(phases::format_mmss(300), "05:00");
}
