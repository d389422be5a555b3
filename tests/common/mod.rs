// tests/common/mod.rs
//
// Shared scaffolding: spin up workshop members against one shared
// MemoryStore and wait for eventually-consistent state to settle.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use huddle_backend::identity::StaticIdentity;
use huddle_backend::{
    AppEvent, CommandMsg, DocStore, MemoryStore, WorkshopConfig, WorkshopSystem,
};
use tokio::sync::mpsc::UnboundedReceiver;

pub fn start_member(
    store: &Arc<MemoryStore>,
    id: &str,
) -> (WorkshopSystem, UnboundedReceiver<AppEvent>) {
    start_member_with(store, id, WorkshopConfig::default())
}

pub fn start_member_with(
    store: &Arc<MemoryStore>,
    id: &str,
    config: WorkshopConfig,
) -> (WorkshopSystem, UnboundedReceiver<AppEvent>) {
    let store: Arc<dyn DocStore> = store.clone();
    let identity = StaticIdentity::new(id);
    WorkshopSystem::start(store, &identity, config).expect("start workshop system")
}

/// Poll until `cond` holds or a 3 s deadline passes. Commands are
/// validated asynchronously, so every assertion about shared state
/// goes through here.
pub async fn wait_until<F: FnMut() -> bool>(mut cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

/// Profile the member and put them in a fresh group; returns the group id.
pub async fn profile_and_group(system: &WorkshopSystem, name: &str, group_name: &str) -> String {
    system.send(CommandMsg::SaveProfile { name: name.into() });
    assert!(
        wait_until(|| system.my_profile().is_some()).await,
        "profile for {name} never appeared"
    );
    system.send(CommandMsg::CreateGroup {
        name: group_name.into(),
    });
    assert!(
        wait_until(|| system.my_group().is_some()).await,
        "group {group_name} never appeared"
    );
    system.my_group().expect("group just appeared").id
}

/// Add `count` ideas and wait for all of them to land on the board.
pub async fn add_ideas(system: &WorkshopSystem, group_id: &str, count: usize) -> Vec<String> {
    for n in 0..count {
        system.send(CommandMsg::AddIdea {
            text: format!("idea {n}"),
        });
    }
    assert!(
        wait_until(|| system.view().group_ideas(group_id).len() == count).await,
        "expected {count} ideas on the board"
    );
    let mut ideas = system.view().group_ideas(group_id).into_iter().cloned().collect::<Vec<_>>();
    ideas.sort_by_key(|i| (i.created_at, i.id.clone()));
    ideas.into_iter().map(|i| i.id).collect()
}

/// Drain pending events, keeping only rejection reasons.
pub fn drain_rejections(event_rx: &mut UnboundedReceiver<AppEvent>) -> Vec<String> {
    let mut reasons = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        if let AppEvent::CommandRejected { reason } = event {
            reasons.push(reason);
        }
    }
    reasons
}
