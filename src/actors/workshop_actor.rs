// src/actors/workshop_actor.rs
//
// WorkshopActor - the authoritative command processor for one session
//
// Responsibilities:
// - Subscribe to the three shared collections and keep a live replica
// - Validate every CommandMsg against that replica, then write through
//   the store (which acts purely as replication transport)
// - Push view/phase/rejection events to the embedding UI
// - Own the countdown task, restarting it whenever the observed
//   (group, phase, phase_start_time) anchor changes

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::actors::countdown::spawn_countdown;
use crate::actors::{ActorHandle, ActorMessage, SystemCommand};
use crate::config::WorkshopConfig;
use crate::models::commands::CommandMsg;
use crate::models::core::{GroupListing, Idea, Participant, Phase};
use crate::models::events::AppEvent;
use crate::store::{Collection, DocStore};
use crate::view::LiveView;
use crate::{Outcome, board, phases, registry, sessions};

/// (group, phase, clock anchor) the running countdown was spawned for.
type CountdownKey = (String, Phase, i64);

pub struct WorkshopActor {
    identity: String,
    store: Arc<dyn DocStore>,
    config: WorkshopConfig,
    event_tx: UnboundedSender<AppEvent>,

    participants_rx: watch::Receiver<Vec<Value>>,
    groups_rx: watch::Receiver<Vec<Value>>,
    ideas_rx: watch::Receiver<Vec<Value>>,

    countdown: Option<(CountdownKey, JoinHandle<()>)>,

    // last state pushed to the UI, to emit only real changes
    last_listings: Vec<GroupListing>,
    last_members: Vec<Participant>,
    last_ideas: Vec<Idea>,
}

impl WorkshopActor {
    pub fn spawn(
        identity: String,
        store: Arc<dyn DocStore>,
        config: WorkshopConfig,
        event_tx: UnboundedSender<AppEvent>,
    ) -> ActorHandle<CommandMsg> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = Self {
            participants_rx: store.subscribe_all(Collection::Participants),
            groups_rx: store.subscribe_all(Collection::Groups),
            ideas_rx: store.subscribe_all(Collection::Ideas),
            identity,
            store,
            config,
            event_tx,
            countdown: None,
            last_listings: Vec::new(),
            last_members: Vec::new(),
            last_ideas: Vec::new(),
        };

        let join_handle = tokio::spawn(actor.run(cmd_rx));
        ActorHandle {
            cmd_tx,
            join_handle,
        }
    }

    async fn run(mut self, mut cmd_rx: UnboundedReceiver<ActorMessage<CommandMsg>>) {
        tracing::info!(
            "🎛️ [WORKSHOP] actor started for {}…",
            &self.identity[..16.min(self.identity.len())]
        );
        let _ = self.event_tx.send(AppEvent::IdentityReady {
            participant_id: self.identity.clone(),
        });
        self.sync_presentation();

        loop {
            tokio::select! {
                msg = cmd_rx.recv() => {
                    match msg {
                        Some(ActorMessage::System(sys)) => {
                            if self.handle_system_command(sys) {
                                break;
                            }
                        }
                        Some(ActorMessage::Domain(cmd)) => {
                            self.handle_command(cmd).await;
                        }
                        None => {
                            tracing::info!("🛑 [WORKSHOP] command channel closed");
                            break;
                        }
                    }
                }

                res = self.participants_rx.changed() => {
                    if res.is_err() { break; }
                    self.sync_presentation();
                }
                res = self.groups_rx.changed() => {
                    if res.is_err() { break; }
                    self.sync_presentation();
                }
                res = self.ideas_rx.changed() => {
                    if res.is_err() { break; }
                    self.sync_presentation();
                }
            }
        }

        if let Some((_, handle)) = self.countdown.take() {
            handle.abort();
        }
        tracing::info!("🛑 [WORKSHOP] actor stopped");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMMAND HANDLING
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_system_command(&mut self, cmd: SystemCommand) -> bool {
        match cmd {
            SystemCommand::PoisonPill => {
                tracing::info!("💀 [WORKSHOP] received PoisonPill");
                true
            }
            SystemCommand::DumpDiagnostics => {
                let view = self.current_view();
                tracing::info!(
                    "🩺 [WORKSHOP] participants={}, groups={}, ideas={}, countdown={:?}",
                    view.participants.len(),
                    view.groups.len(),
                    view.ideas.len(),
                    self.countdown.as_ref().map(|(key, _)| key)
                );
                false
            }
        }
    }

    async fn handle_command(&mut self, cmd: CommandMsg) {
        tracing::debug!("🎛️ [WORKSHOP] command: {:?}", std::mem::discriminant(&cmd));

        let view = self.current_view();
        let store = self.store.clone();
        let store = store.as_ref();
        let identity = self.identity.clone();

        let result = match cmd {
            CommandMsg::SaveProfile { name } => {
                sessions::save_profile(store, &view, &identity, &name).await
            }
            CommandMsg::JoinGroup { group_id } => {
                sessions::join_group(store, &identity, &group_id).await
            }
            CommandMsg::LeaveGroup => sessions::leave_group(store, &identity).await,
            CommandMsg::CreateGroup { name } => {
                registry::create_group(store, &view, &identity, &name).await
            }
            CommandMsg::AdvancePhase { group_id } => {
                phases::advance_phase(store, &view, &group_id).await
            }
            CommandMsg::AddIdea { text } => board::add_idea(store, &view, &identity, &text).await,
            CommandMsg::RemoveIdea { idea_id } => {
                board::remove_idea(store, &view, self.config.delete_policy, &identity, &idea_id)
                    .await
            }
            CommandMsg::ToggleSelect { idea_id } => {
                board::toggle_select(store, &view, &idea_id).await
            }
            CommandMsg::SetScore {
                idea_id,
                axis,
                value,
            } => board::set_score(store, &idea_id, axis, value).await,
        };

        match result {
            Ok(Outcome::Applied) => {}
            Ok(Outcome::Rejected(reason)) => {
                tracing::debug!("🚫 [WORKSHOP] rejected: {reason}");
                let _ = self.event_tx.send(AppEvent::CommandRejected {
                    reason: reason.to_string(),
                });
            }
            Err(e) => {
                // store failure: logged and dropped, prior state intact
                tracing::error!("🔴 [WORKSHOP] store write failed: {e}");
                let _ = self.event_tx.send(AppEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        self.sync_presentation();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LIVE VIEW + UI EVENTS
    // ═══════════════════════════════════════════════════════════════════════

    fn current_view(&mut self) -> LiveView {
        let participants = self.participants_rx.borrow_and_update().clone();
        let groups = self.groups_rx.borrow_and_update().clone();
        let ideas = self.ideas_rx.borrow_and_update().clone();
        LiveView::decode(&participants, &groups, &ideas)
    }

    /// Re-derive everything the UI cares about from the latest replica
    /// and emit only what actually changed. Runs after every command
    /// and every store change notification.
    fn sync_presentation(&mut self) {
        let view = self.current_view();

        let listings = view.listings();
        if listings != self.last_listings {
            self.last_listings = listings.clone();
            let _ = self.event_tx.send(AppEvent::GroupsChanged { listings });
        }

        let my_group = view.group_of(&self.identity).cloned();
        match my_group {
            Some(group) => {
                let members: Vec<Participant> =
                    view.members(&group.id).into_iter().cloned().collect();
                if members != self.last_members {
                    self.last_members = members.clone();
                    let _ = self.event_tx.send(AppEvent::MembersChanged {
                        group_id: group.id.clone(),
                        members,
                    });
                }

                let ideas: Vec<Idea> = view.group_ideas(&group.id).into_iter().cloned().collect();
                if ideas != self.last_ideas {
                    self.last_ideas = ideas.clone();
                    let _ = self.event_tx.send(AppEvent::IdeasChanged {
                        group_id: group.id.clone(),
                        ideas,
                    });
                }

                let key = (group.id.clone(), group.current_phase, group.phase_start_time);
                self.restart_countdown_if_moved(Some(key), Some(&group));
            }
            None => {
                self.last_members.clear();
                self.last_ideas.clear();
                self.restart_countdown_if_moved(None, None);
            }
        }
    }

    /// The countdown derives from (phase, phase_start_time); whenever
    /// that anchor moves - phase advanced, group joined or left - the
    /// old ticker is cancelled and a fresh one starts.
    fn restart_countdown_if_moved(
        &mut self,
        key: Option<CountdownKey>,
        group: Option<&crate::models::core::Group>,
    ) {
        let current = self.countdown.as_ref().map(|(k, _)| k.clone());
        if current == key {
            return;
        }

        if let Some((_, handle)) = self.countdown.take() {
            handle.abort();
        }

        if let (Some(key), Some(group)) = (key, group) {
            let _ = self.event_tx.send(AppEvent::PhaseChanged {
                group_id: group.id.clone(),
                phase: group.current_phase,
                phase_start_time: group.phase_start_time,
            });
            let handle = spawn_countdown(
                group.id.clone(),
                group.current_phase,
                group.phase_start_time,
                self.event_tx.clone(),
            );
            self.countdown = Some((key, handle));
        }
    }
}
