// src/lib.rs
//
// huddle_backend - realtime backend for a timeboxed brainstorming
// workshop. Participants join named groups, pin idea cards, shortlist
// three, score them on benefit/effort and walk away with a plain-text
// report. Everything shared lives in a document store behind the
// DocStore trait; a single WorkshopActor per session validates every
// mutation against its live replica before writing through.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

pub mod actors;
pub mod board;
pub mod config;
pub mod export;
pub mod identity;
pub mod models;
pub mod phases;
pub mod registry;
pub mod sessions;
pub mod store;
pub mod view;

pub use board::SELECTION_LIMIT;
pub use config::{DeletePolicy, WorkshopConfig};
pub use models::commands::{CommandMsg, ScoreAxis};
pub use models::core::{Group, GroupListing, Idea, Participant, Phase, Rating};
pub use models::events::AppEvent;
pub use store::{Collection, DocStore, MemoryStore, SqliteStore};
pub use view::LiveView;

use crate::actors::{ActorMessage, SystemCommand, WorkshopActor, WorkshopActorHandle};
use crate::identity::IdentityProvider;

/// Prompts shown to the room during ideation.
pub const GUIDE_QUESTIONS: [&str; 5] = [
    "¿Qué tareas son las que realizas frecuentemente en tu día a día?",
    "¿Cuáles son las tareas donde inviertes más tiempo?",
    "¿Qué puntos de mejora identificas en tu día a día?",
    "¿Hay alguna ineficiencia en los procedimientos que se ejecutan?",
    "¿Se desatienden tareas por falta de tiempo o personal?",
];

/// What became of a validated command. A rejection is not an error:
/// state is unchanged and the reason goes to the UI, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(&'static str),
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKSHOP SYSTEM
// ═══════════════════════════════════════════════════════════════════════════

/// One participant's session: identity, the command channel into the
/// actor, and read access to the live replica. Several systems sharing
/// one store are several members of the same workshop.
pub struct WorkshopSystem {
    pub participant_id: String,
    store: Arc<dyn DocStore>,
    actor: WorkshopActorHandle,

    participants_rx: watch::Receiver<Vec<serde_json::Value>>,
    groups_rx: watch::Receiver<Vec<serde_json::Value>>,
    ideas_rx: watch::Receiver<Vec<serde_json::Value>>,
}

impl WorkshopSystem {
    /// Resolve the identity and spawn the session actor. Must run on a
    /// tokio runtime. Returns the system plus the UI event stream.
    pub fn start(
        store: Arc<dyn DocStore>,
        identity: &dyn IdentityProvider,
        config: WorkshopConfig,
    ) -> Result<(Self, UnboundedReceiver<AppEvent>)> {
        let participant_id = identity.get_or_create()?;

        let (event_tx, event_rx): (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) =
            tokio::sync::mpsc::unbounded_channel();
        let actor = WorkshopActor::spawn(
            participant_id.clone(),
            store.clone(),
            config,
            event_tx,
        );

        let system = Self {
            participant_id,
            participants_rx: store.subscribe_all(Collection::Participants),
            groups_rx: store.subscribe_all(Collection::Groups),
            ideas_rx: store.subscribe_all(Collection::Ideas),
            store,
            actor,
        };
        Ok((system, event_rx))
    }

    /// Queue a command for the actor. Returns false if the actor is
    /// gone; the command itself is validated asynchronously.
    pub fn send(&self, cmd: CommandMsg) -> bool {
        self.actor.cmd_tx.send(ActorMessage::Domain(cmd)).is_ok()
    }

    /// JSON boundary for embedding hosts: parse and queue a command.
    pub fn send_json(&self, json: &str) -> bool {
        match serde_json::from_str::<CommandMsg>(json) {
            Ok(cmd) => self.send(cmd),
            Err(e) => {
                tracing::warn!("⚠️ [SYSTEM] failed to parse command: {e}");
                false
            }
        }
    }

    /// Current replica of the shared collections.
    pub fn view(&self) -> LiveView {
        LiveView::decode(
            &self.participants_rx.borrow(),
            &self.groups_rx.borrow(),
            &self.ideas_rx.borrow(),
        )
    }

    pub fn my_profile(&self) -> Option<Participant> {
        self.view().participant(&self.participant_id).cloned()
    }

    pub fn my_group(&self) -> Option<Group> {
        self.view().group_of(&self.participant_id).cloned()
    }

    /// Render the end-of-session report for the caller's group.
    pub fn summary(&self) -> Option<String> {
        let view = self.view();
        let group = view.group_of(&self.participant_id)?;
        Some(export::summary_report(
            group,
            &view.members(&group.id),
            &view.group_ideas(&group.id),
            chrono::Utc::now(),
        ))
    }

    /// Direct store access, for embedding hosts layering extra reads.
    pub fn store(&self) -> Arc<dyn DocStore> {
        self.store.clone()
    }

    /// Ask the actor to log its diagnostics.
    pub fn dump_diagnostics(&self) {
        let _ = self
            .actor
            .cmd_tx
            .send(ActorMessage::System(SystemCommand::DumpDiagnostics));
    }

    /// Graceful shutdown: poison the actor and wait for it to drain.
    pub async fn shutdown(self) {
        let _ = self
            .actor
            .cmd_tx
            .send(ActorMessage::System(SystemCommand::PoisonPill));
        let _ = self.actor.join_handle.await;
    }
}
