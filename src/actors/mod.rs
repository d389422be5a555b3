// src/actors/mod.rs
//
// Actor plumbing for the workshop runtime
//
// Architecture:
//   WorkshopActor (authoritative command processor, one per session)
//   └── countdown task (derived 1 s display refresh, local only)

pub mod countdown;
pub mod workshop_actor;

pub use workshop_actor::WorkshopActor;

// ═══════════════════════════════════════════════════════════════════════════
// COMMON ACTOR TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// System-level commands every actor understands
#[derive(Debug, Clone)]
pub enum SystemCommand {
    /// Graceful shutdown
    PoisonPill,
    /// Dump diagnostics to logs
    DumpDiagnostics,
}

/// Wrapper for actor messages - either system or domain-specific
#[derive(Debug)]
pub enum ActorMessage<C> {
    System(SystemCommand),
    Domain(C),
}

/// Handle to a spawned actor
pub struct ActorHandle<C> {
    pub cmd_tx: tokio::sync::mpsc::UnboundedSender<ActorMessage<C>>,
    pub join_handle: tokio::task::JoinHandle<()>,
}

pub type WorkshopActorHandle = ActorHandle<crate::models::commands::CommandMsg>;
