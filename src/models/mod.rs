// src/models/mod.rs

pub mod commands;
pub mod core;
pub mod events;

pub use commands::{CommandMsg, ScoreAxis};
pub use core::{Group, GroupListing, Idea, Participant, Phase, Rating};
pub use events::AppEvent;
