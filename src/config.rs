// src/config.rs

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Who may delete an idea card.
///
/// The workshop format historically lets anyone clean up the board;
/// that stays the default. Hosts that want author-gated deletion flip
/// the policy instead of patching the handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    #[default]
    Anyone,
    AuthorOnly,
}

impl std::fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DeletePolicy::Anyone => "anyone",
            DeletePolicy::AuthorOnly => "author-only",
        })
    }
}

#[derive(Debug, Clone)]
pub struct WorkshopConfig {
    /// Where identity and the durable store live.
    pub data_dir: PathBuf,
    pub delete_policy: DeletePolicy,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./huddle-data"),
            delete_policy: DeletePolicy::default(),
        }
    }
}
