// src/store/mod.rs
//
// Document store contract. The workshop core only ever talks to this
// trait: durable keyed JSON documents per collection, partial field
// updates resolved last-write-wins, and a continuously updated live
// view per collection. Whatever sits behind it (in-process memory,
// SQLite, a hosted realtime database) is an external collaborator.

use anyhow::Result;
use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use serde_json::Value;
use tokio::sync::watch;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

// ═══════════════════════════════════════════════════════════════════════════
// COLLECTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Participants,
    Groups,
    Ideas,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Participants,
        Collection::Groups,
        Collection::Ideas,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Participants => "participants",
            Collection::Groups => "groups",
            Collection::Ideas => "ideas",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRACT
// ═══════════════════════════════════════════════════════════════════════════

/// Async document store. Every operation may fail; the core logs a
/// failure and drops it - no retries, no rollback (each mutation is a
/// single-record write, so there is nothing partial to undo).
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Write a full document under a caller-chosen key, replacing any
    /// previous version.
    async fn create_or_replace(&self, collection: Collection, id: &str, record: Value)
    -> Result<()>;

    /// Write a full document under a fresh generated key; returns it.
    async fn create_with_generated_id(&self, collection: Collection, record: Value)
    -> Result<String>;

    /// Atomically merge the given fields into one existing document.
    /// Concurrent updates to disjoint fields both persist; the same
    /// field resolves last-write-wins. Missing document is an error.
    async fn update_fields(&self, collection: Collection, id: &str, fields: Value) -> Result<()>;

    /// Idempotent delete; removing an absent document succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Live view of a whole collection. The receiver always holds the
    /// latest snapshot; per-record updates arrive in write order, with
    /// no ordering guarantee across records.
    fn subscribe_all(&self, collection: Collection) -> watch::Receiver<Vec<Value>>;
}

// ═══════════════════════════════════════════════════════════════════════════
// SHARED HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Generated document key: blake3 over collection + wall clock nanos +
/// OS-seeded randomness, hex encoded.
pub fn generate_doc_id(collection: Collection) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut rng = ChaCha8Rng::from_os_rng();
    let nonce = rng.next_u64();
    blake3::hash(format!("{}:{}:{}", collection.name(), nanos, nonce).as_bytes())
        .to_hex()
        .to_string()
}

/// Merge `fields` into `doc` key by key. Both must be JSON objects.
pub(crate) fn merge_fields(doc: &mut Value, fields: &Value) -> Result<()> {
    let (Some(target), Some(updates)) = (doc.as_object_mut(), fields.as_object()) else {
        anyhow::bail!("partial update requires JSON objects");
    };
    for (key, value) in updates {
        target.insert(key.clone(), value.clone());
    }
    Ok(())
}
