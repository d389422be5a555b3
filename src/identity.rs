// src/identity.rs
//
// Anonymous session identity. The workshop never authenticates anyone;
// it only needs a stable opaque id per device so a participant's
// profile survives restarts. The watch channel tells the app layer
// when the identity becomes available.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use tokio::sync::watch;

pub trait IdentityProvider: Send + Sync {
    /// Load the device identity, minting one on first call.
    fn get_or_create(&self) -> Result<String>;

    /// Receives `Some(id)` once the identity is available.
    fn watch(&self) -> watch::Receiver<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE-BACKED IDENTITY
// ═══════════════════════════════════════════════════════════════════════════

/// Persists a hex-encoded 32-byte id under the data dir, so the same
/// device comes back as the same participant.
pub struct FileIdentity {
    path: PathBuf,
    tx: watch::Sender<Option<String>>,
}

impl FileIdentity {
    pub fn new(data_dir: &std::path::Path) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            path: data_dir.join("identity"),
            tx,
        }
    }
}

impl IdentityProvider for FileIdentity {
    fn get_or_create(&self) -> Result<String> {
        let id = match std::fs::read_to_string(&self.path) {
            Ok(existing) if !existing.trim().is_empty() => existing.trim().to_string(),
            _ => {
                let mut rng = ChaCha8Rng::from_os_rng();
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                let fresh = blake3::hash(&seed).to_hex().to_string();

                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating data dir {parent:?}"))?;
                }
                std::fs::write(&self.path, &fresh)
                    .with_context(|| format!("persisting identity at {:?}", self.path))?;
                tracing::info!("🪪 [IDENTITY] minted new identity {}…", &fresh[..16]);
                fresh
            }
        };

        self.tx.send_replace(Some(id.clone()));
        Ok(id)
    }

    fn watch(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FIXED IDENTITY
// ═══════════════════════════════════════════════════════════════════════════

/// Caller-supplied identity, for embedding hosts that already manage
/// sessions (and for tests that need several participants in-process).
pub struct StaticIdentity {
    id: String,
    tx: watch::Sender<Option<String>>,
}

impl StaticIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let (tx, _rx) = watch::channel(Some(id.clone()));
        Self { id, tx }
    }
}

impl IdentityProvider for StaticIdentity {
    fn get_or_create(&self) -> Result<String> {
        Ok(self.id.clone())
    }

    fn watch(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}
