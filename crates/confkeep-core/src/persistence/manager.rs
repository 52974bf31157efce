//! The persistence core: load-with-fallback and guarded persist.
//!
//! # Recovery Policy
//!
//! `load` prefers the primary file. A primary that is missing, empty,
//! unreadable, or undecodable triggers one fallback attempt against the
//! `.bak` sibling; an absent backup is not a failure, it means defaults
//! stand. `persist` overwrites the primary with a full snapshot under an
//! instance-wide lock so concurrent persists never interleave.
//!
//! Failures never escape as panics or `Err` from `load`/`persist`; they
//! surface through logs and the [`LoadOutcome`] value. Hosts that must
//! observe write failures call [`ConfigPersistence::try_persist`] instead.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::store;

/// Capability contract a configuration type gives the persistence core:
/// where its file lives and how its state turns into text and back.
///
/// For serde structs, [`super::json`] reduces `encode`/`decode` to
/// one-liners:
///
/// ```ignore
/// impl PersistedConfig for BrokerConfig {
///     fn config_file_path(&self) -> PathBuf {
///         self.store_root.join("broker.json")
///     }
///     fn encode(&self, pretty: bool) -> Option<String> {
///         json::encode(&self.state, pretty)
///     }
///     fn decode(&mut self, text: &str) -> Result<(), DecodeError> {
///         json::decode_into(&mut self.state, text)
///     }
/// }
/// ```
pub trait PersistedConfig {
    /// The primary file path. Must be stable for the instance lifetime.
    fn config_file_path(&self) -> PathBuf;

    /// Serialize current state to text. `None` means there is nothing to
    /// write and the persist becomes a no-op.
    fn encode(&self, pretty: bool) -> Option<String>;

    /// Deserialize `text` into owned state, replacing it in place. State
    /// must be left untouched on failure.
    fn decode(&mut self, text: &str) -> Result<(), DecodeError>;
}

/// Error type for decode failures reported by a [`PersistedConfig`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Failure from a non-JSON codec
    #[error("{0}")]
    Other(String),
}

/// Error type for a failed load, carried inside [`LoadOutcome::Failed`].
#[derive(Error, Debug)]
pub enum LoadError {
    /// IO error reading the backup file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Backup content did not decode
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Which file a successful load actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    Backup,
}

/// What happened during [`ConfigPersistence::load`].
///
/// The legacy contract collapsed this to a boolean; [`is_success`] keeps
/// that mapping, while the variants let a stricter host distinguish
/// "loaded from disk" from "nothing on disk, defaults stand".
///
/// [`is_success`]: LoadOutcome::is_success
#[derive(Debug)]
pub enum LoadOutcome {
    /// State was decoded from the primary or backup file.
    Loaded(LoadSource),
    /// Neither file held content; state is untouched and defaults stand.
    NothingToLoad,
    /// The backup path could not be read or decoded.
    Failed(LoadError),
}

impl LoadOutcome {
    /// The boolean the legacy contract reported: `NothingToLoad` counts as
    /// success, by design, so a host missing its files starts on defaults
    /// instead of refusing to start.
    pub fn is_success(&self) -> bool {
        !matches!(self, LoadOutcome::Failed(_))
    }
}

/// Owns a [`PersistedConfig`] and orchestrates its durability: load with
/// backup fallback at startup, guarded full-snapshot persist thereafter.
pub struct ConfigPersistence<C> {
    config: C,
    persist_lock: Mutex<()>,
}

impl<C: PersistedConfig> ConfigPersistence<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            persist_lock: Mutex::new(()),
        }
    }

    /// Shared access to the owned configuration.
    pub fn get(&self) -> &C {
        &self.config
    }

    /// Mutable access to the owned configuration.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// Consume the wrapper and take the configuration back.
    pub fn into_inner(self) -> C {
        self.config
    }

    /// Populate state from durable storage.
    ///
    /// Intended for single-threaded startup, before any concurrent
    /// `persist` runs. Never panics and never returns an error to the
    /// caller: every failure is logged and folded into the outcome.
    pub fn load(&mut self) -> LoadOutcome {
        let path = self.config.config_file_path();

        let text = match store::read_text(&path) {
            Ok(Some(text)) if !text.is_empty() => text,
            // Missing or empty primary: not a failure, consult the backup.
            Ok(_) => return self.load_backup(&path),
            Err(e) => {
                log::error!(
                    "load {} failed, falling back to backup: {}",
                    path.display(),
                    e
                );
                return self.load_backup(&path);
            }
        };

        match self.config.decode(&text) {
            Ok(()) => {
                log::info!("load {} OK", path.display());
                LoadOutcome::Loaded(LoadSource::Primary)
            }
            Err(e) => {
                log::error!(
                    "load {} failed, falling back to backup: {}",
                    path.display(),
                    e
                );
                self.load_backup(&path)
            }
        }
    }

    /// Second-chance load from `primary + ".bak"`.
    ///
    /// A missing or empty backup reports success with state untouched:
    /// "nothing to restore" must not stop a host from starting on defaults.
    fn load_backup(&mut self, primary: &Path) -> LoadOutcome {
        let path = store::backup_path(primary);

        let text = match store::read_text(&path) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return LoadOutcome::NothingToLoad,
            Err(e) => {
                log::error!("load {} failed: {}", path.display(), e);
                return LoadOutcome::Failed(LoadError::Io(e));
            }
        };

        match self.config.decode(&text) {
            Ok(()) => {
                log::info!("load {} OK", path.display());
                LoadOutcome::Loaded(LoadSource::Backup)
            }
            Err(e) => {
                log::error!("load {} failed: {}", path.display(), e);
                LoadOutcome::Failed(LoadError::Decode(e))
            }
        }
    }

    /// Serialize current state and overwrite the primary file.
    ///
    /// Default swallow-and-log policy: a write failure is logged at error
    /// level and absorbed. Hosts that need the error use [`try_persist`].
    ///
    /// [`try_persist`]: ConfigPersistence::try_persist
    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            log::error!(
                "persist {} failed: {}",
                self.config.config_file_path().display(),
                e
            );
        }
    }

    /// Strict variant of [`persist`](ConfigPersistence::persist), surfacing
    /// write failures to the caller.
    ///
    /// The instance-wide lock covers the whole encode+write sequence, so
    /// concurrent persists serialize entirely and the primary file always
    /// holds exactly one full snapshot. A poisoned lock is recovered rather
    /// than propagated: a panic in one persist must not wedge all
    /// subsequent ones.
    pub fn try_persist(&self) -> io::Result<()> {
        let _guard = self
            .persist_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(text) = self.config.encode(true) {
            let path = self.config.config_file_path();
            store::write_text(&path, &text)?;
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
