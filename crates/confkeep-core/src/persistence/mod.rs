//! Persistence layer: load-with-fallback and guarded persist.
//!
//! # Overview
//!
//! This module handles all file I/O for a durable configuration instance:
//!
//! - **Manager** - The [`ConfigPersistence`] core orchestrating load and persist
//! - **Store** - Raw textual file read/write with backup rotation
//! - **Json** - serde_json helpers for the common JSON-encoded case
//!
//! # File Layout
//!
//! Each configuration instance owns one primary path; its siblings are
//! derived, never configured:
//!
//! ```text
//! <resolved path>          # primary file, full snapshot of current state
//! <resolved path>.bak      # previous snapshot, rotated on every overwrite
//! <resolved path>.tmp      # staging file, gone after a successful write
//! ```
//!
//! # Design Principles
//!
//! ## Availability over strict signaling
//!
//! `load` never raises: a missing, empty, or corrupt primary falls back to
//! the backup, and "nothing on disk at all" lets defaults stand. Failures
//! surface through logs and the [`LoadOutcome`] value, so the process can
//! start even when its state files did not survive a crash.
//!
//! ## Atomic Writes
//!
//! Overwrites use write-then-rename with a backup rotation in between:
//!
//! 1. Write to `file.tmp`
//! 2. Copy the current non-empty primary to `file.bak`
//! 3. Rename `file.tmp` to `file` (atomic on Unix)
//!
//! # Usage
//!
//! ```ignore
//! use confkeep_core::persistence::{ConfigPersistence, PersistedConfig};
//!
//! let mut keeper = ConfigPersistence::new(MyConfig::default());
//! let outcome = keeper.load();          // fallback handled internally
//! keeper.get_mut().max_workers = 8;
//! keeper.persist();                     // swallow-and-log policy
//! keeper.try_persist()?;               // strict variant for careful hosts
//! ```

pub mod json;
pub mod manager;
pub mod store;

// Re-export commonly used items for convenience
pub use manager::{
    ConfigPersistence, DecodeError, LoadError, LoadOutcome, LoadSource, PersistedConfig,
};
pub use store::{backup_path, read_text, write_text};
