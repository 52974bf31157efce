//! # confkeep-core
//!
//! Crash-resilient configuration persistence for stateful subsystems.
//!
//! A configuration type implements [`PersistedConfig`] (path resolution plus
//! encode/decode of its own state) and hands itself to [`ConfigPersistence`],
//! which owns the recovery policy:
//!
//! - **Load with fallback**: the primary file is preferred; if it is missing,
//!   empty, or fails to decode, the `.bak` sibling is consulted instead.
//! - **Guarded persist**: concurrent persists on one instance serialize
//!   entirely, so the primary file always holds exactly one full snapshot.
//!
//! ## Key Concepts
//!
//! - **Primary file**: the canonical on-disk file at the resolved path
//! - **Backup file**: the `path + ".bak"` sibling, consulted only on fallback
//! - **LoadOutcome**: what actually happened at startup (primary, backup,
//!   nothing to load, or failure)

pub mod persistence;

// Re-export commonly used types
pub use persistence::{
    ConfigPersistence, DecodeError, LoadError, LoadOutcome, LoadSource, PersistedConfig,
};
