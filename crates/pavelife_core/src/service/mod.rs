//! Core use-case services.
//!
//! # Responsibility
//! - Own the canonical in-memory life document.
//! - Mirror every accepted mutation to the storage adapter.

pub mod life_store;
