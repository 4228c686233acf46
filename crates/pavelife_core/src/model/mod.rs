//! Domain model for the persisted life document.
//!
//! # Responsibility
//! - Define the canonical data structures mirrored to durable storage.
//! - Keep wire field names compatible with the original localStorage blob.
//!
//! # Invariants
//! - `LifeDocument.events` stays sorted ascending by age after every mutation.
//! - Entity ids are unique within their owning collection.

pub mod life;
