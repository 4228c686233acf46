//! Storage adapter contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract for the persisted life document.
//! - Isolate SQLite and JSON details from the document store.
//!
//! # Invariants
//! - `load` never fails on an absent or unreadable blob; it reports `None`
//!   and leaves seeding to the caller.
//! - `save` overwrites the whole document slot in one statement.

pub mod document_repo;
