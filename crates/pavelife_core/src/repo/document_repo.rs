//! Document repository contracts plus SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Persist the life document as one JSON blob in one named slot.
//! - Recover silently from absent, corrupt, or invariant-violating blobs.
//!
//! # Invariants
//! - A blob that does not deserialize into a valid `LifeDocument` loads as
//!   `None`; the caller substitutes the seed document. This is a recovery
//!   policy, not an error path.
//! - `save` failures are reported to the caller and never mask earlier state.

use crate::db::DbError;
use crate::model::life::LifeDocument;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Storage key used by the original client for its localStorage slot.
pub const DEFAULT_DOCUMENT_KEY: &str = "paveLifeData";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage adapter error for document load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "document serialization failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage adapter for the persisted life document.
pub trait DocumentRepository {
    /// Loads the document stored under `key`.
    ///
    /// Returns `Ok(None)` when the slot is absent or its content does not
    /// deserialize into a structurally valid document.
    fn load(&self, key: &str) -> RepoResult<Option<LifeDocument>>;

    /// Overwrites the slot under `key` with the serialized document.
    fn save(&self, key: &str, document: &LifeDocument) -> RepoResult<()>;
}

impl<R: DocumentRepository + ?Sized> DocumentRepository for &R {
    fn load(&self, key: &str) -> RepoResult<Option<LifeDocument>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, document: &LifeDocument) -> RepoResult<()> {
        (**self).save(key, document)
    }
}

/// SQLite-backed document repository over the `documents` kv table.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<LifeDocument>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(parse_document(key, &body)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, document: &LifeDocument) -> RepoResult<()> {
        let body = serde_json::to_string(document).map_err(RepoError::Serialize)?;

        self.conn.execute(
            "INSERT INTO documents (key, body, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at;",
            params![key, body, now_epoch_ms()],
        )?;

        Ok(())
    }
}

/// In-memory document repository for tests and database-free embedding.
#[derive(Debug, Default)]
pub struct MemoryDocumentRepository {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw blob, bypassing serialization. Lets tests stage corrupt
    /// slot content the way a foreign writer could.
    pub fn insert_raw(&self, key: impl Into<String>, body: impl Into<String>) {
        self.slots.borrow_mut().insert(key.into(), body.into());
    }

    /// Returns the raw blob currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    fn load(&self, key: &str) -> RepoResult<Option<LifeDocument>> {
        match self.slots.borrow().get(key) {
            Some(body) => Ok(parse_document(key, body)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, document: &LifeDocument) -> RepoResult<()> {
        let body = serde_json::to_string(document).map_err(RepoError::Serialize)?;
        self.slots.borrow_mut().insert(key.to_string(), body);
        Ok(())
    }
}

/// Decodes a stored blob, mapping corrupt or invalid content to `None`.
fn parse_document(key: &str, body: &str) -> Option<LifeDocument> {
    let document: LifeDocument = match serde_json::from_str(body) {
        Ok(document) => document,
        Err(err) => {
            warn!(
                "event=doc_load module=repo status=recovered key={key} reason=corrupt_blob error={err}"
            );
            return None;
        }
    };

    if let Err(err) = document.validate() {
        warn!(
            "event=doc_load module=repo status=recovered key={key} reason=invalid_document error={err}"
        );
        return None;
    }

    Some(document)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
