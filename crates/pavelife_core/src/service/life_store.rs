//! Life document store: total mutation operations over one owned document.
//!
//! # Responsibility
//! - Load the canonical document once at construction, seeding on absence.
//! - Expose the event/todo mutation operations and persist after each one.
//!
//! # Invariants
//! - Every operation is total: invalid targets and blank event titles leave
//!   the document unchanged instead of returning an error.
//! - `events` is sorted ascending by age after every accepted mutation;
//!   equal ages keep insertion order.
//! - The in-memory document stays authoritative even when a save fails; the
//!   persisted copy is allowed to lag.

use crate::model::life::{AgeEvent, LifeDocument, Todo};
use crate::repo::document_repo::DocumentRepository;
use log::{debug, info, warn};

/// Single-owner store for the life document.
///
/// Synchronous by design: operations take `&mut self`, so the borrow checker
/// enforces the one-mutation-at-a-time contract.
pub struct LifeStore<R: DocumentRepository> {
    repo: R,
    key: String,
    document: LifeDocument,
}

impl<R: DocumentRepository> LifeStore<R> {
    /// Loads the document stored under `key`, falling back to the seed when
    /// the slot is absent, corrupt, or invalid.
    ///
    /// A seeded document is persisted immediately so a fresh slot becomes
    /// durable before the first mutation.
    pub fn open(repo: R, key: impl Into<String>) -> Self {
        let key = key.into();

        let document = match repo.load(&key) {
            Ok(Some(document)) => {
                info!(
                    "event=doc_load module=store status=ok key={key} events={}",
                    document.events.len()
                );
                document
            }
            Ok(None) => {
                info!("event=doc_load module=store status=seeded key={key}");
                let seed = LifeDocument::seed();
                if let Err(err) = repo.save(&key, &seed) {
                    warn!("event=doc_save module=store status=error key={key} error={err}");
                }
                seed
            }
            Err(err) => {
                // Storage transport failure: behave like an empty slot, but
                // do not attempt the initial save that would fail again.
                warn!("event=doc_load module=store status=error key={key} error={err}");
                LifeDocument::seed()
            }
        };

        Self {
            repo,
            key,
            document,
        }
    }

    /// Returns the current authoritative document.
    pub fn document(&self) -> &LifeDocument {
        &self.document
    }

    /// Adds an event at `age`. Rejected when the trimmed title is blank;
    /// accepted titles are stored verbatim, surrounding whitespace included.
    pub fn add_event(&mut self, age: u32, title: &str) -> &LifeDocument {
        if title.trim().is_empty() {
            debug!("event=add_event module=store status=rejected reason=blank_title");
            return &self.document;
        }

        self.document.events.push(AgeEvent::new(age, title));
        self.document.sort_events();
        self.persist();
        &self.document
    }

    /// Removes an event and all its todos. Idempotent.
    pub fn delete_event(&mut self, event_id: &str) -> &LifeDocument {
        let before = self.document.events.len();
        self.document.events.retain(|event| event.id != event_id);
        if self.document.events.len() == before {
            debug!("event=delete_event module=store status=missed event_id={event_id}");
            return &self.document;
        }

        self.persist();
        &self.document
    }

    /// Replaces age and title of an existing event, keeping its id and todos.
    /// Rejected when the trimmed title is blank or the event is unknown; the
    /// accepted title is stored verbatim.
    pub fn update_event(&mut self, event_id: &str, new_age: u32, new_title: &str) -> &LifeDocument {
        if new_title.trim().is_empty() {
            debug!("event=update_event module=store status=rejected reason=blank_title");
            return &self.document;
        }

        let Some(event) = self.document.find_event_mut(event_id) else {
            debug!("event=update_event module=store status=missed event_id={event_id}");
            return &self.document;
        };
        event.age = new_age;
        event.title = new_title.to_string();

        self.document.sort_events();
        self.persist();
        &self.document
    }

    /// Appends an uncompleted todo to an event.
    ///
    /// Empty text is accepted; only event titles carry a non-blank rule.
    pub fn add_todo(&mut self, event_id: &str, text: &str) -> &LifeDocument {
        let Some(event) = self.document.find_event_mut(event_id) else {
            debug!("event=add_todo module=store status=missed event_id={event_id}");
            return &self.document;
        };
        event.todos.push(Todo::new(text));

        self.persist();
        &self.document
    }

    /// Flips the completion flag of one todo.
    pub fn toggle_todo(&mut self, event_id: &str, todo_id: &str) -> &LifeDocument {
        let Some(todo) = self
            .document
            .find_event_mut(event_id)
            .and_then(|event| event.todos.iter_mut().find(|todo| todo.id == todo_id))
        else {
            debug!(
                "event=toggle_todo module=store status=missed event_id={event_id} todo_id={todo_id}"
            );
            return &self.document;
        };
        todo.is_completed = !todo.is_completed;

        self.persist();
        &self.document
    }

    /// Removes one todo, keeping the order of the rest.
    pub fn delete_todo(&mut self, event_id: &str, todo_id: &str) -> &LifeDocument {
        let Some(event) = self.document.find_event_mut(event_id) else {
            debug!("event=delete_todo module=store status=missed event_id={event_id}");
            return &self.document;
        };
        let before = event.todos.len();
        event.todos.retain(|todo| todo.id != todo_id);
        if event.todos.len() == before {
            debug!(
                "event=delete_todo module=store status=missed event_id={event_id} todo_id={todo_id}"
            );
            return &self.document;
        }

        self.persist();
        &self.document
    }

    /// Replaces a todo's text verbatim. No trim, no blank-text rejection.
    pub fn update_todo_text(
        &mut self,
        event_id: &str,
        todo_id: &str,
        new_text: &str,
    ) -> &LifeDocument {
        let Some(todo) = self
            .document
            .find_event_mut(event_id)
            .and_then(|event| event.todos.iter_mut().find(|todo| todo.id == todo_id))
        else {
            debug!(
                "event=update_todo_text module=store status=missed event_id={event_id} todo_id={todo_id}"
            );
            return &self.document;
        };
        todo.text = new_text.to_string();

        self.persist();
        &self.document
    }

    /// Fire-and-forget write-through. A failed save is logged and otherwise
    /// ignored; the in-memory document remains authoritative.
    fn persist(&self) {
        if let Err(err) = self.repo.save(&self.key, &self.document) {
            warn!(
                "event=doc_save module=store status=error key={} error={err}",
                self.key
            );
        }
    }
}
