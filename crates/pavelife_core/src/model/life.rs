//! Life document entities and structural validation.
//!
//! # Responsibility
//! - Define `Todo`, `AgeEvent`, `FuturePath` and the root `LifeDocument`.
//! - Provide the seed document used when no valid stored copy exists.
//!
//! # Invariants
//! - Serde names match the persisted JSON verbatim (`birthDate`,
//!   `isCompleted`, `futurePaths`, ...) for compatibility with existing blobs.
//! - `events` is sorted ascending by `age`; equal ages keep insertion order.
//! - Event titles are never blank in a valid document; todo text may be empty.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Returns a fresh globally-unique entity id.
///
/// Ids stay plain strings rather than a `Uuid` newtype: the seed document
/// carries short hand-written ids (`evt-1`, `todo-1`) that must round-trip
/// unchanged.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// One to-do item owned by exactly one [`AgeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

impl Todo {
    /// Creates an uncompleted todo with a fresh id.
    ///
    /// Empty `text` is accepted; only event titles carry a non-blank rule.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            text: text.into(),
            is_completed: false,
        }
    }
}

/// A titled milestone pinned to an age, holding its own to-do list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeEvent {
    pub id: String,
    pub age: u32,
    pub title: String,
    pub todos: Vec<Todo>,
}

impl AgeEvent {
    /// Creates an event with a fresh id and no todos.
    ///
    /// Callers are responsible for rejecting blank titles before insertion.
    pub fn new(age: u32, title: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            age,
            title: title.into(),
            todos: Vec::new(),
        }
    }
}

/// A named hypothetical branch from the present age. Read-only: no mutation
/// operations exist for future paths in this version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuturePath {
    pub id: String,
    pub title: String,
    pub memos: String,
}

/// The complete persisted state: birth/age metadata, events, future paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeDocument {
    /// `YYYY-MM-DD`. Kept as a plain string; never parsed by core logic.
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    /// Externally supplied, not derived from `birth_date`.
    #[serde(rename = "currentAge")]
    pub current_age: u32,
    #[serde(rename = "lifeExpectancy")]
    pub life_expectancy: u32,
    pub events: Vec<AgeEvent>,
    #[serde(rename = "futurePaths")]
    pub future_paths: Vec<FuturePath>,
}

/// Structural invariant violation found in a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// `lifeExpectancy` must be positive.
    NonPositiveLifeExpectancy,
    /// Event title is empty or whitespace-only.
    BlankEventTitle { event_id: String },
    /// Two events share one id.
    DuplicateEventId { event_id: String },
    /// Two todos inside one event share one id.
    DuplicateTodoId { event_id: String, todo_id: String },
    /// Events are not sorted ascending by age.
    UnsortedEvents,
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveLifeExpectancy => {
                write!(f, "life expectancy must be greater than zero")
            }
            Self::BlankEventTitle { event_id } => {
                write!(f, "event {event_id} has a blank title")
            }
            Self::DuplicateEventId { event_id } => {
                write!(f, "duplicate event id: {event_id}")
            }
            Self::DuplicateTodoId { event_id, todo_id } => {
                write!(f, "duplicate todo id {todo_id} in event {event_id}")
            }
            Self::UnsortedEvents => write!(f, "events are not sorted by age"),
        }
    }
}

impl Error for DocumentValidationError {}

impl LifeDocument {
    /// Returns the seed document used when storage is empty or unreadable.
    ///
    /// Field values mirror the original app's initial data exactly, so a
    /// reimplemented client reads/writes the same blob.
    pub fn seed() -> Self {
        Self {
            birth_date: "2006-01-01".to_string(),
            current_age: 18,
            life_expectancy: 80,
            events: vec![
                AgeEvent {
                    id: "evt-1".to_string(),
                    age: 16,
                    title: "高校時代".to_string(),
                    todos: vec![
                        Todo {
                            id: "todo-1".to_string(),
                            text: "部活を頑張る".to_string(),
                            is_completed: true,
                        },
                        Todo {
                            id: "todo-2".to_string(),
                            text: "初めてのバイト".to_string(),
                            is_completed: false,
                        },
                    ],
                },
                AgeEvent {
                    id: "evt-2".to_string(),
                    age: 20,
                    title: "大学時代".to_string(),
                    todos: vec![Todo {
                        id: "todo-3".to_string(),
                        text: "プログラミングの勉強".to_string(),
                        is_completed: false,
                    }],
                },
            ],
            future_paths: vec![
                FuturePath {
                    id: "path-1".to_string(),
                    title: "Aの道".to_string(),
                    memos: "Aの道に進んだ場合のメモ".to_string(),
                },
                FuturePath {
                    id: "path-2".to_string(),
                    title: "Bの道".to_string(),
                    memos: "Bの道に進んだ場合のメモ".to_string(),
                },
            ],
        }
    }

    /// Looks up an event by id.
    pub fn find_event(&self, event_id: &str) -> Option<&AgeEvent> {
        self.events.iter().find(|event| event.id == event_id)
    }

    pub(crate) fn find_event_mut(&mut self, event_id: &str) -> Option<&mut AgeEvent> {
        self.events.iter_mut().find(|event| event.id == event_id)
    }

    /// Re-establishes ascending age order.
    ///
    /// `sort_by_key` is stable, so events appended after existing equal-age
    /// events stay behind them.
    pub(crate) fn sort_events(&mut self) {
        self.events.sort_by_key(|event| event.age);
    }

    /// Checks structural invariants on a document read back from storage.
    ///
    /// Mutation paths uphold these by construction; the load path uses this
    /// to treat an invariant-violating blob the same as a corrupt one.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.life_expectancy == 0 {
            return Err(DocumentValidationError::NonPositiveLifeExpectancy);
        }

        let mut event_ids = HashSet::new();
        for event in &self.events {
            if event.title.trim().is_empty() {
                return Err(DocumentValidationError::BlankEventTitle {
                    event_id: event.id.clone(),
                });
            }
            if !event_ids.insert(event.id.as_str()) {
                return Err(DocumentValidationError::DuplicateEventId {
                    event_id: event.id.clone(),
                });
            }

            let mut todo_ids = HashSet::new();
            for todo in &event.todos {
                if !todo_ids.insert(todo.id.as_str()) {
                    return Err(DocumentValidationError::DuplicateTodoId {
                        event_id: event.id.clone(),
                        todo_id: todo.id.clone(),
                    });
                }
            }
        }

        let sorted = self.events.windows(2).all(|pair| pair[0].age <= pair[1].age);
        if !sorted {
            return Err(DocumentValidationError::UnsortedEvents);
        }

        Ok(())
    }
}
