use pavelife_core::db::DbError;
use pavelife_core::{
    DocumentRepository, LifeDocument, LifeStore, MemoryDocumentRepository, RepoError, RepoResult,
    DEFAULT_DOCUMENT_KEY,
};
use std::cell::Cell;

fn seeded_store(repo: &MemoryDocumentRepository) -> LifeStore<&MemoryDocumentRepository> {
    LifeStore::open(repo, DEFAULT_DOCUMENT_KEY)
}

#[test]
fn open_with_empty_slot_seeds_and_persists_immediately() {
    let repo = MemoryDocumentRepository::new();
    let store = seeded_store(&repo);

    assert_eq!(store.document(), &LifeDocument::seed());

    let body = repo
        .raw(DEFAULT_DOCUMENT_KEY)
        .expect("seed must be written on first open");
    let persisted: LifeDocument = serde_json::from_str(&body).unwrap();
    assert_eq!(persisted, LifeDocument::seed());
}

#[test]
fn open_with_corrupt_slot_recovers_with_seed() {
    let repo = MemoryDocumentRepository::new();
    repo.insert_raw(DEFAULT_DOCUMENT_KEY, "{not json at all");

    let store = seeded_store(&repo);
    assert_eq!(store.document(), &LifeDocument::seed());
}

#[test]
fn add_event_keeps_events_sorted_with_stable_ties() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.add_event(20, "就職");
    store.add_event(16, "引っ越し");
    store.add_event(20, "一人暮らし");

    let ages: Vec<u32> = store.document().events.iter().map(|e| e.age).collect();
    assert_eq!(ages, vec![16, 16, 20, 20, 20]);

    let titles: Vec<&str> = store
        .document()
        .events
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    // Existing equal-age events stay ahead of later insertions.
    assert_eq!(
        titles,
        vec!["高校時代", "引っ越し", "大学時代", "就職", "一人暮らし"]
    );
}

#[test]
fn add_event_rejects_blank_titles() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);
    let before = store.document().clone();

    store.add_event(25, "");
    store.add_event(25, "   ");

    assert_eq!(store.document(), &before);
}

#[test]
fn add_event_stores_the_title_verbatim() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.add_event(25, "  独立  ");

    let added = store
        .document()
        .events
        .iter()
        .find(|e| e.age == 25)
        .unwrap();
    // Trimming applies to the blank check only; the stored title keeps its
    // surrounding whitespace, matching the original client's blob.
    assert_eq!(added.title, "  独立  ");
    assert!(added.todos.is_empty());
}

#[test]
fn update_event_stores_the_title_verbatim() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.update_event("evt-1", 16, " 高専時代 ");

    let updated = store.document().find_event("evt-1").unwrap();
    assert_eq!(updated.title, " 高専時代 ");
}

#[test]
fn seed_plus_age_18_event_lands_between_seed_events() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.add_event(18, "留学");

    let shape: Vec<(u32, &str)> = store
        .document()
        .events
        .iter()
        .map(|e| (e.age, e.title.as_str()))
        .collect();
    assert_eq!(
        shape,
        vec![(16, "高校時代"), (18, "留学"), (20, "大学時代")]
    );
}

#[test]
fn delete_event_removes_event_and_is_idempotent() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.delete_event("evt-1");
    assert_eq!(store.document().events.len(), 1);
    assert_eq!(store.document().events[0].id, "evt-2");
    // Remaining event's todos are untouched.
    assert_eq!(store.document().events[0].todos.len(), 1);
    // Future paths see no cascade.
    assert_eq!(store.document().future_paths.len(), 2);

    let after_first = store.document().clone();
    store.delete_event("evt-1");
    assert_eq!(store.document(), &after_first);
}

#[test]
fn update_event_replaces_age_and_title_and_resorts() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.update_event("evt-1", 22, "社会人");

    let shape: Vec<(u32, &str, &str)> = store
        .document()
        .events
        .iter()
        .map(|e| (e.age, e.title.as_str(), e.id.as_str()))
        .collect();
    assert_eq!(
        shape,
        vec![(20, "大学時代", "evt-2"), (22, "社会人", "evt-1")]
    );
    // Todos travel with the event.
    let updated = store.document().find_event("evt-1").unwrap();
    assert_eq!(updated.todos.len(), 2);
}

#[test]
fn update_event_rejects_blank_title_and_unknown_id() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);
    let before = store.document().clone();

    store.update_event("evt-1", 99, "   ");
    store.update_event("evt-404", 30, "存在しない");

    assert_eq!(store.document(), &before);
}

#[test]
fn add_todo_appends_uncompleted_with_fresh_id() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.add_todo("evt-2", "新しい目標");

    let event = store.document().find_event("evt-2").unwrap();
    assert_eq!(event.todos.len(), 2);
    let added = &event.todos[1];
    assert_eq!(added.text, "新しい目標");
    assert!(!added.is_completed);
    assert_ne!(added.id, "todo-3");
}

#[test]
fn add_todo_accepts_empty_text_unlike_event_titles() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.add_todo("evt-2", "");

    let event = store.document().find_event("evt-2").unwrap();
    assert_eq!(event.todos.len(), 2);
    assert_eq!(event.todos[1].text, "");
}

#[test]
fn add_todo_on_unknown_event_is_a_no_op() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);
    let before = store.document().clone();

    store.add_todo("evt-404", "宙に浮く");

    assert_eq!(store.document(), &before);
}

#[test]
fn toggle_todo_twice_restores_original_state() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);
    let before = store.document().clone();

    store.toggle_todo("evt-1", "todo-1");
    let flipped = store.document().find_event("evt-1").unwrap();
    assert!(!flipped.todos[0].is_completed);
    // Only the flag moved.
    assert_eq!(flipped.todos[0].text, "部活を頑張る");

    store.toggle_todo("evt-1", "todo-1");
    assert_eq!(store.document(), &before);
}

#[test]
fn toggle_todo_with_unknown_ids_is_a_no_op() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);
    let before = store.document().clone();

    store.toggle_todo("evt-404", "todo-1");
    store.toggle_todo("evt-1", "todo-404");

    assert_eq!(store.document(), &before);
}

#[test]
fn delete_todo_preserves_order_of_the_rest() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);
    store.add_todo("evt-1", "三つ目");

    store.delete_todo("evt-1", "todo-1");

    let event = store.document().find_event("evt-1").unwrap();
    let texts: Vec<&str> = event.todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["初めてのバイト", "三つ目"]);
}

#[test]
fn update_todo_text_replaces_text_verbatim() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.update_todo_text("evt-2", "todo-3", "  余白ごと  ");
    let event = store.document().find_event("evt-2").unwrap();
    assert_eq!(event.todos[0].text, "  余白ごと  ");

    // Empty text is allowed, mirroring add_todo.
    store.update_todo_text("evt-2", "todo-3", "");
    let event = store.document().find_event("evt-2").unwrap();
    assert_eq!(event.todos[0].text, "");
    assert!(!event.todos[0].is_completed);
}

#[test]
fn accepted_mutations_are_written_through() {
    let repo = MemoryDocumentRepository::new();
    let mut store = seeded_store(&repo);

    store.add_event(18, "留学");

    let body = repo.raw(DEFAULT_DOCUMENT_KEY).unwrap();
    let persisted: LifeDocument = serde_json::from_str(&body).unwrap();
    assert_eq!(&persisted, store.document());
}

/// Repository whose slot always rejects writes, simulating quota exhaustion.
struct FailingRepository;

impl DocumentRepository for FailingRepository {
    fn load(&self, _key: &str) -> RepoResult<Option<LifeDocument>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _document: &LifeDocument) -> RepoResult<()> {
        let err = serde_json::from_str::<LifeDocument>("quota exceeded").unwrap_err();
        Err(RepoError::Serialize(err))
    }
}

/// Repository whose backing storage cannot be reached at all: loads error
/// out instead of reporting an empty slot, and save attempts are counted.
struct UnreachableRepository {
    save_attempts: Cell<usize>,
}

impl DocumentRepository for UnreachableRepository {
    fn load(&self, _key: &str) -> RepoResult<Option<LifeDocument>> {
        Err(RepoError::Db(DbError::Sqlite(
            rusqlite::Error::QueryReturnedNoRows,
        )))
    }

    fn save(&self, _key: &str, _document: &LifeDocument) -> RepoResult<()> {
        self.save_attempts.set(self.save_attempts.get() + 1);
        Ok(())
    }
}

#[test]
fn load_transport_failure_seeds_without_writing_the_slot() {
    let repo = UnreachableRepository {
        save_attempts: Cell::new(0),
    };

    let store = LifeStore::open(&repo, DEFAULT_DOCUMENT_KEY);

    assert_eq!(store.document(), &LifeDocument::seed());
    // Unlike the empty-slot path, an unreachable store gets no initial
    // seed write.
    assert_eq!(repo.save_attempts.get(), 0);
}

#[test]
fn save_failure_never_blocks_the_in_memory_mutation() {
    let mut store = LifeStore::open(FailingRepository, DEFAULT_DOCUMENT_KEY);

    store.add_event(18, "留学");

    let ages: Vec<u32> = store.document().events.iter().map(|e| e.age).collect();
    assert_eq!(ages, vec![16, 18, 20]);
}
