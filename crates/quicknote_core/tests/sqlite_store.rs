use quicknote_core::db::open_db;
use quicknote_core::{
    ExtractiveSummarizer, NotePatch, NoteStore, SessionAuth, SqliteNoteRepository,
};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

fn open_store(
    path: &Path,
    user: Uuid,
) -> NoteStore<SqliteNoteRepository, SessionAuth, ExtractiveSummarizer> {
    let repo = SqliteNoteRepository::try_new(open_db(path).unwrap()).unwrap();
    NoteStore::new(
        repo,
        SessionAuth::signed_in(user),
        ExtractiveSummarizer::with_delay(Duration::ZERO),
    )
}

#[tokio::test]
async fn notes_survive_reopen_in_most_recent_first_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let user = Uuid::new_v4();

    let (older, newer) = {
        let store = open_store(&path, user);
        let older = store.add_note("older", "First. Second. Third.").await.unwrap();
        let newer = store.add_note("newer", "Only one.").await.unwrap();
        (older, newer)
    };

    let store = open_store(&path, user);
    assert_eq!(store.fetch_notes().await.unwrap(), 2);
    let ids = store.notes().iter().map(|note| note.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn summary_and_edits_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let user = Uuid::new_v4();

    let note_id = {
        let store = open_store(&path, user);
        let note = store.add_note("plan", "A. B. C. D. E.").await.unwrap();
        assert_eq!(store.summarize_note(note.id).await.unwrap(), "A. C. E.");
        store
            .update_note(note.id, NotePatch::title("plan v2"))
            .await
            .unwrap();
        note.id
    };

    let store = open_store(&path, user);
    store.fetch_notes().await.unwrap();
    let stored = store.find_note(note_id).unwrap();
    assert_eq!(stored.title, "plan v2");
    assert_eq!(stored.summary.as_deref(), Some("A. C. E."));
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn delete_is_persisted_and_other_owners_are_invisible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();

    {
        let store = open_store(&path, other);
        store.add_note("not yours", "body").await.unwrap();
    }

    let store = open_store(&path, user);
    let note = store.add_note("mine", "body").await.unwrap();
    store.delete_note(note.id).await.unwrap();

    assert_eq!(store.fetch_notes().await.unwrap(), 0);
    assert!(store.notes().is_empty());
}

#[tokio::test]
async fn writes_by_another_owner_leave_the_row_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();

    let note = {
        let store = open_store(&path, owner);
        store.add_note("groceries", "Milk. Eggs.").await.unwrap()
    };

    {
        let store = open_store(&path, intruder);
        store
            .update_note(note.id, NotePatch::title("renamed by intruder"))
            .await
            .unwrap();
        store.delete_note(note.id).await.unwrap();
    }

    let store = open_store(&path, owner);
    assert_eq!(store.fetch_notes().await.unwrap(), 1);
    assert_eq!(store.notes(), vec![note]);
}
