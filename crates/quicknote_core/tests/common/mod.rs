#![allow(dead_code)]

use async_trait::async_trait;
use quicknote_core::{
    ExtractiveSummarizer, InMemoryNoteRepository, Note, NoteDraft, NoteId, NotePatch,
    NoteRepository, NoteStore, RepoError, RepoResult, SessionAuth, SummarizeError,
    SummarizeResult, Summarizer, UserId,
};
use std::sync::Mutex;
use std::time::Duration;

pub type TestStore<S = ExtractiveSummarizer> = NoteStore<RecordingRepository, SessionAuth, S>;

/// In-memory repository that records calls and can fail selected operations.
#[derive(Default)]
pub struct RecordingRepository {
    inner: InMemoryNoteRepository,
    calls: Mutex<Vec<&'static str>>,
    updates: Mutex<Vec<(NoteId, NotePatch)>>,
    failing: Mutex<Vec<&'static str>>,
}

impl RecordingRepository {
    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().push(op);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(NoteId, NotePatch)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn stored(&self, id: NoteId) -> Option<Note> {
        self.inner.get(id)
    }

    pub fn inner(&self) -> &InMemoryNoteRepository {
        &self.inner
    }

    fn enter(&self, op: &'static str) -> RepoResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(RepoError::Unavailable(format!("{op} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteRepository for RecordingRepository {
    async fn insert_note(&self, draft: &NoteDraft) -> RepoResult<Note> {
        self.enter("insert")?;
        self.inner.insert_note(draft).await
    }

    async fn list_notes_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>> {
        self.enter("list")?;
        self.inner.list_notes_by_owner(owner_id).await
    }

    async fn update_note(
        &self,
        owner_id: UserId,
        id: NoteId,
        patch: &NotePatch,
        updated_at: i64,
    ) -> RepoResult<()> {
        self.enter("update")?;
        self.updates.lock().unwrap().push((id, patch.clone()));
        self.inner.update_note(owner_id, id, patch, updated_at).await
    }

    async fn delete_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<()> {
        self.enter("delete")?;
        self.inner.delete_note(owner_id, id).await
    }
}

/// Summarizer backend that always fails.
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _text: &str) -> SummarizeResult<String> {
        Err(SummarizeError::Backend("model offline".to_string()))
    }
}

pub fn signed_in_store() -> (TestStore, UserId) {
    signed_in_store_with(ExtractiveSummarizer::with_delay(Duration::ZERO))
}

pub fn signed_in_store_with<S: Summarizer>(summarizer: S) -> (TestStore<S>, UserId) {
    let user = uuid::Uuid::new_v4();
    let store = NoteStore::new(
        RecordingRepository::default(),
        SessionAuth::signed_in(user),
        summarizer,
    );
    (store, user)
}
