//! Process-local note table.
//!
//! Used by tests and demos where no database file is wanted.

use super::{NoteRepository, RepoError, RepoResult};
use crate::model::note::{now_epoch_ms, Note, NoteDraft, NoteId, NotePatch, UserId};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Table {
    next_seq: u64,
    rows: Vec<(u64, Note)>,
}

/// In-memory `NoteRepository`.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    table: Mutex<Table>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored row for `id`, if any.
    pub fn get(&self, id: NoteId) -> Option<Note> {
        let table = self.table.lock().ok()?;
        table
            .rows
            .iter()
            .find(|(_, note)| note.id == id)
            .map(|(_, note)| note.clone())
    }

    /// Number of stored rows across all owners.
    pub fn len(&self) -> usize {
        self.table.lock().map_or(0, |table| table.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| RepoError::Unavailable("in-memory table lock poisoned".to_string()))
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert_note(&self, draft: &NoteDraft) -> RepoResult<Note> {
        draft.validate()?;
        let now = now_epoch_ms();
        let note = Note {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            summary: None,
            created_at: now,
            updated_at: now,
            owner_id: draft.owner_id,
        };

        let mut table = self.lock()?;
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.push((seq, note.clone()));
        Ok(note)
    }

    async fn list_notes_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>> {
        let table = self.lock()?;
        let mut owned = table
            .rows
            .iter()
            .filter(|(_, note)| note.owner_id == owner_id)
            .collect::<Vec<_>>();
        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            b.updated_at.cmp(&a.updated_at).then(seq_b.cmp(seq_a))
        });
        Ok(owned.into_iter().map(|(_, note)| note.clone()).collect())
    }

    async fn update_note(
        &self,
        owner_id: UserId,
        id: NoteId,
        patch: &NotePatch,
        updated_at: i64,
    ) -> RepoResult<()> {
        patch.validate()?;
        let mut table = self.lock()?;
        if let Some((_, note)) = table
            .rows
            .iter_mut()
            .find(|(_, note)| note.id == id && note.owner_id == owner_id)
        {
            note.apply_patch(patch, updated_at);
        }
        Ok(())
    }

    async fn delete_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<()> {
        let mut table = self.lock()?;
        table
            .rows
            .retain(|(_, note)| note.id != id || note.owner_id != owner_id);
        Ok(())
    }
}
