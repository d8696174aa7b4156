//! Persistence collaborator contract and implementations.
//!
//! # Responsibility
//! - Define the owner-scoped note table operations the store relies on.
//! - Isolate SQL details from store orchestration.
//!
//! # Invariants
//! - Inserts validate the draft before writing and assign id + timestamps.
//! - Owner listings are ordered by `updated_at DESC`, newest insert first on
//!   ties.
//! - Every write is scoped to the owner: update and delete match on
//!   `id` and `user_id` together.
//! - Update and delete of a missing or foreign id are silent no-ops, matching
//!   a remote `UPDATE/DELETE ... WHERE id = ? AND user_id = ?` that affects
//!   zero rows.
//! - Every call reports failure through `RepoResult`; nothing panics.

pub mod memory_repo;
pub mod note_repo;

use crate::db::DbError;
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch, NoteValidationError, UserId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory_repo::InMemoryNoteRepository;
pub use note_repo::SqliteNoteRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence calls.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    /// Stored data could not be mapped back to a `Note`.
    InvalidData(String),
    /// Backend rejected the call or is unreachable.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::Unavailable(message) => write!(f, "note storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
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

/// Remote note table keyed by `id`.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Inserts one note and returns the stored row.
    async fn insert_note(&self, draft: &NoteDraft) -> RepoResult<Note>;
    /// Lists all notes owned by `owner_id`, most recently updated first.
    async fn list_notes_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>>;
    /// Applies `patch` and stamps `updated_at` on the row with `id` owned by
    /// `owner_id`.
    async fn update_note(
        &self,
        owner_id: UserId,
        id: NoteId,
        patch: &NotePatch,
        updated_at: i64,
    ) -> RepoResult<()>;
    /// Deletes the row with `id` owned by `owner_id`.
    async fn delete_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<()>;
}
