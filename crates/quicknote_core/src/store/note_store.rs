//! Note store operations.
//!
//! # Responsibility
//! - Load, create, edit and delete the current user's notes through the
//!   repository and mirror the results into the observable state.
//! - Summarize a note and persist the summary through `update_note`.
//!
//! # Invariants
//! - Every operation returns `StoreResult`; failures are logged and leave
//!   local state unchanged, except an unauthenticated fetch which clears the
//!   list.
//! - `summarize_note` on an id missing from the local list makes no
//!   repository call.
//! - Reads and writes are scoped to the current user; writes without a
//!   signed-in user fail with `Unauthenticated` before any repository call.
//! - No per-note ordering: concurrent writes to one note are last-write-wins.

use super::state::{BusyGuard, StoreState, ViewType};
use crate::auth::AuthProvider;
use crate::model::note::{now_epoch_ms, Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
use crate::repo::{NoteRepository, RepoError};
use crate::summarize::{SummarizeError, Summarizer};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicUsize;
use tokio::sync::watch;

/// Message returned by `summarize_note_message` for an unknown id.
pub const NOTE_NOT_FOUND_MESSAGE: &str = "Note not found";
/// Message returned by `summarize_note_message` for any other failure.
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to generate summary";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of one store operation.
#[derive(Debug)]
pub enum StoreError {
    /// No current user could be resolved.
    Unauthenticated,
    /// The id is not present in the local note list.
    NotFound(NoteId),
    /// Title or content is blank.
    Validation(NoteValidationError),
    /// Repository call failed.
    Persistence(RepoError),
    /// Summarizer backend failed.
    Summarize(SummarizeError),
}

impl StoreError {
    /// Sentinel string used by summarize flows in place of an error value.
    pub fn sentinel_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => NOTE_NOT_FOUND_MESSAGE,
            _ => SUMMARY_FAILED_MESSAGE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Persistence(_) => "persistence",
            Self::Summarize(_) => "summarize",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "user not authenticated"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::Summarize(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Summarize(err) => Some(err),
            Self::Unauthenticated | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Persistence(other),
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SummarizeError> for StoreError {
    fn from(value: SummarizeError) -> Self {
        Self::Summarize(value)
    }
}

/// Single source of truth for the signed-in user's notes and view state.
pub struct NoteStore<R: NoteRepository, A: AuthProvider, S: Summarizer> {
    repo: R,
    auth: A,
    summarizer: S,
    state: watch::Sender<StoreState>,
    in_flight: AtomicUsize,
}

impl<R: NoteRepository, A: AuthProvider, S: Summarizer> NoteStore<R, A, S> {
    /// Creates a store with an empty list, no selection, grid view, idle.
    pub fn new(repo: R, auth: A, summarizer: S) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            repo,
            auth,
            summarizer,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Clones the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state replacement.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.borrow().notes.clone()
    }

    pub fn find_note(&self, id: NoteId) -> Option<Note> {
        self.state.borrow().find_note(id).cloned()
    }

    pub fn selected_note(&self) -> Option<Note> {
        self.state.borrow().selected_note.clone()
    }

    pub fn view_type(&self) -> ViewType {
        self.state.borrow().view_type
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy
    }

    /// Replaces the list with the current user's notes, newest first.
    ///
    /// Returns the number of notes loaded.
    pub async fn fetch_notes(&self) -> StoreResult<usize> {
        let _busy = self.enter_busy();

        let Some(owner_id) = self.auth.current_user_id().await else {
            warn!("event=notes_fetch module=store status=skipped reason=unauthenticated");
            self.state.send_modify(|state| state.notes = Vec::new());
            return Err(StoreError::Unauthenticated);
        };

        match self.repo.list_notes_by_owner(owner_id).await {
            Ok(notes) => {
                let count = notes.len();
                self.state.send_modify(|state| state.notes = notes);
                info!("event=notes_fetch module=store status=ok count={count}");
                Ok(count)
            }
            Err(err) => Err(self.fail("notes_fetch", err.into())),
        }
    }

    /// Creates a note owned by the current user and puts it at the list head.
    pub async fn add_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let _busy = self.enter_busy();

        let Some(owner_id) = self.auth.current_user_id().await else {
            return Err(self.fail("note_add", StoreError::Unauthenticated));
        };

        let draft = NoteDraft::new(owner_id, title, content);
        if let Err(err) = draft.validate() {
            return Err(self.fail("note_add", err.into()));
        }

        match self.repo.insert_note(&draft).await {
            Ok(note) => {
                let created = note.clone();
                self.state.send_modify(|state| state.notes.insert(0, note));
                info!(
                    "event=note_add module=store status=ok note_id={}",
                    created.id
                );
                Ok(created)
            }
            Err(err) => Err(self.fail("note_add", err.into())),
        }
    }

    /// Persists `patch` on the current user's note, then mirrors it into the
    /// list and the selection.
    ///
    /// `updated_at` is refreshed even for an empty patch. A note owned by
    /// someone else is left untouched, remotely and locally.
    pub async fn update_note(&self, id: NoteId, patch: NotePatch) -> StoreResult<()> {
        let _busy = self.enter_busy();

        let Some(owner_id) = self.auth.current_user_id().await else {
            return Err(self.fail("note_update", StoreError::Unauthenticated));
        };

        if let Err(err) = patch.validate() {
            return Err(self.fail("note_update", err.into()));
        }

        let updated_at = now_epoch_ms();
        if let Err(err) = self.repo.update_note(owner_id, id, &patch, updated_at).await {
            return Err(self.fail("note_update", err.into()));
        }

        let owned = |note: &Note| note.id == id && note.owner_id == owner_id;
        self.state.send_modify(|state| {
            if let Some(note) = state.notes.iter_mut().find(|note| owned(note)) {
                note.apply_patch(&patch, updated_at);
            }
            if let Some(selected) = state.selected_note.as_mut().filter(|note| owned(note)) {
                selected.apply_patch(&patch, updated_at);
            }
        });
        info!("event=note_update module=store status=ok note_id={id}");
        Ok(())
    }

    /// Deletes the current user's note and drops it from the list and the
    /// selection.
    ///
    /// Deleting an id that no longer exists, or that belongs to someone
    /// else, succeeds without changes.
    pub async fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        let _busy = self.enter_busy();

        let Some(owner_id) = self.auth.current_user_id().await else {
            return Err(self.fail("note_delete", StoreError::Unauthenticated));
        };

        if let Err(err) = self.repo.delete_note(owner_id, id).await {
            return Err(self.fail("note_delete", err.into()));
        }

        let owned = |note: &Note| note.id == id && note.owner_id == owner_id;
        self.state.send_modify(|state| {
            state.notes.retain(|note| !owned(note));
            if state.selected_note.as_ref().is_some_and(|note| owned(note)) {
                state.selected_note = None;
            }
        });
        info!("event=note_delete module=store status=ok note_id={id}");
        Ok(())
    }

    pub fn set_selected_note(&self, note: Option<Note>) {
        self.state.send_modify(|state| state.selected_note = note);
    }

    pub fn set_view_type(&self, view_type: ViewType) {
        self.state.send_modify(|state| state.view_type = view_type);
    }

    /// Summarizes a locally loaded note and persists the summary.
    ///
    /// Returns the summary that was written.
    pub async fn summarize_note(&self, id: NoteId) -> StoreResult<String> {
        let _busy = self.enter_busy();

        let Some(content) = self.find_note(id).map(|note| note.content) else {
            return Err(self.fail("note_summarize", StoreError::NotFound(id)));
        };

        let summary = match self.summarizer.summarize(&content).await {
            Ok(summary) => summary,
            Err(err) => return Err(self.fail("note_summarize", err.into())),
        };

        self.update_note(id, NotePatch::summary(summary.clone()))
            .await?;
        info!(
            "event=note_summarize module=store status=ok note_id={id} summary_chars={}",
            summary.chars().count()
        );
        Ok(summary)
    }

    /// Like `summarize_note`, but reports failure as a sentinel message.
    pub async fn summarize_note_message(&self, id: NoteId) -> String {
        match self.summarize_note(id).await {
            Ok(summary) => summary,
            Err(err) => err.sentinel_message().to_string(),
        }
    }

    fn enter_busy(&self) -> BusyGuard<'_> {
        BusyGuard::enter(&self.in_flight, &self.state)
    }

    fn fail(&self, event: &'static str, err: StoreError) -> StoreError {
        match &err {
            StoreError::Unauthenticated | StoreError::NotFound(_) => warn!(
                "event={event} module=store status=skipped error_code={} error={err}",
                err.code()
            ),
            _ => error!(
                "event={event} module=store status=error error_code={} error={err}",
                err.code()
            ),
        }
        err
    }
}
