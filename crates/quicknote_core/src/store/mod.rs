//! Note store: the state layer between callers and collaborators.
//!
//! # Responsibility
//! - Own the note list, selection, view preference and busy flag.
//! - Route every read/write through the repository and auth collaborators.
//!
//! # See also
//! - `crate::summarize` for the summary heuristic.

mod note_store;
mod state;

pub use note_store::{
    NoteStore, StoreError, StoreResult, NOTE_NOT_FOUND_MESSAGE, SUMMARY_FAILED_MESSAGE,
};
pub use state::{StoreState, ViewType};
