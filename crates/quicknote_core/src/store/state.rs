//! Observable store state.
//!
//! # Invariants
//! - Each mutation runs inside one `watch::Sender::send_modify` call, so
//!   readers observe whole snapshots only.
//! - `is_busy` is `true` while at least one async store operation is in
//!   flight.

use crate::model::note::{Note, NoteId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Note list layout preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    #[default]
    Grid,
    List,
}

/// Snapshot of everything the store owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Current user's notes, most recent first.
    pub notes: Vec<Note>,
    pub selected_note: Option<Note>,
    pub view_type: ViewType,
    pub is_busy: bool,
}

impl StoreState {
    pub fn find_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }
}

/// Marks the store busy for the guard's lifetime.
///
/// Concurrent guards nest: the flag clears when the last one drops. This is
/// an indicator, not a lock.
pub(crate) struct BusyGuard<'a> {
    in_flight: &'a AtomicUsize,
    state: &'a watch::Sender<StoreState>,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn enter(in_flight: &'a AtomicUsize, state: &'a watch::Sender<StoreState>) -> Self {
        state.send_modify(|current| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            current.is_busy = true;
        });
        Self { in_flight, state }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_modify(|current| {
            let previous = in_flight.fetch_sub(1, Ordering::SeqCst);
            current.is_busy = previous > 1;
        });
    }
}
