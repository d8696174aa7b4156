//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod summarize;

pub use auth::{AuthProvider, SessionAuth};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NotePatch, NoteValidationError, UserId};
pub use repo::{InMemoryNoteRepository, NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use store::{
    NoteStore, StoreError, StoreResult, StoreState, ViewType, NOTE_NOT_FOUND_MESSAGE,
    SUMMARY_FAILED_MESSAGE,
};
pub use summarize::{
    extractive_summary, ExtractiveSummarizer, SummarizeError, SummarizeResult, Summarizer,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
