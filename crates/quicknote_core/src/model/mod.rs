//! Domain model for user-owned notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` and owned by one `UserId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
