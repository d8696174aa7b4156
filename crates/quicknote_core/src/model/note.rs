//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its insert/patch payloads.
//! - Provide validation and list preview helpers shared by every layer.
//!
//! # Invariants
//! - `title` and `content` are never blank for a persisted note.
//! - `updated_at >= created_at`.
//! - `summary` is derived from some prior `content`, not necessarily the
//!   current one.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a note, assigned by the repository on insert.
pub type NoteId = Uuid;

/// Identifier of the user owning a note.
pub type UserId = Uuid;

/// Note record as stored by the repository and held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Extractive summary of an earlier `content` value.
    pub summary: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every mutation.
    pub updated_at: i64,
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
}

/// Insert payload for a new note. The repository assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
}

/// Field-wise note update. `None` leaves the field untouched.
///
/// Applying a patch always refreshes `updated_at`, even when every field is
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
}

/// Validation failures for note payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    BlankTitle,
    BlankContent,
    /// `updated_at` is earlier than `created_at`.
    InvalidTimestamps { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "note title cannot be blank"),
            Self::BlankContent => write!(f, "note content cannot be blank"),
            Self::InvalidTimestamps {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Validates field and timestamp invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::InvalidTimestamps {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Applies `patch` locally and stamps `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even with a skewed
    /// clock.
    pub fn apply_patch(&mut self, patch: &NotePatch, updated_at: i64) {
        if let Some(title) = patch.title.as_ref() {
            self.title = title.clone();
        }
        if let Some(content) = patch.content.as_ref() {
            self.content = content.clone();
        }
        if let Some(summary) = patch.summary.as_ref() {
            self.summary = Some(summary.clone());
        }
        self.updated_at = updated_at.max(self.created_at);
    }

    /// Short text shown in note lists.
    ///
    /// Always built from the content, with whitespace collapsed; a stored
    /// summary is flagged separately by callers. Cut text ends with `...`.
    pub fn preview(&self, max_chars: usize) -> String {
        let collapsed = self
            .content
            .split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= max_chars {
            return collapsed;
        }
        let mut truncated = collapsed.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

impl NoteDraft {
    pub fn new(owner_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Rejects blank title or content.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

impl NotePatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn summary(value: impl Into<String>) -> Self {
        Self {
            summary: Some(value.into()),
            ..Self::default()
        }
    }

    /// Rejects patched title/content values that are blank.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        Ok(())
    }

    /// Returns `true` when no field is patched.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.summary.is_none()
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

fn validate_title(title: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::BlankTitle);
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), NoteValidationError> {
    if content.trim().is_empty() {
        return Err(NoteValidationError::BlankContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft, NotePatch, NoteValidationError};
    use uuid::Uuid;

    fn sample_note() -> Note {
        Note {
            id: Uuid::new_v4(),
            title: "Groceries".to_string(),
            content: "Milk.  Eggs.\nBread.".to_string(),
            summary: None,
            created_at: 1_000,
            updated_at: 1_000,
            owner_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn draft_rejects_blank_fields() {
        let owner = Uuid::new_v4();
        assert_eq!(
            NoteDraft::new(owner, "  ", "body").validate(),
            Err(NoteValidationError::BlankTitle)
        );
        assert_eq!(
            NoteDraft::new(owner, "title", "\n\t").validate(),
            Err(NoteValidationError::BlankContent)
        );
        assert!(NoteDraft::new(owner, "title", "body").validate().is_ok());
    }

    #[test]
    fn apply_patch_touches_only_given_fields() {
        let mut note = sample_note();
        note.apply_patch(&NotePatch::summary("Milk."), 2_000);

        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "Milk.  Eggs.\nBread.");
        assert_eq!(note.summary.as_deref(), Some("Milk."));
        assert_eq!(note.updated_at, 2_000);
    }

    #[test]
    fn apply_patch_never_moves_updated_at_before_created_at() {
        let mut note = sample_note();
        note.apply_patch(&NotePatch::default(), 10);
        assert_eq!(note.updated_at, note.created_at);
        assert!(note.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_timestamps() {
        let mut note = sample_note();
        note.updated_at = 999;
        assert!(matches!(
            note.validate(),
            Err(NoteValidationError::InvalidTimestamps { .. })
        ));
    }

    #[test]
    fn preview_shows_content_and_truncates() {
        let mut note = sample_note();
        assert_eq!(note.preview(100), "Milk. Eggs. Bread.");
        assert_eq!(note.preview(5), "Milk....");

        note.summary = Some("Short.".to_string());
        assert_eq!(note.preview(100), "Milk. Eggs. Bread.");
    }

    #[test]
    fn patch_is_empty_only_without_fields() {
        assert!(NotePatch::default().is_empty());
        assert!(!NotePatch::title("t").is_empty());
        assert!(!NotePatch::summary("").is_empty());
    }

    #[test]
    fn patch_validation_rejects_blank_title() {
        assert_eq!(
            NotePatch::title(" ").validate(),
            Err(NoteValidationError::BlankTitle)
        );
        assert!(NotePatch::summary("").validate().is_ok());
    }

    #[test]
    fn note_serializes_owner_as_user_id() {
        let note = sample_note();
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("user_id").is_some());
        assert!(json.get("owner_id").is_none());
    }
}
