//! SQLite-backed note repository.
//!
//! # Responsibility
//! - Persist notes in the `notes` table created by migrations.
//! - Map rows back to `Note`, rejecting malformed ids.
//!
//! # Invariants
//! - Every owner query and every write is constrained to `user_id = ?`.
//! - Listing order is `updated_at DESC, rowid DESC`.
//! - Patched columns use `COALESCE`, so `NULL` binds leave a column untouched.

use super::{NoteRepository, RepoError, RepoResult};
use crate::db::{ensure_table_ready, DbResult};
use crate::model::note::{now_epoch_ms, Note, NoteDraft, NoteId, NotePatch, UserId};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    content,
    summary,
    created_at,
    updated_at
FROM notes";

const NOTE_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "title",
    "content",
    "summary",
    "created_at",
    "updated_at",
];

/// `NoteRepository` over one migrated SQLite connection.
pub struct SqliteNoteRepository {
    conn: Mutex<Connection>,
}

impl SqliteNoteRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Fails when the `notes` table or one of its columns is missing.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        check_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

fn check_schema(conn: &Connection) -> DbResult<()> {
    ensure_table_ready(conn, "notes", NOTE_COLUMNS)
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
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

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO notes (
                id,
                user_id,
                title,
                content,
                summary,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6);",
            params![
                note.id.to_string(),
                note.owner_id.to_string(),
                note.title,
                note.content,
                note.created_at,
                note.updated_at,
            ],
        )
        .inspect_err(|err| {
            error!("event=note_insert module=repo status=error error={err}");
        })?;

        debug!("event=note_insert module=repo status=ok note_id={}", note.id);
        Ok(note)
    }

    async fn list_notes_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE user_id = ?1 ORDER BY updated_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    async fn update_note(
        &self,
        owner_id: UserId,
        id: NoteId,
        patch: &NotePatch,
        updated_at: i64,
    ) -> RepoResult<()> {
        patch.validate()?;
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE notes
             SET
                title = COALESCE(?2, title),
                content = COALESCE(?3, content),
                summary = COALESCE(?4, summary),
                updated_at = MAX(?5, created_at)
             WHERE id = ?1
               AND user_id = ?6;",
            params![
                id.to_string(),
                patch.title,
                patch.content,
                patch.summary,
                updated_at,
                owner_id.to_string(),
            ],
        )?;
        debug!("event=note_update module=repo status=ok note_id={id} rows={changed}");
        Ok(())
    }

    async fn delete_note(&self, owner_id: UserId, id: NoteId) -> RepoResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2;",
            [id.to_string(), owner_id.to_string()],
        )?;
        debug!("event=note_delete module=repo status=ok note_id={id} rows={changed}");
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("user_id")?;
    Ok(Note {
        id: parse_uuid(&id_text, "id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        summary: row.get("summary")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        owner_id: parse_uuid(&owner_text, "user_id")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in notes.{column}")))
}

#[cfg(test)]
mod tests {
    use super::SqliteNoteRepository;
    use crate::db::open_db_in_memory;
    use crate::model::note::{NoteDraft, NotePatch};
    use crate::repo::{NoteRepository, RepoError};
    use rusqlite::Connection;
    use uuid::Uuid;

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteNoteRepository::try_new(conn).err().unwrap();
        assert!(matches!(err, RepoError::Db(_)));
    }

    #[tokio::test]
    async fn patch_keeps_untouched_columns() {
        let repo = SqliteNoteRepository::try_new(open_db_in_memory().unwrap()).unwrap();
        let owner = Uuid::new_v4();
        let created = repo
            .insert_note(&NoteDraft::new(owner, "title", "body"))
            .await
            .unwrap();

        repo.update_note(owner, created.id, &NotePatch::summary("short"), created.created_at + 5)
            .await
            .unwrap();
        repo.update_note(owner, created.id, &NotePatch::title("renamed"), created.created_at + 9)
            .await
            .unwrap();

        let listed = repo.list_notes_by_owner(owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        assert_eq!(stored.title, "renamed");
        assert_eq!(stored.content, "body");
        assert_eq!(stored.summary.as_deref(), Some("short"));
        assert_eq!(stored.updated_at, created.created_at + 9);
    }

    #[tokio::test]
    async fn writes_from_another_owner_affect_no_rows() {
        let repo = SqliteNoteRepository::try_new(open_db_in_memory().unwrap()).unwrap();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let created = repo
            .insert_note(&NoteDraft::new(owner, "title", "body"))
            .await
            .unwrap();

        repo.update_note(intruder, created.id, &NotePatch::title("taken"), created.created_at + 5)
            .await
            .unwrap();
        repo.delete_note(intruder, created.id).await.unwrap();

        let listed = repo.list_notes_by_owner(owner).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn malformed_owner_id_is_reported_as_invalid_data() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO notes (id, user_id, title, content, created_at, updated_at)
             VALUES ('not-a-uuid', ?1, 't', 'c', 1, 1);",
            [Uuid::nil().to_string()],
        )
        .unwrap();
        let repo = SqliteNoteRepository::try_new(conn).unwrap();

        let err = repo.list_notes_by_owner(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
