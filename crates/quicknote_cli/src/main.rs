//! QuickNote command-line entry point.
//!
//! # Responsibility
//! - Drive the note store against a local SQLite database for one user.
//! - Load the user's notes before every command, then run it.
//!
//! # Invariants
//! - Configuration precedence: flags, then `QUICKNOTE_*` env, then defaults.
//! - Store failures exit with status 1 after printing the error.

use clap::{Parser, Subcommand};
use log::info;
use quicknote_core::db::{open_db, open_db_in_memory};
use quicknote_core::{
    init_logging_from_config, CoreConfig, ExtractiveSummarizer, Note, NoteId, NotePatch,
    NoteStore, SessionAuth, SqliteNoteRepository, StoreError,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

const PREVIEW_CHARS: usize = 100;

type CliStore = NoteStore<SqliteNoteRepository, SessionAuth, ExtractiveSummarizer>;

#[derive(Debug, Parser)]
#[command(name = "quicknote", version, about = "Take notes and summarize them")]
struct Cli {
    /// SQLite database file (in-memory when omitted)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Id of the signed-in user
    #[arg(long, global = true)]
    user: Option<Uuid>,

    /// Absolute directory for rotated log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Artificial summarizer latency in milliseconds
    #[arg(long, global = true)]
    summary_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core version and a health probe
    Ping,
    /// List notes, most recently updated first
    List,
    /// Create a note
    Add { title: String, content: String },
    /// Edit a note's title and/or content
    Edit {
        id: NoteId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: NoteId },
    /// Summarize a note and store the summary
    Summarize { id: NoteId },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    init_logging_from_config(&config)?;

    if let Command::Ping = cli.command {
        println!("quicknote_core ping={}", quicknote_core::ping());
        println!("quicknote_core version={}", quicknote_core::core_version());
        return Ok(());
    }

    let store = open_store(&config, cli.user)?;
    info!("event=cli_start module=cli status=ok command={:?}", cli.command);

    match store.fetch_notes().await {
        Ok(_) | Err(StoreError::Unauthenticated) => {}
        Err(err) => return Err(err.into()),
    }

    match cli.command {
        Command::Ping => {}
        Command::List => {
            let notes = store.notes();
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for note in &notes {
                print_note_line(note);
            }
        }
        Command::Add { title, content } => {
            let note = store.add_note(title, content).await?;
            println!("{}", note.id);
        }
        Command::Edit { id, title, content } => {
            let patch = NotePatch {
                title,
                content,
                summary: None,
            };
            if patch.is_empty() {
                return Err("nothing to edit: pass --title and/or --content".into());
            }
            store.update_note(id, patch).await?;
            println!("updated {id}");
        }
        Command::Delete { id } => {
            store.delete_note(id).await?;
            println!("deleted {id}");
        }
        Command::Summarize { id } => {
            println!("{}", store.summarize_note_message(id).await);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, Box<dyn Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db.clone() {
        config.database_path = Some(db);
    }
    if let Some(dir) = cli.log_dir.clone() {
        config.log_dir = Some(dir);
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    if let Some(delay) = cli.summary_delay_ms {
        config.summary_delay_ms = delay;
    }
    Ok(config)
}

fn open_store(config: &CoreConfig, user: Option<Uuid>) -> Result<CliStore, Box<dyn Error>> {
    let conn = match config.database_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let auth = match user {
        Some(user_id) => SessionAuth::signed_in(user_id),
        None => SessionAuth::signed_out(),
    };
    Ok(NoteStore::new(
        SqliteNoteRepository::try_new(conn)?,
        auth,
        ExtractiveSummarizer::with_delay(config.summary_delay()),
    ))
}

fn print_note_line(note: &Note) {
    let marker = if note.summary.is_some() { "*" } else { " " };
    println!(
        "{} {marker} {}  {}",
        note.id,
        note.title,
        note.preview(PREVIEW_CHARS)
    );
}
