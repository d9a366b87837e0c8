//! Grind Stories command-line tools.
//!
//! Provides the `grind` binary with subcommands that work directly on a
//! SQLite content database: listing articles, exporting subscribers, and
//! seeding a fresh database with sample articles.
//!
//! The export uses the same `grind_server::export` renderer as the HTTP
//! endpoint, so both produce identical files.

mod seed;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use grind_core::ArticleId;
use grind_server::export::subscribers_csv;
use grind_storage::{ContentStore, SqliteStore};

/// Grind Stories content tools.
#[derive(Parser)]
#[command(name = "grind", about = "Grind Stories content tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List stored articles, most recent first.
    Articles {
        /// Path to the content database file.
        #[arg(short, long)]
        db: String,
    },

    /// Export all subscribers as CSV.
    ExportSubscribers {
        /// Path to the content database file.
        #[arg(short, long)]
        db: String,

        /// Output file (default: stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Insert the sample articles that are missing.
    Seed {
        /// Path to the content database file.
        #[arg(short, long)]
        db: String,
    },
}

/// One line of `grind articles` output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleLine {
    id: ArticleId,
    title: String,
    author: String,
    publish_date: String,
    blocks: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Articles { db } => run_articles(&db),
        Commands::ExportSubscribers { db, out } => run_export(&db, out),
        Commands::Seed { db } => run_seed(&db),
    };
    process::exit(exit_code);
}

/// Opens the database. Exit code 3 on failure.
fn open_store(db_path: &str) -> Result<SqliteStore, i32> {
    SqliteStore::new(db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        3
    })
}

/// Execute the articles subcommand.
///
/// Prints a JSON array of article summaries to stdout.
fn run_articles(db_path: &str) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let articles = match store.load_articles() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: failed to load articles: {}", e);
            return 1;
        }
    };

    let lines: Vec<ArticleLine> = articles
        .into_iter()
        .map(|a| ArticleLine {
            blocks: a.content.len(),
            id: a.id,
            title: a.title,
            author: a.author,
            publish_date: a.publish_date,
        })
        .collect();

    match serde_json::to_string_pretty(&lines) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize articles: {}", e);
            1
        }
    }
}

/// Execute the export-subscribers subcommand.
///
/// Returns exit code: 0 = success, 1 = storage error, 3 = I/O error.
fn run_export(db_path: &str, out: Option<PathBuf>) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let subscribers = match store.list_subscribers() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to load subscribers: {}", e);
            return 1;
        }
    };

    let csv = match subscribers_csv(&subscribers) {
        Ok(csv) => csv,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, csv) {
                eprintln!("I/O error: failed to write {}: {}", path.display(), e);
                return 3;
            }
            tracing::info!(
                path = %path.display(),
                subscribers = subscribers.len(),
                "subscribers exported"
            );
            0
        }
        None => {
            println!("{}", csv);
            0
        }
    }
}

/// Execute the seed subcommand.
fn run_seed(db_path: &str) -> i32 {
    let mut store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match seed::seed(&mut store) {
        Ok(inserted) => {
            for id in &inserted {
                println!("inserted {}", id);
            }
            if inserted.is_empty() {
                println!("sample articles already present");
            }
            0
        }
        Err(e) => {
            eprintln!("Error: failed to seed articles: {}", e);
            1
        }
    }
}
