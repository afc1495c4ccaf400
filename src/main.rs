mod config;
mod error;
mod files;
mod parser;
mod record;
mod store;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{ParseLimits, Settings};
use crate::record::{IdentityField, ImportedRecord};
use crate::store::{RecordStore, SqliteStore};

#[derive(Parser)]
#[command(name = "starsheet", about = "Import pasted character sheets into structured records")]
struct Cli {
    /// SQLite database (overrides db_path from settings)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one sheet and print the record as JSON
    Parse {
        /// Sheet text file, or `-` for stdin
        input: String,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Parse sheets and save them to the database
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Stored records overview table
    List,
    /// Print one stored record as JSON
    Show { id: String },
    /// Write a stored record to a JSON file
    Export {
        id: String,
        /// Output path (default: <characterName>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Save a record from an exported JSON file
    Load { file: PathBuf },
    /// Show database statistics
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let db_path = cli.db.clone().unwrap_or_else(|| settings.db_path.clone());

    let result = match cli.command {
        Commands::Parse { input, compact } => {
            let text = read_input(&input)?;
            let record = parser::parse_document_with(&text, &settings.limits)?;
            let json = if compact {
                serde_json::to_string(&record)?
            } else {
                serde_json::to_string_pretty(&record)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Import { files } => {
            let store = SqliteStore::open(&db_path)?;
            println!("Importing {} sheets into {:?}...", files.len(), db_path);
            let counts = import_files(&store, &files, &settings.limits)?;
            println!("Imported {} sheets ({} failed).", counts.imported, counts.failed);
            Ok(())
        }
        Commands::List => {
            let store = SqliteStore::open(&db_path)?;
            let records = store.list_all()?;
            if records.is_empty() {
                println!("No records. Run 'import' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<28} | {:<37} | {:<16} | {:>6} | {:>6}",
                "#", "Name", "Id", "Modified", "Traits", "Powers"
            );
            println!("{}", "-".repeat(111));
            for (i, r) in records.iter().enumerate() {
                let modified = r
                    .last_modified
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>3} | {:<28} | {:<37} | {:<16} | {:>6} | {:>6}",
                    i + 1,
                    truncate(&r.name, 28),
                    r.id,
                    modified,
                    r.traits.len(),
                    r.powers.len()
                );
            }
            println!("\n{} records", records.len());
            Ok(())
        }
        Commands::Show { id } => {
            let store = SqliteStore::open(&db_path)?;
            let record = fetch(&store, &id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Export { id, output } => {
            let store = SqliteStore::open(&db_path)?;
            let record = fetch(&store, &id)?;
            let path = output.unwrap_or_else(|| PathBuf::from(files::export_file_name(&record)));
            files::write_record(&record, &path)?;
            println!("Exported {} to {:?}", record.name, path);
            Ok(())
        }
        Commands::Load { file } => {
            let store = SqliteStore::open(&db_path)?;
            let record = files::read_record(&file)?;
            store.put(&record)?;
            println!("Saved {} ({})", record.name, record.id);
            Ok(())
        }
        Commands::Stats => {
            let store = SqliteStore::open(&db_path)?;
            let records = store.list_all()?;
            let traits: usize = records.iter().map(|r| r.traits.len()).sum();
            let powers: usize = records.iter().map(|r| r.powers.len()).sum();
            let with_notes = records.iter().filter(|r| r.notes.is_some()).count();
            println!("Records:    {}", store.count()?);
            println!("Traits:     {}", traits);
            println!("Powers:     {}", powers);
            println!("With notes: {}", with_notes);
            println!("\n--- Identity fields set ---");
            for field in IdentityField::ALL {
                let set = records
                    .iter()
                    .filter(|r| r.identity.get(field).is_some())
                    .count();
                println!("  {:<20} {}", field.label(), set);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))
    }
}

fn fetch(store: &impl RecordStore, id: &str) -> Result<ImportedRecord> {
    store
        .get(id)?
        .with_context(|| format!("No record with id {}", id))
}

struct ImportCounts {
    imported: usize,
    failed: usize,
}

fn import_one(path: &Path, limits: &ParseLimits) -> Result<ImportedRecord> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(parser::parse_document_with(&text, limits)?)
}

fn import_files(
    store: &SqliteStore,
    paths: &[PathBuf],
    limits: &ParseLimits,
) -> Result<ImportCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ImportCounts { imported: 0, failed: 0 };

    for chunk in paths.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| (path, import_one(path, limits)))
            .collect();

        let mut records = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    counts.failed += 1;
                    pb.suspend(|| warn!(path = ?path, error = %e, "skipped sheet"));
                }
            }
        }

        counts.imported += store.put_many(&records)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!(imported = counts.imported, failed = counts.failed, "import finished");
    Ok(counts)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
