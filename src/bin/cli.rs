//! AtlasConfig CLI
//!
//! Command-line interface for inspecting and editing a settings table file.

use std::path::PathBuf;
use std::sync::Arc;

use atlasconfig::config::{DEFAULT_FORMAT_COLUMN, DEFAULT_KEY_COLUMN, DEFAULT_VALUE_COLUMN};
use atlasconfig::{FileTable, Result, Settings, SourceOptions};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// AtlasConfig CLI
#[derive(Parser, Debug)]
#[command(name = "atlasconfig-cli")]
#[command(about = "CLI for AtlasConfig settings tables")]
#[command(version)]
struct Args {
    /// Settings table file
    #[arg(short, long, default_value = "./settings.tbl")]
    table: PathBuf,

    /// Column holding setting keys
    #[arg(long, default_value = DEFAULT_KEY_COLUMN)]
    key_column: String,

    /// Column holding stored values
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    value_column: String,

    /// Column holding format tags
    #[arg(long, default_value = DEFAULT_FORMAT_COLUMN)]
    format_column: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty table file with the configured columns
    Init,

    /// Print a setting's value
    Get {
        /// The key to get
        key: String,
    },

    /// Set a setting and save it to the table
    Set {
        /// The key to set
        key: String,

        /// The value, in its stored form
        value: String,

        /// Format tag: string, array, hash, boolean, integer or float
        #[arg(short, long, default_value = "string")]
        format: String,
    },

    /// List every key
    Keys,

    /// Print every setting as `key (format) = value`
    Dump,

    /// Delete a setting's rows from the table
    Remove {
        /// The key to remove
        key: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atlasconfig=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match &args.command {
        Commands::Init => {
            FileTable::create(
                &args.table,
                [&args.key_column, &args.value_column, &args.format_column],
            )?;
            println!("Created {}", args.table.display());
        }
        Commands::Get { key } => {
            let (_, settings) = open_settings(&args)?;
            match settings.get(key) {
                Some(value) => println!("{}", value),
                None => {
                    eprintln!("(not found)");
                    std::process::exit(2);
                }
            }
        }
        Commands::Set { key, value, format } => {
            let (_, settings) = open_settings(&args)?;
            settings.set_key(key, value, format)?;
            let report = settings.save()?;
            println!("OK ({} created, {} updated)", report.created, report.updated);
        }
        Commands::Keys => {
            let (_, settings) = open_settings(&args)?;
            let mut keys = settings.keys();
            keys.sort();
            for key in keys {
                println!("{}", key);
            }
        }
        Commands::Dump => {
            let (_, settings) = open_settings(&args)?;
            for (key, value) in settings.snapshot() {
                if let Some(entry) = settings.entry(&key) {
                    println!("{} ({}) = {}", key, entry.format, value);
                }
            }
        }
        Commands::Remove { key } => {
            let (table, _) = open_settings(&args)?;
            let removed = table.delete(&args.key_column, key)?;
            println!("Removed {} row(s)", removed);
        }
    }

    Ok(())
}

/// Open the table file and load it into a settings cache
fn open_settings(args: &Args) -> Result<(Arc<FileTable>, Settings)> {
    let table = Arc::new(FileTable::open(&args.table)?);
    let settings = Settings::with_options(
        SourceOptions::builder()
            .table(table.clone())
            .key_column(&args.key_column)
            .value_column(&args.value_column)
            .format_column(&args.format_column)
            .build(),
    );
    settings.load()?;
    Ok((table, settings))
}
