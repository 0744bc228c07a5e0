//! `tagstore` CLI: move tag trees between JSON and YAML configuration files.
//!
//! ## Usage
//!
//! ```sh
//! # Explode a JSON tag tree into a YAML file under `mobs.boss`
//! tagstore import -c mobs.yml -p mobs.boss -i boss.json
//!
//! # Same, reading the tree from stdin
//! cat boss.json | tagstore import -c mobs.yml -p mobs.boss
//!
//! # Reassemble the tree and print it as JSON
//! tagstore export -c mobs.yml -p mobs.boss
//!
//! # List the direct children of a path
//! tagstore keys -c mobs.yml -p mobs
//!
//! # Verify that a path decodes cleanly (exit status 1 if not)
//! tagstore check -c mobs.yml -p mobs.boss
//! ```
//!
//! Trees use the adjacently tagged JSON form, e.g.
//! `{"health": {"type": "int", "value": 250}}`. Set `RUST_LOG=debug` to trace
//! encoding and decoding.

use std::io::{self, Read};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tagstore_core::{Compound, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "tagstore",
    version,
    about = "Import, export and check tag trees stored in YAML configuration files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON tag tree into the configuration file
    Import {
        /// YAML configuration file (created if missing)
        #[arg(short, long)]
        config: String,
        /// Dotted path to write the tree under (empty for the document root)
        #[arg(short, long, default_value = "")]
        path: String,
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Decode a tag tree from the configuration file as JSON
    Export {
        /// YAML configuration file
        #[arg(short, long)]
        config: String,
        /// Dotted path the tree is stored under
        #[arg(short, long, default_value = "")]
        path: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the direct children of a path
    Keys {
        /// YAML configuration file
        #[arg(short, long)]
        config: String,
        /// Dotted path to list
        #[arg(short, long, default_value = "")]
        path: String,
    },
    /// Verify that a stored tag tree decodes cleanly
    Check {
        /// YAML configuration file
        #[arg(short, long)]
        config: String,
        /// Dotted path the tree is stored under
        #[arg(short, long, default_value = "")]
        path: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagstore=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            config,
            path,
            input,
        } => {
            let json = read_input(input.as_deref())?;
            let tree: Compound =
                serde_json::from_str(&json).context("Failed to parse JSON tag tree")?;

            let mut settings = Settings::open_file(&config)
                .with_context(|| format!("Failed to open configuration: {}", config))?;
            settings
                .set_tag_compound(&path, &tree)
                .with_context(|| format!("Failed to encode tag tree at '{}'", path))?;
            settings
                .save()
                .with_context(|| format!("Failed to save configuration: {}", config))?;
            tracing::info!(
                config = %config,
                path = %path,
                fields = tree.len(),
                "imported tag tree"
            );
        }
        Commands::Export {
            config,
            path,
            output,
        } => {
            let settings = open_existing(&config)?;
            let tree = settings
                .get_tag_compound(&path)
                .with_context(|| format!("Failed to decode tag tree at '{}'", path))?;
            let pretty = serde_json::to_string_pretty(&tree)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Keys { config, path } => {
            let settings = open_existing(&config)?;
            for key in settings.keys(&path) {
                println!("{}", key);
            }
        }
        Commands::Check { config, path } => {
            let settings = open_existing(&config)?;
            match settings.get_tag_compound(&path) {
                Ok(tree) => println!("ok: {} fields", tree.len()),
                Err(e) => {
                    eprintln!("Configuration corrupt in {} at '{}': {}", config, path, e);
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Open a configuration file that must already exist.
fn open_existing(config: &str) -> Result<Settings> {
    if !Path::new(config).exists() {
        anyhow::bail!("Configuration file not found: {}", config);
    }
    Settings::open_file(config)
        .with_context(|| format!("Failed to open configuration: {}", config))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
