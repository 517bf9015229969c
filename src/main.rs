//! # Wordhoard CLI (`wordhoard`)
//!
//! The `wordhoard` binary drives the vocabulary engine against a JSON
//! snapshot store.
//!
//! ## Usage
//!
//! ```bash
//! wordhoard --config ./config/wordhoard.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wordhoard input add "<text>"` | Capture an expression, explanation, or image URL |
//! | `wordhoard input list` | List captured inputs |
//! | `wordhoard suggest <input-id>` | Generate candidates for an input |
//! | `wordhoard refine <suggestion-id> --keep <c>` | Keep only some candidates |
//! | `wordhoard collection create <name>` | Create a collection |
//! | `wordhoard entry save <input> <suggestion> <collection>` | Save an entry |
//! | `wordhoard entry search --query <q>` | Search entries |
//! | `wordhoard stats` | Collection, entry, and candidate counts |
//! | `wordhoard export <collection-id>` | Export a collection as JSON |
//!
//! ## Examples
//!
//! ```bash
//! wordhoard input add --kind expression "hello world"
//! wordhoard suggest 2b1c...
//! wordhoard collection create Greetings
//! wordhoard entry save 2b1c... 9f0e... 41aa... --tag casual --tag spoken
//! wordhoard entry search --collection 41aa... --query hey
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wordhoard::models::InputKind;
use wordhoard::{collections, config, entries, export, inputs, logging, stats};

/// Wordhoard command-line interface.
#[derive(Parser)]
#[command(
    name = "wordhoard",
    about = "Wordhoard — capture words and images, gather AI vocabulary alternatives, keep them in collections",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/wordhoard.toml`. A missing file means defaults
    /// (stub provider, store at `./data/wordhoard.json`).
    #[arg(long, global = true, default_value = "./config/wordhoard.toml")]
    config: PathBuf,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Capture and list inputs.
    Input {
        #[command(subcommand)]
        action: InputAction,
    },

    /// Generate suggestions for an input.
    ///
    /// Calls the configured provider once; failures are reported, not retried
    /// (the OpenAI provider retries transient HTTP errors on its own).
    Suggest {
        /// Input id.
        input_id: String,
    },

    /// Keep only the listed candidates of a suggestion.
    Refine {
        /// Suggestion id.
        suggestion_id: String,

        /// Candidate to keep (repeatable).
        #[arg(long = "keep", required = true)]
        keep: Vec<String>,
    },

    /// Manage collections.
    Collection {
        #[command(subcommand)]
        action: CollectionAction,
    },

    /// Save, list, search, tag, and delete entries.
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// Show collection, entry, and candidate counts.
    Stats,

    /// Export a collection and its entries as JSON.
    Export {
        /// Collection id.
        collection_id: String,

        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Input subcommands.
#[derive(Subcommand)]
enum InputAction {
    /// Capture new content.
    Add {
        /// Content text or image URL.
        content: String,

        /// `expression`, `explanation`, or `image`.
        #[arg(long, default_value = "expression")]
        kind: InputKind,
    },
    /// List inputs, oldest first.
    List,
}

/// Collection subcommands.
#[derive(Subcommand)]
enum CollectionAction {
    /// Create a collection.
    Create { name: String },
    /// Rename a collection.
    Rename { id: String, name: String },
    /// List collections, oldest first.
    List,
}

/// Entry subcommands.
#[derive(Subcommand)]
enum EntryAction {
    /// Save a suggestion for an input into a collection.
    Save {
        input_id: String,
        suggestion_id: String,
        collection_id: String,

        /// Tag to attach (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List a collection's entries, most recent first.
    List { collection_id: String },
    /// Search entries by substring, tags, and collection.
    Search {
        /// Restrict to this collection.
        #[arg(long)]
        collection: Option<String>,

        /// Case-insensitive substring of content, candidates, or tags.
        #[arg(long)]
        query: Option<String>,

        /// Required tag (repeatable; all must match).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,

        /// Number of results to skip.
        #[arg(long)]
        offset: Option<usize>,
    },
    /// Add tags to an entry.
    Tag {
        entry_id: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from an entry.
    Untag {
        entry_id: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Replace all tags of an entry.
    Retag {
        entry_id: String,
        tags: Vec<String>,
    },
    /// Delete an entry.
    Delete { entry_id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<wordhoard::error::Error>() {
            Some(core) => eprintln!("error [{}]: {}", core.kind(), core),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging.level, cli.verbose);

    match cli.command {
        Commands::Input { action } => match action {
            InputAction::Add { content, kind } => {
                inputs::run_add_input(&cfg, kind, &content).await?;
            }
            InputAction::List => {
                inputs::run_list_inputs(&cfg).await?;
            }
        },
        Commands::Suggest { input_id } => {
            inputs::run_suggest(&cfg, &input_id).await?;
        }
        Commands::Refine {
            suggestion_id,
            keep,
        } => {
            inputs::run_refine(&cfg, &suggestion_id, &keep).await?;
        }
        Commands::Collection { action } => match action {
            CollectionAction::Create { name } => {
                collections::run_create(&cfg, &name).await?;
            }
            CollectionAction::Rename { id, name } => {
                collections::run_rename(&cfg, &id, &name).await?;
            }
            CollectionAction::List => {
                collections::run_list(&cfg).await?;
            }
        },
        Commands::Entry { action } => match action {
            EntryAction::Save {
                input_id,
                suggestion_id,
                collection_id,
                tags,
            } => {
                entries::run_save(&cfg, &input_id, &suggestion_id, &collection_id, &tags).await?;
            }
            EntryAction::List { collection_id } => {
                entries::run_list(&cfg, &collection_id).await?;
            }
            EntryAction::Search {
                collection,
                query,
                tags,
                limit,
                offset,
            } => {
                let args = entries::SearchArgs {
                    collection,
                    query,
                    tags,
                    limit,
                    offset,
                };
                entries::run_search(&cfg, args).await?;
            }
            EntryAction::Tag { entry_id, tags } => {
                entries::run_tag(&cfg, &entry_id, &tags).await?;
            }
            EntryAction::Untag { entry_id, tags } => {
                entries::run_untag(&cfg, &entry_id, &tags).await?;
            }
            EntryAction::Retag { entry_id, tags } => {
                entries::run_retag(&cfg, &entry_id, &tags).await?;
            }
            EntryAction::Delete { entry_id } => {
                entries::run_delete(&cfg, &entry_id).await?;
            }
        },
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Export {
            collection_id,
            output,
        } => {
            export::run_export(&cfg, &collection_id, output.as_deref()).await?;
        }
    }

    Ok(())
}
