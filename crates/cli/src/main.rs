//! Tally CLI - tally command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::{Engine, Status};

mod cmd;
mod settings;
mod util;

/// Tally - progress tracking for project and study plans
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine activity (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Engine settings file (default: ./tally.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty project or study plan
    Init {
        /// Document file to create
        file: PathBuf,
        /// Display name of the root
        #[arg(long)]
        name: String,
        /// Create a study plan instead of a project
        #[arg(long)]
        study: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the tree with progress and status
    Show {
        file: PathBuf,
        /// Only descend this many levels below the root
        #[arg(long)]
        depth: Option<usize>,
        /// Print node ids next to names
        #[arg(long)]
        ids: bool,
        /// Print the recomputed document as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Report structural problems and stale progress without modifying the file
    Check { file: PathBuf },
    /// Recompute every node and write the result back
    Recompute {
        file: PathBuf,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Build a study plan from {"subject": {"chapter": lectureCount}} JSON
    ImportGate {
        /// Lecture count file
        counts: PathBuf,
        /// Document file to write
        #[arg(short, long)]
        out: PathBuf,
        /// Display name of the study plan
        #[arg(long, default_value = "GATE Preparation")]
        name: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Add a child node under a parent
    Add {
        file: PathBuf,
        /// Parent node id
        parent: String,
        /// Name of the new node
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Estimated minutes (tasks and subtasks)
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// Update a leaf's progress, status or checkbox
    Set {
        file: PathBuf,
        /// Leaf node id
        id: String,
        /// Progress between 0 and 100
        #[arg(short, long)]
        progress: Option<f64>,
        /// not-started, in-progress or completed
        #[arg(short, long)]
        status: Option<Status>,
        /// Mark completed
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        /// Mark not completed
        #[arg(long)]
        undone: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a node and its whole subtree
    Delete {
        file: PathBuf,
        id: String,
    },
    /// Rename a node
    Rename {
        file: PathBuf,
        id: String,
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_logging(cli.verbose);

    let config = settings::load(cli.config.as_deref())?;
    let engine = Engine::new(config)?;

    match cli.command {
        Commands::Init { file, name, study, force } => {
            cmd::init::run(&engine, &file, &name, study, force)
        }
        Commands::Show { file, depth, ids, json } => {
            cmd::show::run(&engine, &file, depth, ids, json)
        }
        Commands::Check { file } => cmd::check::run(&engine, &file),
        Commands::Recompute { file, dry_run } => cmd::recompute::run(&engine, &file, dry_run),
        Commands::ImportGate { counts, out, name, force } => {
            cmd::import_gate::run(&engine, &counts, &out, &name, force)
        }
        Commands::Add { file, parent, name, description, estimate } => {
            cmd::add::run(&engine, &file, &parent, &name, description, estimate)
        }
        Commands::Set { file, id, progress, status, done, undone, notes } => {
            let completed = match (done, undone) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            cmd::set::run(&engine, &file, &id, progress, status, completed, notes)
        }
        Commands::Delete { file, id } => cmd::delete::run(&engine, &file, &id),
        Commands::Rename { file, id, name } => cmd::rename::run(&engine, &file, &id, &name),
    }
}
