//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::task;
use crate::domain::TaskId;
use crate::storage::{db, Config};

#[derive(Parser)]
#[command(name = "chore")]
#[command(author, version, about = "Personal task tracking with projects and due dates")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task database (overrides config file)
    #[arg(long, global = true, env = "CHORE_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List unresolved tasks
    List {
        /// Include resolved tasks
        #[arg(long)]
        all: bool,

        /// Only tasks in this project (exact name)
        #[arg(long)]
        project: Option<String>,
    },

    /// Search unresolved tasks by title pattern (anchored at the start)
    Find {
        /// Regular expression matched against the start of the title
        pattern: String,

        /// Only tasks in this project (exact name)
        #[arg(long)]
        project: Option<String>,
    },

    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Due date: absolute ("2025-03-01") or relative ("3 days", "week")
        #[arg(long)]
        due: Option<String>,

        /// Project name (created on first use)
        #[arg(long)]
        project: Option<String>,
    },

    /// Change fields of an existing task
    Change {
        /// Task id
        id: TaskId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New due date expression
        #[arg(long)]
        due: Option<String>,

        /// Move to this project (created on first use)
        #[arg(long)]
        project: Option<String>,

        /// Mark as resolved
        #[arg(long)]
        resolved: bool,

        /// Mark as unresolved
        #[arg(long, conflicts_with = "resolved")]
        unresolved: bool,
    },

    /// Mark a task as resolved
    Resolve {
        /// Task id
        id: TaskId,
    },

    /// Delete a task permanently
    Delete {
        /// Task id
        id: TaskId,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List known projects
    Projects,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let config = Config::load()?;
    let db_path = config.resolve_db_path(cli.db)?;
    output.verbose_ctx("db", &format!("Using task database: {}", db_path.display()));

    // One connection for the whole process; dropped on every exit path.
    let mut conn = db::open(&db_path)?;

    match cli.command {
        Commands::List { all, project } => {
            task::list(&mut conn, &output, all, project.as_deref())?
        }
        Commands::Find { pattern, project } => {
            task::find(&mut conn, &output, &pattern, project.as_deref())?
        }
        Commands::Add {
            title,
            due,
            project,
        } => task::add(&mut conn, &output, &title, due.as_deref(), project.as_deref())?,
        Commands::Change {
            id,
            title,
            due,
            project,
            resolved,
            unresolved,
        } => {
            let resolved = if resolved {
                Some(true)
            } else if unresolved {
                Some(false)
            } else {
                None
            };
            task::change(
                &mut conn,
                &output,
                id,
                title,
                due.as_deref(),
                project.as_deref(),
                resolved,
            )?
        }
        Commands::Resolve { id } => task::resolve(&mut conn, &output, id)?,
        Commands::Delete { id, yes } => task::delete(&mut conn, &output, id, yes)?,
        Commands::Projects => task::projects(&mut conn, &output)?,
    }

    Ok(())
}
