//! task-tree binary: a thin presentation layer over the library.
//!
//! Translates CLI commands into library calls and renders the projected
//! forest. User-level failures (bad input, stale ids, rejected moves) are
//! reported and exit non-zero without a backtrace; storage failures
//! propagate as hard errors.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use task_tree::cli::{Cli, Command};
use task_tree::db::Database;
use task_tree::error::Error;
use task_tree::format::{OutputFormat, format_tree_text};
use task_tree::types::{parse_due_date, parse_finish_time};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db = Database::open(&cli.database)?;

    if let Err(err) = run(&db, cli.command) {
        match err.downcast_ref::<Error>() {
            Some(lib_err) if lib_err.is_user_error() => {
                warn!("operation rejected: {lib_err}");
                eprintln!("error: {lib_err}");
                std::process::exit(1);
            }
            _ => return Err(err),
        }
    }

    Ok(())
}

fn run(db: &Database, command: Command) -> Result<()> {
    match command {
        Command::Add { name, parent, due } => {
            let due = due.as_deref().map(parse_due_date).transpose()?;
            let task = db.create_task(&name, parent, due, None)?;
            println!("created task #{}", task.id);
        }

        Command::List { format } => {
            let forest = db.load_tree()?;
            match format {
                OutputFormat::Text => print!("{}", format_tree_text(&forest)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&forest)?),
            }
        }

        Command::Edit {
            id,
            name,
            due,
            clear_due,
            finished,
            clear_finished,
        } => {
            let due_patch = if clear_due {
                Some(None)
            } else {
                due.as_deref().map(parse_due_date).transpose()?.map(Some)
            };
            let finish_patch = if clear_finished {
                Some(None)
            } else {
                match finished.as_deref() {
                    Some("now") => Some(Some(Utc::now())),
                    Some(text) => Some(Some(parse_finish_time(text)?)),
                    None => None,
                }
            };

            let task = db.update_task(id, name.as_deref(), due_patch, finish_patch)?;
            println!("updated task #{} ({})", task.id, task.name);
        }

        Command::Done { id } => {
            let completed = db.toggle_completed(id)?;
            let state = if completed { "completed" } else { "not completed" };
            println!("task #{id} and its subtree marked {state}");
        }

        Command::Rm { id } => {
            db.delete_task(id)?;
            println!("deleted task #{id} and its subtree");
        }

        Command::Move { id, parent } => {
            db.reparent_task(id, parent)?;
            match parent {
                Some(parent) => println!("moved task #{id} under #{parent}"),
                None => println!("task #{id} is now a root task"),
            }
        }

        Command::Swap { id, target } => {
            db.reorder_siblings(id, target)?;
            println!("reordered task #{id} against #{target}");
        }

        Command::Expand { id, collapse } => {
            db.set_expanded(id, !collapse)?;
        }
    }

    Ok(())
}
