//! CLI command definitions for task-tree.
//!
//! The commands map 1:1 onto the library's public operations; all rendering
//! and argument parsing stays out here so the core never formats anything.

use crate::format::OutputFormat;
use crate::types::TaskId;
use clap::{Parser, Subcommand};

/// Personal task manager: tasks form a tree, stored in a local SQLite file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(
        short,
        long,
        global = true,
        env = "TASK_TREE_DB",
        default_value = "task_tree.db"
    )]
    pub database: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task, as a root or under a parent
    Add {
        /// Task name
        name: String,

        /// Parent task id (omit to create a root task)
        #[arg(short, long)]
        parent: Option<TaskId>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Print the task tree
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Edit a task's name, due date, or finish time
    Edit {
        /// Task id
        id: TaskId,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,

        /// Clear the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,

        /// Record when the task was finished (RFC 3339, or "now")
        #[arg(long)]
        finished: Option<String>,

        /// Clear the recorded finish time
        #[arg(long, conflicts_with = "finished")]
        clear_finished: bool,
    },

    /// Toggle completion for a task; the new state cascades to its subtree
    Done {
        /// Task id
        id: TaskId,
    },

    /// Delete a task and all of its descendants
    Rm {
        /// Task id
        id: TaskId,
    },

    /// Move a task under a new parent, appended as its last child
    Move {
        /// Task id
        id: TaskId,

        /// New parent id (omit to promote the task to a root)
        #[arg(short, long)]
        parent: Option<TaskId>,
    },

    /// Drop a task onto another: swaps positions within a sibling group,
    /// otherwise moves the task under the target
    Swap {
        /// Dragged task id
        id: TaskId,

        /// Target task id
        target: TaskId,
    },

    /// Persist a task's open/closed state for the next load
    Expand {
        /// Task id
        id: TaskId,

        /// Record the task as closed instead of open
        #[arg(long)]
        collapse: bool,
    },
}
