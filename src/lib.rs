//! Task Tree Library
//!
//! Core of a small personal task manager: tasks form an arbitrarily deep
//! forest persisted in SQLite. The library owns the tree's integrity rules
//! (acyclicity, sibling ordering, cascading completion, subtree deletion);
//! presentation layers consume the ordered forest from [`db::Database::load_tree`]
//! and drive mutations through the other `Database` methods.

pub mod cli;
pub mod db;
pub mod error;
pub mod format;
pub mod types;
