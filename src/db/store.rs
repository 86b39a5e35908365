//! Row-level task storage.
//!
//! This layer maps 1:1 onto the `tasks` table: creation, partial field
//! updates, lookups, and raw single-field setters. It knows nothing about
//! the forest invariant; the raw setters and `delete_row` trust their caller
//! ([`super::tree`]) to have validated the operation, which keeps this layer
//! a dumb, auditable mapping.

use super::{Database, now_ms};
use crate::error::{Error, Result};
use crate::types::{Task, TaskId};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub(crate) fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        name: row.get("name")?,
        due_date: row.get("due_date")?,
        finish_at: row.get("finish_at")?,
        parent_id: row.get("parent_id")?,
        completed: row.get("completed")?,
        sort_order: row.get("sort_order")?,
        expanded: row.get("expanded")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Fetch one task using an existing connection.
pub(crate) fn fetch_task(conn: &Connection, id: TaskId) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
    Ok(stmt.query_row(params![id], parse_task_row).optional()?)
}

/// Fetch a sibling group, ordered by (sort_order, id).
///
/// `IS ?1` instead of `= ?1` so that `None` matches the root group.
pub(crate) fn fetch_children(conn: &Connection, parent_id: Option<TaskId>) -> Result<Vec<Task>> {
    let mut stmt =
        conn.prepare("SELECT * FROM tasks WHERE parent_id IS ?1 ORDER BY sort_order, id")?;
    let tasks = stmt
        .query_map(params![parent_id], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

/// Next free position at the end of a sibling group: max order + 1.
pub(crate) fn next_sort_order(conn: &Connection, parent_id: Option<TaskId>) -> Result<i64> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(sort_order) FROM tasks WHERE parent_id IS ?1",
        params![parent_id],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0) + 1)
}

pub(crate) fn set_parent_raw(
    conn: &Connection,
    id: TaskId,
    parent_id: Option<TaskId>,
) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET parent_id = ?1, updated_at = ?2 WHERE id = ?3",
        params![parent_id, now_ms(), id],
    )?;
    Ok(())
}

pub(crate) fn set_order_raw(conn: &Connection, id: TaskId, sort_order: i64) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET sort_order = ?1, updated_at = ?2 WHERE id = ?3",
        params![sort_order, now_ms(), id],
    )?;
    Ok(())
}

pub(crate) fn set_completed_raw(conn: &Connection, id: TaskId, completed: bool) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET completed = ?1, updated_at = ?2 WHERE id = ?3",
        params![completed, now_ms(), id],
    )?;
    Ok(())
}

pub(crate) fn set_expanded_raw(conn: &Connection, id: TaskId, expanded: bool) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET expanded = ?1, updated_at = ?2 WHERE id = ?3",
        params![expanded, now_ms(), id],
    )?;
    Ok(())
}

/// Remove exactly one row. Does not cascade.
pub(crate) fn delete_row(conn: &Connection, id: TaskId) -> Result<()> {
    conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    Ok(())
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("task name must not be empty"));
    }
    Ok(name)
}

impl Database {
    /// Create a task, as a root (`parent_id = None`) or as the last child of
    /// an existing task. New tasks start incomplete and expanded.
    pub fn create_task(
        &self,
        name: &str,
        parent_id: Option<TaskId>,
        due_date: Option<NaiveDate>,
        finish_time: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let now = now_ms();
        let finish_at = finish_time.map(|t| t.timestamp_millis());

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let name = validate_name(name)?;
            if let Some(pid) = parent_id {
                if fetch_task(&tx, pid)?.is_none() {
                    return Err(Error::validation(format!(
                        "parent task #{pid} does not exist"
                    )));
                }
            }

            let sort_order = next_sort_order(&tx, parent_id)?;

            tx.execute(
                "INSERT INTO tasks (
                    name, due_date, finish_at, parent_id,
                    completed, sort_order, expanded, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, 0, ?5, 1, ?6, ?6)",
                params![name, due_date, finish_at, parent_id, sort_order, now],
            )?;
            let id = tx.last_insert_rowid();

            tx.commit()?;

            Ok(Task {
                id,
                name: name.to_string(),
                due_date,
                finish_at,
                parent_id,
                completed: false,
                sort_order,
                expanded: true,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Patch a task's name, due date, and/or finish time.
    ///
    /// The outer `Option` means "leave unchanged"; the inner `Option` on the
    /// date fields distinguishes setting a value from clearing it. Parent,
    /// order, and completion are deliberately not updatable here; those go
    /// through the tree engine.
    pub fn update_task(
        &self,
        id: TaskId,
        name: Option<&str>,
        due_date: Option<Option<NaiveDate>>,
        finish_time: Option<Option<DateTime<Utc>>>,
    ) -> Result<Task> {
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let task = fetch_task(&tx, id)?.ok_or(Error::NotFound(id))?;

            let new_name = match name {
                Some(n) => validate_name(n)?.to_string(),
                None => task.name.clone(),
            };
            let new_due = due_date.unwrap_or(task.due_date);
            let new_finish = match finish_time {
                Some(ft) => ft.map(|t| t.timestamp_millis()),
                None => task.finish_at,
            };

            tx.execute(
                "UPDATE tasks SET name = ?1, due_date = ?2, finish_at = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![new_name, new_due, new_finish, now, id],
            )?;

            tx.commit()?;

            Ok(Task {
                name: new_name,
                due_date: new_due,
                finish_at: new_finish,
                updated_at: now,
                ..task
            })
        })
    }

    /// Get a single task.
    pub fn get_task(&self, id: TaskId) -> Result<Task> {
        self.with_conn(|conn| fetch_task(conn, id)?.ok_or(Error::NotFound(id)))
    }

    /// Get the direct children of a task (or the root group for `None`),
    /// ordered by (sort_order, id).
    pub fn get_children(&self, parent_id: Option<TaskId>) -> Result<Vec<Task>> {
        self.with_conn(|conn| fetch_children(conn, parent_id))
    }
}
