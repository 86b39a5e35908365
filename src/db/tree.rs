//! Tree mutation engine.
//!
//! Every operation here preserves the forest invariant: parent links stay
//! acyclic, sibling groups keep a strict total order under (sort_order, id),
//! and cascades (completion, deletion) cover whole subtrees. Validation runs
//! before any write and each operation commits as one transaction, so a
//! rejected or failed operation leaves storage exactly as it was.

use super::store::{
    delete_row, fetch_task, next_sort_order, set_completed_raw, set_expanded_raw, set_order_raw,
    set_parent_raw,
};
use super::Database;
use crate::error::{Error, Result};
use crate::types::TaskId;
use rusqlite::Connection;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Materialize the parent -> children adjacency once, so subtree walks do
/// not re-query storage per node.
fn children_index(conn: &Connection) -> Result<HashMap<TaskId, Vec<TaskId>>> {
    let mut stmt = conn.prepare("SELECT id, parent_id FROM tasks")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, TaskId>(0)?, row.get::<_, Option<TaskId>>(1)?))
    })?;

    let mut index: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    for row in rows {
        let (id, parent_id) = row?;
        if let Some(parent_id) = parent_id {
            index.entry(parent_id).or_default().push(id);
        }
    }
    Ok(index)
}

/// Ids of the subtree rooted at `root`, in depth-first preorder (every task
/// before its descendants). Reversing the result yields a leaves-first order.
fn collect_subtree(index: &HashMap<TaskId, Vec<TaskId>>, root: TaskId) -> Vec<TaskId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        out.push(id);
        if let Some(children) = index.get(&id) {
            stack.extend(children.iter().copied());
        }
    }
    out
}

impl Database {
    /// Move a task under a new parent (`None` promotes it to a root),
    /// appending it last among its new siblings.
    ///
    /// Rejected with [`Error::Cycle`] when the target is the task itself or
    /// one of its descendants; the cycle check walks only the moved subtree.
    pub fn reparent_task(&self, id: TaskId, new_parent_id: Option<TaskId>) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if fetch_task(&tx, id)?.is_none() {
                return Err(Error::NotFound(id));
            }

            if let Some(parent_id) = new_parent_id {
                if parent_id == id {
                    warn!(task = id, "rejected reparent: task cannot be its own parent");
                    return Err(Error::cycle(id, parent_id));
                }
                if fetch_task(&tx, parent_id)?.is_none() {
                    return Err(Error::NotFound(parent_id));
                }
                let index = children_index(&tx)?;
                if collect_subtree(&index, id).contains(&parent_id) {
                    warn!(
                        task = id,
                        target = parent_id,
                        "rejected reparent into own subtree"
                    );
                    return Err(Error::cycle(id, parent_id));
                }
            }

            let sort_order = next_sort_order(&tx, new_parent_id)?;
            set_order_raw(&tx, id, sort_order)?;
            set_parent_raw(&tx, id, new_parent_id)?;

            tx.commit()?;
            debug!(task = id, parent = ?new_parent_id, sort_order, "reparented task");
            Ok(())
        })
    }

    /// Handle a drop of `dragged_id` onto `target_id`.
    ///
    /// Within one sibling group this swaps the two tasks' sort orders — a
    /// deliberate O(1) pairwise exchange; order keys are compared, never used
    /// as dense indexes, so no renumbering is needed. A drop onto a task in a
    /// different group degrades to a reparent, appending the dragged task as
    /// the target's last child.
    pub fn reorder_siblings(&self, dragged_id: TaskId, target_id: TaskId) -> Result<()> {
        if dragged_id == target_id {
            return Ok(());
        }

        let (dragged, target) = self.with_conn(|conn| {
            let dragged = fetch_task(conn, dragged_id)?.ok_or(Error::NotFound(dragged_id))?;
            let target = fetch_task(conn, target_id)?.ok_or(Error::NotFound(target_id))?;
            Ok((dragged, target))
        })?;

        if dragged.parent_id != target.parent_id {
            debug!(
                dragged = dragged_id,
                target = target_id,
                "cross-group drop, degrading to reparent"
            );
            return self.reparent_task(dragged_id, Some(target_id));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            set_order_raw(&tx, dragged_id, target.sort_order)?;
            set_order_raw(&tx, target_id, dragged.sort_order)?;
            tx.commit()?;
            debug!(dragged = dragged_id, target = target_id, "swapped sibling order");
            Ok(())
        })
    }

    /// Promote a task to a root. Never a cycle.
    pub fn set_root(&self, id: TaskId) -> Result<()> {
        self.reparent_task(id, None)
    }

    /// Flip a task's completion state and cascade the new value to every
    /// descendant, overwriting whatever state each descendant had. Returns
    /// the new state.
    pub fn toggle_completed(&self, id: TaskId) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let task = fetch_task(&tx, id)?.ok_or(Error::NotFound(id))?;
            let completed = !task.completed;

            let index = children_index(&tx)?;
            for member in collect_subtree(&index, id) {
                set_completed_raw(&tx, member, completed)?;
            }

            tx.commit()?;
            debug!(task = id, completed, "cascaded completion state");
            Ok(completed)
        })
    }

    /// Delete a task and all of its descendants. The subtree is collected
    /// up front, then removed leaves-first so no child row ever outlives its
    /// parent link.
    pub fn delete_task(&self, id: TaskId) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if fetch_task(&tx, id)?.is_none() {
                return Err(Error::NotFound(id));
            }

            let index = children_index(&tx)?;
            let subtree = collect_subtree(&index, id);
            for member in subtree.iter().rev() {
                delete_row(&tx, *member)?;
            }

            tx.commit()?;
            debug!(task = id, removed = subtree.len(), "deleted subtree");
            Ok(())
        })
    }

    /// Persist a task's open/closed state so a reload restores the same
    /// layout. No integrity impact.
    pub fn set_expanded(&self, id: TaskId, expanded: bool) -> Result<()> {
        self.with_conn(|conn| {
            if fetch_task(conn, id)?.is_none() {
                return Err(Error::NotFound(id));
            }
            set_expanded_raw(conn, id, expanded)
        })
    }
}
