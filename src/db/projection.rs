//! Read-only projection of the stored forest.
//!
//! A pure function of the `tasks` table: one flat select, an adjacency map,
//! then depth-first assembly into nested nodes. Rebuilt from scratch after
//! every mutation; trees are small enough that incremental patching would be
//! pure complexity.

use super::Database;
use super::store::parse_task_row;
use crate::error::Result;
use crate::types::{Task, TaskId, TreeNode};
use std::collections::HashMap;

impl Database {
    /// Build the ordered forest: depth-first, siblings ordered by the
    /// display rule (incomplete before completed, then sort_order, then id).
    pub fn load_tree(&self) -> Result<Vec<TreeNode>> {
        let tasks = self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks")?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })?;

        Ok(assemble_forest(tasks))
    }
}

/// Nest a flat task list into an ordered forest.
fn assemble_forest(tasks: Vec<Task>) -> Vec<TreeNode> {
    let mut groups: HashMap<Option<TaskId>, Vec<Task>> = HashMap::new();
    for task in tasks {
        groups.entry(task.parent_id).or_default().push(task);
    }
    build_level(&mut groups, None)
}

fn build_level(groups: &mut HashMap<Option<TaskId>, Vec<Task>>, parent: Option<TaskId>) -> Vec<TreeNode> {
    let mut level = groups.remove(&parent).unwrap_or_default();
    // Display-only ordering: incomplete siblings come first. sort_order is
    // the persisted position; id breaks any remaining tie (legacy rows all
    // carry sort_order 0).
    level.sort_by_key(|task| (task.completed, task.sort_order, task.id));

    level
        .into_iter()
        .map(|task| {
            let children = build_level(groups, Some(task.id));
            TreeNode { task, children }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: TaskId, parent_id: Option<TaskId>, sort_order: i64, completed: bool) -> Task {
        Task {
            id,
            name: format!("task {id}"),
            due_date: None,
            finish_at: None,
            parent_id,
            completed,
            sort_order,
            expanded: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn nests_children_under_their_parents() {
        let forest = assemble_forest(vec![
            task(1, None, 1, false),
            task(2, Some(1), 1, false),
            task(3, Some(2), 1, false),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].task.id, 2);
        assert_eq!(forest[0].children[0].children[0].task.id, 3);
    }

    #[test]
    fn incomplete_siblings_render_before_completed_ones() {
        let forest = assemble_forest(vec![
            task(1, None, 1, true),
            task(2, None, 2, false),
            task(3, None, 3, false),
        ]);

        let ids: Vec<TaskId> = forest.iter().map(|n| n.task.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn equal_sort_orders_fall_back_to_id() {
        // Rows predating the sort_order column all load as 0.
        let forest = assemble_forest(vec![
            task(7, None, 0, false),
            task(3, None, 0, false),
        ]);

        let ids: Vec<TaskId> = forest.iter().map(|n| n.task.id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn orphan_free_flat_input_produces_flat_forest() {
        let forest = assemble_forest(vec![task(1, None, 2, false), task(2, None, 1, false)]);
        assert_eq!(forest[0].task.id, 2);
        assert!(forest[0].children.is_empty());
    }
}
