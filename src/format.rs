//! Output formatting for the CLI: plain text tree or JSON.

use crate::types::TreeNode;
use clap::ValueEnum;

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented text tree
    #[default]
    Text,
    /// Nested JSON, one object per task with a `children` array
    Json,
}

/// Render the forest as an indented text tree.
///
/// Collapsed nodes show a child count instead of their children, mirroring
/// what a tree widget would do with the persisted expand state.
pub fn format_tree_text(forest: &[TreeNode]) -> String {
    let mut out = String::new();
    for node in forest {
        push_node(&mut out, node, 0);
    }
    out
}

fn push_node(out: &mut String, node: &TreeNode, depth: usize) {
    let task = &node.task;
    let marker = if task.completed { "[x]" } else { "[ ]" };

    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{} #{} {}", marker, task.id, task.name));

    if let Some(due) = task.due_date {
        out.push_str(&format!("  (due {due})"));
    }
    if let Some(finished) = task.finish_time() {
        out.push_str(&format!("  (finished {})", finished.format("%Y-%m-%d %H:%M")));
    }

    if !task.expanded && !node.children.is_empty() {
        out.push_str(&format!("  (+{} hidden)\n", node.children.len()));
        return;
    }
    out.push('\n');

    for child in &node.children {
        push_node(out, child, depth + 1);
    }
}
