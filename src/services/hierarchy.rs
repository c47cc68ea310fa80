//! Task-tree progress propagation.
//!
//! The tree has exactly four levels (goal → large → medium → small). A
//! non-leaf node's progress is the rounded mean of its direct children's
//! progress, and it is completed iff that mean is 100. Recomputation is a
//! pure function over a snapshot of the user's tasks; the caller applies
//! the resulting updates in a single transaction.

use crate::models::{Task, TaskStatus};
use std::collections::HashMap;

/// One pending write produced by [`recompute_ancestors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub task_id: String,
    pub progress: i64,
    pub status: TaskStatus,
}

pub fn status_for_progress(progress: i64) -> TaskStatus {
    if progress == 100 {
        TaskStatus::Completed
    } else {
        TaskStatus::Pending
    }
}

/// Walks parent links upward from `start_id`, recomputing each ancestor's
/// progress as the rounded mean of its direct children. Children's progress
/// is read through the overlay of updates already computed lower in the
/// chain, so each level sees the values the levels below are about to get.
///
/// An ancestor with no children is left unchanged. `start_id = None` is a
/// no-op (the mutated node was a root).
pub fn recompute_ancestors(tasks: &[Task], start_id: Option<&str>) -> Vec<ProgressUpdate> {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut overlay: HashMap<&str, i64> = HashMap::new();
    let mut updates = Vec::new();

    let mut current = start_id;
    while let Some(id) = current {
        let Some(node) = by_id.get(id) else { break };

        let children: Vec<i64> = tasks
            .iter()
            .filter(|t| t.parent_id.as_deref() == Some(id))
            .map(|t| *overlay.get(t.id.as_str()).unwrap_or(&t.progress))
            .collect();
        if children.is_empty() {
            break;
        }

        let mean = children.iter().sum::<i64>() as f64 / children.len() as f64;
        let progress = mean.round() as i64;
        overlay.insert(node.id.as_str(), progress);
        updates.push(ProgressUpdate {
            task_id: node.id.clone(),
            progress,
            status: status_for_progress(progress),
        });

        current = node.parent_id.as_deref();
    }

    updates
}

/// Transitive children of `root_id`, found by repeated parent-id filtering.
/// The root itself is not included; every node appears before its own
/// descendants in the returned order.
pub fn descendant_ids(tasks: &[Task], root_id: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut frontier = vec![root_id.to_string()];
    while let Some(id) = frontier.pop() {
        for task in tasks.iter().filter(|t| t.parent_id.as_deref() == Some(id.as_str())) {
            result.push(task.id.clone());
            frontier.push(task.id.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskLevel;

    fn node(id: &str, level: TaskLevel, parent: Option<&str>, progress: i64) -> Task {
        Task {
            id: id.to_string(),
            user_id: "u1".to_string(),
            level,
            parent_id: parent.map(str::to_string),
            title: id.to_string(),
            start_date: None,
            end_date: None,
            status: status_for_progress(progress),
            progress,
            memo: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn half_completed_children_average_to_fifty_pending() {
        let tasks = vec![
            node("goal", TaskLevel::Goal, None, 0),
            node("large", TaskLevel::Large, Some("goal"), 0),
            node("s1", TaskLevel::Small, Some("large"), 100),
            node("s2", TaskLevel::Small, Some("large"), 0),
        ];
        let updates = recompute_ancestors(&tasks, Some("large"));
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].task_id, "large");
        assert_eq!(updates[0].progress, 50);
        assert_eq!(updates[0].status, TaskStatus::Pending);
        // The goal reads the large's new value through the overlay.
        assert_eq!(updates[1].task_id, "goal");
        assert_eq!(updates[1].progress, 50);
    }

    #[test]
    fn all_children_complete_marks_ancestors_completed() {
        let tasks = vec![
            node("goal", TaskLevel::Goal, None, 50),
            node("large", TaskLevel::Large, Some("goal"), 50),
            node("s1", TaskLevel::Small, Some("large"), 100),
            node("s2", TaskLevel::Small, Some("large"), 100),
        ];
        let updates = recompute_ancestors(&tasks, Some("large"));
        assert!(updates
            .iter()
            .all(|u| u.progress == 100 && u.status == TaskStatus::Completed));
    }

    #[test]
    fn mean_rounds_half_up() {
        let tasks = vec![
            node("large", TaskLevel::Large, None, 0),
            node("m1", TaskLevel::Medium, Some("large"), 33),
            node("m2", TaskLevel::Medium, Some("large"), 34),
        ];
        let updates = recompute_ancestors(&tasks, Some("large"));
        // mean 33.5 rounds to 34
        assert_eq!(updates[0].progress, 34);
    }

    #[test]
    fn root_change_is_a_noop() {
        let tasks = vec![node("goal", TaskLevel::Goal, None, 0)];
        assert!(recompute_ancestors(&tasks, None).is_empty());
    }

    #[test]
    fn childless_ancestor_is_left_unchanged() {
        let tasks = vec![node("goal", TaskLevel::Goal, None, 70)];
        assert!(recompute_ancestors(&tasks, Some("goal")).is_empty());
    }

    #[test]
    fn descendants_cover_the_whole_subtree() {
        let tasks = vec![
            node("goal", TaskLevel::Goal, None, 0),
            node("large", TaskLevel::Large, Some("goal"), 0),
            node("medium", TaskLevel::Medium, Some("large"), 0),
            node("s1", TaskLevel::Small, Some("medium"), 0),
            node("s2", TaskLevel::Small, Some("medium"), 0),
            node("other", TaskLevel::Large, Some("goal"), 0),
        ];
        let mut ids = descendant_ids(&tasks, "large");
        ids.sort();
        assert_eq!(ids, vec!["medium", "s1", "s2"]);
    }
}
