//! Pure merge of the owned and shared task lists.

use std::collections::HashSet;

use taskdeck_api::task::Task;

/// Merges the owned and shared task lists into a single display list.
///
/// Duplicates (a task that is both owned and shared back to the owner) are
/// collapsed by id, first occurrence wins, so a task present in both lists
/// keeps its owned copy. Order is first-seen: owned tasks in fetch order,
/// then shared tasks not already present.
#[must_use]
pub fn merge_task_lists(owned: Vec<Task>, shared: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(owned.len() + shared.len());
    let mut merged = Vec::with_capacity(owned.len() + shared.len());
    for task in owned.into_iter().chain(shared) {
        if seen.insert(task.id.clone()) {
            merged.push(task);
        }
    }
    merged
}
