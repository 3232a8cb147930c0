//! Property-based tests for task-set merging and projection.
//!
//! Uses proptest to verify:
//! 1. Merging owned and shared lists never produces duplicate ids.
//! 2. The first occurrence of an id wins, owned before shared.
//! 3. Merge order is the first-seen order of the concatenation.
//! 4. Projection is a pure conjunction of the search and status criteria.
//! 5. Projection keeps matching tasks in order and is case-insensitive.
//! 6. Projecting an already-projected list changes nothing.

use proptest::prelude::*;

use taskdeck::tasks::{self, StatusFilter};
use taskdeck_api::task::{Task, TaskStatus};

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
    ]
}

/// Ids come from a small pool so owned and shared lists collide often.
fn arb_task() -> impl Strategy<Value = Task> {
    (0..12u8, "[A-Za-z ]{0,16}", arb_status()).prop_map(|(n, title, status)| Task {
        id: format!("task-{n}"),
        title,
        status,
        ..Task::default()
    })
}

fn arb_task_list() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(arb_task(), 0..16)
}

// --- Merge properties ---

proptest! {
    /// Merged ids are unique even when the input lists overlap heavily.
    #[test]
    fn merged_ids_are_unique(owned in arb_task_list(), shared in arb_task_list()) {
        let merged = tasks::merge_task_lists(owned, shared);
        let mut seen = std::collections::HashSet::new();
        for task in &merged {
            prop_assert!(seen.insert(task.id.clone()), "duplicate id {}", task.id);
        }
    }

    /// Every merged entry is the first entry with that id in owned-then-shared
    /// order, so the owned copy beats the shared copy field for field.
    #[test]
    fn first_occurrence_wins(owned in arb_task_list(), shared in arb_task_list()) {
        let merged = tasks::merge_task_lists(owned.clone(), shared.clone());
        for task in &merged {
            let first = owned.iter().chain(&shared).find(|t| t.id == task.id);
            prop_assert_eq!(Some(task), first);
        }
    }

    /// Merge order is exactly the first-seen order of the concatenation.
    #[test]
    fn merge_preserves_first_seen_order(owned in arb_task_list(), shared in arb_task_list()) {
        let merged = tasks::merge_task_lists(owned.clone(), shared.clone());
        let mut expected_ids: Vec<&str> = Vec::new();
        for task in owned.iter().chain(&shared) {
            if !expected_ids.contains(&task.id.as_str()) {
                expected_ids.push(task.id.as_str());
            }
        }
        let merged_ids: Vec<&str> = merged.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(merged_ids, expected_ids);
    }
}

// --- Projection properties ---

proptest! {
    /// Every projected task satisfies both criteria at once.
    #[test]
    fn projection_is_a_conjunction(
        list in arb_task_list(),
        query in "[A-Za-z ]{0,6}",
        status in arb_status(),
    ) {
        let visible = tasks::project(&list, &query, StatusFilter::Only(status));
        let needle = query.to_lowercase();
        for task in &visible {
            prop_assert!(task.title.to_lowercase().contains(&needle));
            prop_assert_eq!(task.status, status);
        }
    }

    /// Projection drops nothing that matches and keeps the original order.
    #[test]
    fn projection_keeps_matching_tasks_in_order(
        list in arb_task_list(),
        query in "[A-Za-z ]{0,6}",
    ) {
        let visible = tasks::project(&list, &query, StatusFilter::All);
        let needle = query.to_lowercase();
        let expected: Vec<&Task> = list
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect();
        prop_assert_eq!(visible.iter().collect::<Vec<_>>(), expected);
    }

    /// The search criterion ignores case entirely.
    #[test]
    fn search_is_case_insensitive(list in arb_task_list(), query in "[A-Za-z]{0,6}") {
        let lower = tasks::project(&list, &query.to_lowercase(), StatusFilter::All);
        let upper = tasks::project(&list, &query.to_uppercase(), StatusFilter::All);
        prop_assert_eq!(lower, upper);
    }

    /// Empty criteria are the identity: the projection is the whole snapshot.
    #[test]
    fn empty_criteria_are_the_identity(list in arb_task_list()) {
        let visible = tasks::project(&list, "", StatusFilter::All);
        prop_assert_eq!(visible, list);
    }

    /// Projecting an already-projected list changes nothing, which is what
    /// makes filtering non-destructive in the UI.
    #[test]
    fn projection_is_idempotent(
        list in arb_task_list(),
        query in "[A-Za-z ]{0,6}",
        status in arb_status(),
    ) {
        let filter = StatusFilter::Only(status);
        let once = tasks::project(&list, &query, filter);
        let twice = tasks::project(&once, &query, filter);
        prop_assert_eq!(once, twice);
    }
}
