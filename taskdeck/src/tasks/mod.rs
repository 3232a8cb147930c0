//! Task list state: fetch, merge, and projection.
//!
//! The backend is authoritative for task data. The client holds one
//! wholesale-replaced snapshot (owned and shared lists merged, duplicates
//! collapsed by id) and projects it through the current search text and
//! status filter for display. Nothing in here mutates tasks locally.

pub mod filter;
pub mod merge;
pub mod sync;

pub use filter::{StatusFilter, project};
pub use merge::merge_task_lists;
pub use sync::{RefreshOutcome, Synchronizer};
