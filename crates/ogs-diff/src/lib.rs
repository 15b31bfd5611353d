//! Map synchronization diff engine.
//!
//! Reconciles a *desired* keyed map against the *current* keyed map. The
//! engine partitions the union of both keyspaces into three buckets and then
//! applies them through caller-supplied effect functions:
//!
//! 1. keys only in the current map are **deleted**,
//! 2. keys in both maps are **updated** with the desired value,
//! 3. keys only in the desired map are **inserted**.
//!
//! Application always runs deletes, then updates, then inserts, and stops at
//! the first failing effect. The engine never opens a transaction; callers
//! that need atomicity wrap both steps in their own.
//!
//! # Key Types
//!
//! - [`MapDiffActions`] -- The three action buckets produced by a diff
//! - [`DiffBucket`] -- Names a bucket (for logging and reporting)
//! - [`IntoStateMap`] -- Inputs accepted as a state map (`None` is empty)
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ogs_diff::{generate_map_diff_actions_with, handle_map_diff_actions};
//!
//! let desired = HashMap::from([("a", (0, 1)), ("b", (0, 2))]);
//! let current = HashMap::from([("b", (7, 9)), ("c", (8, 3))]);
//!
//! // Carry the stored id forward onto the desired value.
//! let actions = generate_map_diff_actions_with(desired, current, |want, have| want.0 = have.0);
//! assert_eq!(actions.items_to_delete, vec![(8, 3)]);
//! assert_eq!(actions.items_to_update, vec![(7, 2)]);
//! assert_eq!(actions.items_to_insert, vec![(0, 1)]);
//!
//! fn record(marker: char) -> impl FnMut(&mut Vec<String>, (i32, i32)) -> Result<(), ()> {
//!     move |log, v| {
//!         log.push(format!("{marker}{}", v.1));
//!         Ok(())
//!     }
//! }
//!
//! let mut log = Vec::new();
//! handle_map_diff_actions(&mut log, actions, record('-'), record('~'), record('+')).unwrap();
//! assert_eq!(log, ["-3", "~2", "+1"]);
//! ```

pub mod actions;
pub mod apply;
pub mod input;

pub use actions::{
    generate_map_diff_actions, generate_map_diff_actions_with, DiffBucket, MapDiffActions,
};
pub use apply::handle_map_diff_actions;
pub use input::IntoStateMap;
