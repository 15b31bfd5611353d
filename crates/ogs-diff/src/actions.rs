//! Diff computation: partition desired and current state into action buckets.

use std::fmt;
use std::hash::Hash;

use crate::input::IntoStateMap;

/// One of the three action buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffBucket {
    Delete,
    Update,
    Insert,
}

impl DiffBucket {
    /// Buckets in application order.
    pub const ORDER: [DiffBucket; 3] = [DiffBucket::Delete, DiffBucket::Update, DiffBucket::Insert];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffBucket::Delete => "delete",
            DiffBucket::Update => "update",
            DiffBucket::Insert => "insert",
        }
    }
}

impl fmt::Display for DiffBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The actions needed to make the current state match the desired state.
///
/// Bucket order follows map iteration order and is unspecified. Only the
/// partition is guaranteed: every key of either input lands in exactly one
/// bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapDiffActions<V> {
    /// Current values whose key is absent from the desired state.
    pub items_to_delete: Vec<V>,
    /// Desired values whose key is also present in the current state.
    pub items_to_update: Vec<V>,
    /// Desired values whose key is absent from the current state.
    pub items_to_insert: Vec<V>,
}

impl<V> Default for MapDiffActions<V> {
    fn default() -> Self {
        Self {
            items_to_delete: Vec::new(),
            items_to_update: Vec::new(),
            items_to_insert: Vec::new(),
        }
    }
}

impl<V> MapDiffActions<V> {
    /// Create an empty set of actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if all three buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of actions across all buckets.
    pub fn len(&self) -> usize {
        self.items_to_delete.len() + self.items_to_update.len() + self.items_to_insert.len()
    }

    /// Returns `true` if nothing is inserted or deleted.
    ///
    /// Updates are always emitted for shared keys, so a reconciliation that
    /// changes nothing structurally still carries a full update bucket.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.items_to_delete.is_empty() && self.items_to_insert.is_empty()
    }

    /// The items in `bucket`.
    pub fn bucket(&self, bucket: DiffBucket) -> &[V] {
        match bucket {
            DiffBucket::Delete => &self.items_to_delete,
            DiffBucket::Update => &self.items_to_update,
            DiffBucket::Insert => &self.items_to_insert,
        }
    }

    /// Apply `f` to every item in place, for example to bind each record to a
    /// parent id before it is written.
    pub fn for_each_mut(&mut self, bucket: DiffBucket, f: impl FnMut(&mut V)) {
        let items = match bucket {
            DiffBucket::Delete => &mut self.items_to_delete,
            DiffBucket::Update => &mut self.items_to_update,
            DiffBucket::Insert => &mut self.items_to_insert,
        };
        items.iter_mut().for_each(f);
    }
}

/// Compute the actions that reconcile `current` with `desired`.
///
/// Equivalent to [`generate_map_diff_actions_with`] with a callback that does
/// nothing.
pub fn generate_map_diff_actions<K, V, D, C>(desired: D, current: C) -> MapDiffActions<V>
where
    K: Eq + Hash,
    D: IntoStateMap<K, V>,
    C: IntoStateMap<K, V>,
{
    generate_map_diff_actions_with(desired, current, |_: &mut V, _: &V| {})
}

/// Compute the actions that reconcile `current` with `desired`.
///
/// - keys only in `current` produce a delete of the current value,
/// - keys in both produce an update of the desired value, after `on_match`
///   has been called once with `(desired, current)`,
/// - keys only in `desired` produce an insert of the desired value.
///
/// `on_match` may only mutate the desired side. It exists to carry forward
/// fields that only the persisted record has, such as its serial.
pub fn generate_map_diff_actions_with<K, V, D, C, F>(
    desired: D,
    current: C,
    mut on_match: F,
) -> MapDiffActions<V>
where
    K: Eq + Hash,
    D: IntoStateMap<K, V>,
    C: IntoStateMap<K, V>,
    F: FnMut(&mut V, &V),
{
    let desired = desired.into_state_map();
    let mut current = current.into_state_map();
    let mut actions = MapDiffActions::new();

    // Matched entries are taken out of `current`, so whatever is left once
    // the desired side is exhausted has no desired counterpart.
    for (key, mut value) in desired {
        match current.remove(&key) {
            Some(existing) => {
                on_match(&mut value, &existing);
                actions.items_to_update.push(value);
            }
            None => actions.items_to_insert.push(value),
        }
    }

    actions.items_to_delete.extend(current.into_values());
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet, HashMap};

    use proptest::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct Row {
        name: String,
        id: i32,
        value: u32,
    }

    fn row(name: &str, id: i32, value: u32) -> Row {
        Row {
            name: name.to_string(),
            id,
            value,
        }
    }

    fn keyed(rows: &[Row]) -> HashMap<String, Row> {
        rows.iter().map(|r| (r.name.clone(), r.clone())).collect()
    }

    fn sorted(mut rows: Vec<Row>) -> Vec<Row> {
        rows.sort();
        rows
    }

    fn carry_id(desired: &mut Row, current: &Row) {
        desired.id = current.id;
    }

    #[test]
    fn concrete_scenario() {
        let desired = keyed(&[row("a", 0, 1), row("b", 0, 2)]);
        let current = keyed(&[row("b", 11, 9), row("c", 12, 3)]);

        let actions = generate_map_diff_actions_with(desired, current, carry_id);

        assert_eq!(actions.items_to_delete, vec![row("c", 12, 3)]);
        assert_eq!(actions.items_to_update, vec![row("b", 11, 2)]);
        assert_eq!(actions.items_to_insert, vec![row("a", 0, 1)]);
    }

    #[test]
    fn without_callback_update_is_desired_value() {
        let desired = keyed(&[row("b", 0, 2)]);
        let current = keyed(&[row("b", 11, 9)]);

        let actions = generate_map_diff_actions(desired, current);
        assert_eq!(actions.items_to_update, vec![row("b", 0, 2)]);
    }

    #[test]
    fn empty_current_inserts_everything() {
        let desired = keyed(&[row("a", 0, 1), row("b", 0, 2)]);

        let actions = generate_map_diff_actions(desired, HashMap::new());

        assert!(actions.items_to_delete.is_empty());
        assert!(actions.items_to_update.is_empty());
        assert_eq!(
            sorted(actions.items_to_insert),
            vec![row("a", 0, 1), row("b", 0, 2)]
        );
    }

    #[test]
    fn empty_desired_deletes_everything() {
        let current = keyed(&[row("a", 1, 1), row("b", 2, 2)]);

        let actions = generate_map_diff_actions(HashMap::new(), current);

        assert!(actions.items_to_insert.is_empty());
        assert!(actions.items_to_update.is_empty());
        assert_eq!(
            sorted(actions.items_to_delete),
            vec![row("a", 1, 1), row("b", 2, 2)]
        );
    }

    #[test]
    fn absent_maps_behave_like_empty_maps() {
        let none = None::<HashMap<String, Row>>;
        let actions = generate_map_diff_actions(none.clone(), none);
        assert!(actions.is_empty());

        let desired = keyed(&[row("a", 0, 1)]);
        let from_none =
            generate_map_diff_actions(Some(desired.clone()), None::<HashMap<String, Row>>);
        let from_empty = generate_map_diff_actions(desired, HashMap::new());
        assert_eq!(from_none, from_empty);
    }

    #[test]
    fn on_match_called_once_per_shared_key_with_correct_pair() {
        let desired = keyed(&[row("a", 0, 1), row("b", 0, 2), row("c", 0, 3)]);
        let current = keyed(&[row("b", 20, 0), row("c", 30, 0), row("d", 40, 0)]);

        let mut seen = Vec::new();
        let actions =
            generate_map_diff_actions_with(desired, current, |want: &mut Row, have: &Row| {
                assert_eq!(want.name, have.name);
                seen.push(want.name.clone());
                want.id = have.id;
            });

        seen.sort();
        assert_eq!(seen, vec!["b", "c"]);
        assert_eq!(
            sorted(actions.items_to_update),
            vec![row("b", 20, 2), row("c", 30, 3)]
        );
    }

    #[test]
    fn reconciling_against_itself_is_a_no_op() {
        let desired = keyed(&[row("a", 1, 1), row("b", 2, 2)]);

        let actions = generate_map_diff_actions(desired.clone(), desired);

        assert!(actions.is_structurally_unchanged());
        assert_eq!(actions.items_to_update.len(), 2);
    }

    #[test]
    fn btree_input_accepted() {
        let desired = BTreeMap::from([("x", 1u8)]);
        let current = BTreeMap::from([("y", 2u8)]);

        let actions = generate_map_diff_actions(desired, current);
        assert_eq!(actions.items_to_insert, vec![1]);
        assert_eq!(actions.items_to_delete, vec![2]);
    }

    #[test]
    fn bucket_accessors() {
        let mut actions = MapDiffActions {
            items_to_delete: vec![1],
            items_to_update: vec![2, 3],
            items_to_insert: vec![4],
        };
        assert_eq!(actions.len(), 4);
        assert_eq!(actions.bucket(DiffBucket::Update), &[2, 3]);

        actions.for_each_mut(DiffBucket::Update, |v| *v *= 10);
        assert_eq!(actions.items_to_update, vec![20, 30]);
        assert_eq!(actions.items_to_insert, vec![4]);
    }

    #[test]
    fn bucket_order_and_names() {
        let names: Vec<String> = DiffBucket::ORDER.iter().map(|b| b.to_string()).collect();
        assert_eq!(names, vec!["delete", "update", "insert"]);
    }

    type Tagged = (String, &'static str);

    proptest! {
        #[test]
        fn buckets_partition_the_keyspace(
            only_desired in prop::collection::btree_set("[a-f]{1,3}", 0..12),
            shared in prop::collection::btree_set("[g-m]{1,3}", 0..12),
            only_current in prop::collection::btree_set("[n-t]{1,3}", 0..12),
        ) {
            let desired: HashMap<String, Tagged> = only_desired
                .iter()
                .chain(shared.iter())
                .map(|k| (k.clone(), (k.clone(), "desired")))
                .collect();
            let current: HashMap<String, Tagged> = shared
                .iter()
                .chain(only_current.iter())
                .map(|k| (k.clone(), (k.clone(), "current")))
                .collect();

            let mut matched = 0usize;
            let on_match = |want: &mut Tagged, have: &Tagged| {
                assert_eq!(want.0, have.0);
                matched += 1;
                want.1 = "matched";
            };
            let actions = generate_map_diff_actions_with(desired, current, on_match);

            let keys = |items: &[Tagged]| -> BTreeSet<String> {
                items.iter().map(|(k, _)| k.clone()).collect()
            };

            prop_assert_eq!(matched, shared.len());
            prop_assert_eq!(keys(&actions.items_to_insert), only_desired);
            prop_assert_eq!(keys(&actions.items_to_update), shared);
            prop_assert_eq!(keys(&actions.items_to_delete), only_current);
            prop_assert!(actions.items_to_insert.iter().all(|(_, tag)| *tag == "desired"));
            prop_assert!(actions.items_to_update.iter().all(|(_, tag)| *tag == "matched"));
            prop_assert!(actions.items_to_delete.iter().all(|(_, tag)| *tag == "current"));
        }
    }
}
