//! Accepted shapes for desired and current state.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A value that can be consumed as a keyed state map.
///
/// `Option<M>` is accepted so that an absent map behaves exactly like an
/// empty one.
pub trait IntoStateMap<K, V> {
    fn into_state_map(self) -> HashMap<K, V>;
}

impl<K: Eq + Hash, V> IntoStateMap<K, V> for HashMap<K, V> {
    fn into_state_map(self) -> HashMap<K, V> {
        self
    }
}

impl<K: Eq + Hash, V> IntoStateMap<K, V> for BTreeMap<K, V> {
    fn into_state_map(self) -> HashMap<K, V> {
        self.into_iter().collect()
    }
}

/// Later pairs win when a key repeats.
impl<K: Eq + Hash, V> IntoStateMap<K, V> for Vec<(K, V)> {
    fn into_state_map(self) -> HashMap<K, V> {
        self.into_iter().collect()
    }
}

impl<K, V, M> IntoStateMap<K, V> for Option<M>
where
    M: IntoStateMap<K, V>,
{
    fn into_state_map(self) -> HashMap<K, V> {
        match self {
            Some(map) => map.into_state_map(),
            None => HashMap::new(),
        }
    }
}
