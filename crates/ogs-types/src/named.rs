//! Name keying for schema records.
//!
//! Schema records are reconciled by name: the name is the identity shared by
//! an incoming record and its stored counterpart, while the [`Serial`] only
//! exists on the stored side.
//!
//! [`Serial`]: crate::Serial

use std::collections::HashMap;

/// A record identified by a unique name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Collect records into a map keyed on their name.
///
/// If two records share a name the later one wins.
pub fn keyed_on_name<T, I>(items: I) -> HashMap<String, T>
where
    T: Named,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .map(|item| (item.name().to_string(), item))
        .collect()
}
