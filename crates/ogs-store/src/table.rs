//! A single in-memory table with serial allocation and a unique name
//! constraint.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ogs_types::{
    GraphSchemaEdgeKind, GraphSchemaExtension, GraphSchemaNodeKind, GraphSchemaProperty, Serial,
};

use crate::error::{StoreError, StoreResult};

/// A record type stored in a [`Table`].
pub(crate) trait Row: Clone {
    const TABLE: &'static str;

    fn serial(&self) -> &Serial;
    fn serial_mut(&mut self) -> &mut Serial;
    fn name(&self) -> &str;

    /// Owning extension, if the row belongs to one.
    fn extension_id(&self) -> Option<i32> {
        None
    }

    /// Names must be distinct among rows of equal scope. `None` makes the
    /// constraint table-wide.
    fn uniqueness_scope(&self) -> Option<i32> {
        None
    }
}

impl Row for GraphSchemaExtension {
    const TABLE: &'static str = "schema extension";

    fn serial(&self) -> &Serial {
        &self.serial
    }

    fn serial_mut(&mut self) -> &mut Serial {
        &mut self.serial
    }

    fn name(&self) -> &str {
        &self.name
    }
}

macro_rules! impl_member_row {
    ($ty:ty, $table:literal, scoped: $scoped:literal) => {
        impl Row for $ty {
            const TABLE: &'static str = $table;

            fn serial(&self) -> &Serial {
                &self.serial
            }

            fn serial_mut(&mut self) -> &mut Serial {
                &mut self.serial
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn extension_id(&self) -> Option<i32> {
                Some(self.schema_extension_id)
            }

            fn uniqueness_scope(&self) -> Option<i32> {
                if $scoped {
                    Some(self.schema_extension_id)
                } else {
                    None
                }
            }
        }
    };
}

// Kind names are graph-wide identifiers; property names only need to be
// unique within their extension.
impl_member_row!(GraphSchemaNodeKind, "schema node kind", scoped: false);
impl_member_row!(GraphSchemaEdgeKind, "schema edge kind", scoped: false);
impl_member_row!(GraphSchemaProperty, "schema property", scoped: true);

#[derive(Clone, Debug)]
pub(crate) struct Table<T> {
    rows: BTreeMap<i32, T>,
    /// `None` once `i32::MAX` has been handed out.
    next_id: Option<i32>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl<T: Row> Table<T> {
    /// Build a table from previously persisted rows, keeping their serials.
    ///
    /// Every row must carry a positive id that no other row uses, and the
    /// unique name constraint must hold across the imported rows.
    pub(crate) fn from_rows(rows: impl IntoIterator<Item = T>) -> StoreResult<Self> {
        let mut table = Self::default();
        for row in rows {
            let id = row.serial().id;
            if id <= 0 {
                return Err(StoreError::Serialization(format!(
                    "{} {} has invalid id {id}",
                    T::TABLE,
                    row.name()
                )));
            }
            if table.rows.contains_key(&id) {
                return Err(StoreError::Serialization(format!(
                    "duplicate {} id {id}",
                    T::TABLE
                )));
            }
            table.check_unique(&row, None)?;
            table.rows.insert(id, row);
        }
        table.next_id = match table.rows.keys().next_back() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        Ok(table)
    }

    pub(crate) fn get(&self, id: i32) -> StoreResult<T> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { table: T::TABLE, id })
    }

    pub(crate) fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.rows.values().find(|r| predicate(r)).cloned()
    }

    /// Rows matching `predicate`, ordered by id.
    pub(crate) fn list(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|r| predicate(r)).cloned().collect()
    }

    pub(crate) fn insert(&mut self, mut row: T, now: DateTime<Utc>) -> StoreResult<T> {
        self.check_unique(&row, None)?;
        let id = self
            .next_id
            .ok_or(StoreError::IdsExhausted { table: T::TABLE })?;
        self.next_id = id.checked_add(1);
        *row.serial_mut() = Serial::allocate(id, now);
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Replace the row with `row.serial().id`, keeping its creation time.
    pub(crate) fn update(&mut self, mut row: T, now: DateTime<Utc>) -> StoreResult<T> {
        let id = row.serial().id;
        let existing = self
            .rows
            .get(&id)
            .ok_or(StoreError::NotFound { table: T::TABLE, id })?;
        let serial = existing.serial().touched(now);
        self.check_unique(&row, Some(id))?;
        *row.serial_mut() = serial;
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    pub(crate) fn delete(&mut self, id: i32) -> StoreResult<T> {
        self.rows
            .remove(&id)
            .ok_or(StoreError::NotFound { table: T::TABLE, id })
    }

    /// Remove every row owned by `extension_id`, returning how many went.
    pub(crate) fn delete_owned_by(&mut self, extension_id: i32) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, r| r.extension_id() != Some(extension_id));
        before - self.rows.len()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn check_unique(&self, row: &T, exclude: Option<i32>) -> StoreResult<()> {
        let scope = row.uniqueness_scope();
        let clash = self.rows.values().any(|other| {
            Some(other.serial().id) != exclude
                && other.uniqueness_scope() == scope
                && other.name() == row.name()
        });
        if clash {
            return Err(StoreError::DuplicateName {
                table: T::TABLE,
                name: row.name().to_string(),
            });
        }
        Ok(())
    }
}
