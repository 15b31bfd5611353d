use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and bookkeeping timestamps of a persisted row.
///
/// The store assigns a `Serial` when a row is created. A default serial
/// (`id == 0`) marks a record that has never been persisted, which is how
/// incoming desired-state records arrive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serial {
    pub id: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Serial {
    /// A freshly allocated serial stamped with `now`.
    pub fn allocate(id: i32, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        }
    }

    /// Returns `true` if this serial was assigned by a store.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Copy of this serial with `updated_at` moved to `now`.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            ..self.clone()
        }
    }
}
