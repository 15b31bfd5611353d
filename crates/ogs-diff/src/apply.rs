//! Diff application: run the effect functions bucket by bucket.

use tracing::{debug, warn};

use crate::actions::{DiffBucket, MapDiffActions};

/// Apply `actions` through the given effect functions.
///
/// All deletes run first, then all updates, then all inserts; within a bucket
/// items run in bucket order.
///
/// `ctx` is handed unchanged to every effect, typically a transaction or a
/// repository handle. The first effect error stops the whole application and
/// is returned as is. Effects already run are not undone.
pub fn handle_map_diff_actions<C, V, E, D, U, I>(
    ctx: &mut C,
    actions: MapDiffActions<V>,
    mut delete: D,
    mut update: U,
    mut insert: I,
) -> Result<(), E>
where
    C: ?Sized,
    D: FnMut(&mut C, V) -> Result<(), E>,
    U: FnMut(&mut C, V) -> Result<(), E>,
    I: FnMut(&mut C, V) -> Result<(), E>,
{
    let MapDiffActions {
        items_to_delete,
        items_to_update,
        items_to_insert,
    } = actions;

    apply_bucket(&mut *ctx, DiffBucket::Delete, items_to_delete, &mut delete)?;
    apply_bucket(&mut *ctx, DiffBucket::Update, items_to_update, &mut update)?;
    apply_bucket(&mut *ctx, DiffBucket::Insert, items_to_insert, &mut insert)?;
    Ok(())
}

fn apply_bucket<C, V, E, F>(
    ctx: &mut C,
    bucket: DiffBucket,
    items: Vec<V>,
    effect: &mut F,
) -> Result<(), E>
where
    C: ?Sized,
    F: FnMut(&mut C, V) -> Result<(), E>,
{
    if items.is_empty() {
        return Ok(());
    }

    let total = items.len();
    debug!(%bucket, total, "applying diff actions");

    for (index, item) in items.into_iter().enumerate() {
        if let Err(err) = effect(&mut *ctx, item) {
            warn!(%bucket, index, total, "diff action failed, aborting");
            return Err(err);
        }
    }
    Ok(())
}
