use std::sync::Arc;

use tracing::{debug, info, warn};

use ogs_diff::{generate_map_diff_actions_with, handle_map_diff_actions, MapDiffActions};
use ogs_store::{KindRefresher, SchemaRepository, StoreResult};
use ogs_types::{keyed_on_name, ExtensionMember, GraphSchema};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::plan::{ApplyStats, SchemaPlan, UpsertReport};

/// Reconciles stored graph schema extensions with a desired [`GraphSchema`].
pub struct OpenGraphSchemaService<R: ?Sized, K: ?Sized> {
    repository: Arc<R>,
    refresher: Arc<K>,
    config: ServiceConfig,
}

impl<R, K> OpenGraphSchemaService<R, K>
where
    R: SchemaRepository + ?Sized,
    K: KindRefresher + ?Sized,
{
    pub fn new(repository: Arc<R>, refresher: Arc<K>) -> Self {
        Self::with_config(repository, refresher, ServiceConfig::default())
    }

    pub fn with_config(repository: Arc<R>, refresher: Arc<K>, config: ServiceConfig) -> Self {
        Self {
            repository,
            refresher,
            config,
        }
    }

    /// Load an extension and everything it owns.
    pub fn get_graph_schema_by_extension_name(&self, name: &str) -> ServiceResult<GraphSchema> {
        let extension = self
            .repository
            .get_extension_by_name(name)?
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))?;
        let id = extension.id();

        Ok(GraphSchema {
            node_kinds: self.repository.list_node_kinds(id)?,
            edge_kinds: self.repository.list_edge_kinds(id)?,
            properties: self.repository.list_properties(id)?,
            extension,
        })
    }

    /// Compute what an upsert of `graph_schema` would change, without
    /// writing anything.
    pub fn plan_graph_schema_extension(
        &self,
        graph_schema: GraphSchema,
    ) -> ServiceResult<SchemaPlan> {
        validate_graph_schema(&graph_schema, &self.config)?;

        let GraphSchema {
            mut extension,
            node_kinds,
            edge_kinds,
            properties,
        } = graph_schema;
        extension.is_builtin = false;

        let current = match self.get_graph_schema_by_extension_name(&extension.name) {
            Ok(current) => Some(current),
            Err(ServiceError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };

        let mut plan = match current {
            Some(current) => {
                if current.extension.is_builtin {
                    return Err(ServiceError::BuiltinExtension(current.extension.name));
                }
                extension.serial = current.extension.serial.clone();
                SchemaPlan {
                    extension,
                    extension_exists: true,
                    node_kinds: diff_members(node_kinds, current.node_kinds),
                    edge_kinds: diff_members(edge_kinds, current.edge_kinds),
                    properties: diff_members(properties, current.properties),
                }
            }
            None => SchemaPlan {
                extension,
                extension_exists: false,
                node_kinds: diff_members(node_kinds, Vec::new()),
                edge_kinds: diff_members(edge_kinds, Vec::new()),
                properties: diff_members(properties, Vec::new()),
            },
        };

        let extension_id = plan.extension.id();
        plan.bind_to_extension(extension_id);

        debug!(
            extension = %plan.extension.name,
            exists = plan.extension_exists,
            actions = plan.len(),
            "planned graph schema extension"
        );
        Ok(plan)
    }

    /// Create or update the extension named in `graph_schema` and reconcile
    /// its node kinds, edge kinds and properties.
    ///
    /// Returns `true` if the extension already existed.
    pub fn upsert_graph_schema_extension(&self, graph_schema: GraphSchema) -> ServiceResult<bool> {
        let plan = self.plan_graph_schema_extension(graph_schema)?;
        let report = self.apply_plan(plan)?;
        Ok(report.extension_existed)
    }

    /// Write a plan produced by [`plan_graph_schema_extension`] to the store.
    ///
    /// Collections are applied in the order node kinds, edge kinds,
    /// properties. The first failing write stops the upsert; writes that
    /// already ran stay in place. An existing extension is checked for the
    /// built-in flag again before it is written.
    ///
    /// [`plan_graph_schema_extension`]: Self::plan_graph_schema_extension
    pub fn apply_plan(&self, mut plan: SchemaPlan) -> ServiceResult<UpsertReport> {
        let extension = if plan.extension_exists {
            let stored = self.repository.get_extension_by_id(plan.extension.id())?;
            if stored.is_builtin {
                return Err(ServiceError::BuiltinExtension(stored.name));
            }
            self.repository.update_extension(&plan.extension)?
        } else {
            self.repository.create_extension(
                &plan.extension.name,
                &plan.extension.display_name,
                &plan.extension.version,
            )?
        };
        plan.bind_to_extension(extension.id());

        let node_kinds = self.apply_members(
            "node kinds",
            plan.node_kinds,
            R::delete_node_kind,
            R::update_node_kind,
            R::create_node_kind,
        )?;
        let edge_kinds = self.apply_members(
            "edge kinds",
            plan.edge_kinds,
            R::delete_edge_kind,
            R::update_edge_kind,
            R::create_edge_kind,
        )?;
        let properties = self.apply_members(
            "properties",
            plan.properties,
            R::delete_property,
            R::update_property,
            R::create_property,
        )?;

        if self.config.refresh_kinds {
            if let Err(err) = self.refresher.refresh_kinds() {
                warn!(extension = %extension.name, error = %err, "refreshing graph kinds failed");
            }
        }

        info!(
            extension = %extension.name,
            id = extension.id(),
            existed = plan.extension_exists,
            "upserted graph schema extension"
        );

        Ok(UpsertReport {
            extension,
            extension_existed: plan.extension_exists,
            node_kinds,
            edge_kinds,
            properties,
        })
    }

    fn apply_members<T: ExtensionMember>(
        &self,
        collection: &'static str,
        actions: MapDiffActions<T>,
        delete: fn(&R, i32) -> StoreResult<()>,
        update: fn(&R, &T) -> StoreResult<T>,
        create: fn(&R, &T) -> StoreResult<T>,
    ) -> StoreResult<ApplyStats> {
        let repository = &*self.repository;
        let mut stats = ApplyStats::default();

        handle_map_diff_actions(
            &mut stats,
            actions,
            |stats: &mut ApplyStats, item: T| -> StoreResult<()> {
                delete(repository, item.id())?;
                stats.deleted += 1;
                Ok(())
            },
            |stats: &mut ApplyStats, item: T| -> StoreResult<()> {
                update(repository, &item)?;
                stats.updated += 1;
                Ok(())
            },
            |stats: &mut ApplyStats, item: T| -> StoreResult<()> {
                create(repository, &item)?;
                stats.inserted += 1;
                Ok(())
            },
        )?;

        debug!(
            collection,
            deleted = stats.deleted,
            updated = stats.updated,
            inserted = stats.inserted,
            "applied schema members"
        );
        Ok(stats)
    }
}

/// Check the shape of an incoming schema before touching the store.
pub fn validate_graph_schema(
    graph_schema: &GraphSchema,
    config: &ServiceConfig,
) -> ServiceResult<()> {
    if graph_schema.extension.name.trim().is_empty() {
        return Err(ServiceError::Validation(
            "graph schema extension name is required".into(),
        ));
    }
    if config.require_node_kinds && graph_schema.node_kinds.is_empty() {
        return Err(ServiceError::Validation(
            "graph schema node kinds are required".into(),
        ));
    }
    Ok(())
}

fn diff_members<T: ExtensionMember>(desired: Vec<T>, current: Vec<T>) -> MapDiffActions<T> {
    generate_map_diff_actions_with(
        keyed_on_name(desired),
        keyed_on_name(current),
        carry_serial::<T>,
    )
}

fn carry_serial<T: ExtensionMember>(desired: &mut T, current: &T) {
    *desired.serial_mut() = current.serial().clone();
}
