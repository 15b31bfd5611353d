use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};

use ogs_diff::{DiffBucket, MapDiffActions};
use ogs_service::{ApplyStats, OpenGraphSchemaService, SchemaPlan, ServiceConfig, UpsertReport};
use ogs_store::{InMemoryKindRefresher, InMemorySchemaStore, SchemaSnapshot};
use ogs_types::{GraphSchema, Named};

use crate::cli::*;

type Service = OpenGraphSchemaService<InMemorySchemaStore, InMemoryKindRefresher>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Plan(args) => cmd_plan(&args, config, cli.format, &mut out),
        Command::Apply(args) => cmd_apply(&args, config, cli.format, &mut out),
        Command::Show(args) => cmd_show(&args, &mut out),
    }
}

fn cmd_plan(
    args: &SchemaArgs,
    config: ServiceConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let schema = read_schema(&args.schema)?;
    let (service, _) = open_service(&args.state, config)?;
    let plan = service.plan_graph_schema_extension(schema)?;

    match format {
        OutputFormat::Text => print_plan(&plan, out)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&plan_json(&plan))?)?
        }
    }
    Ok(())
}

fn cmd_apply(
    args: &SchemaArgs,
    config: ServiceConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let schema = read_schema(&args.schema)?;
    let (service, store) = open_service(&args.state, config)?;

    let plan = service.plan_graph_schema_extension(schema)?;
    let report = service
        .apply_plan(plan)
        .context("upserting graph schema extension")?;
    save_state(&store, &args.state)?;

    match format {
        OutputFormat::Text => print_report(&report, out)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report_json(&report))?)?
        }
    }
    Ok(())
}

fn cmd_show(args: &ShowArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let (service, _) = open_service(&args.state, ServiceConfig::default())?;
    let schema = service.get_graph_schema_by_extension_name(&args.name)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
    Ok(())
}

// ---- State and schema files ----

fn load_config(path: Option<&Path>) -> anyhow::Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ServiceConfig::default()),
    }
}

fn read_schema(path: &Path) -> anyhow::Result<GraphSchema> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading schema {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing schema {}", path.display()))
}

fn load_state(path: &Path) -> anyhow::Result<InMemorySchemaStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "state file missing, starting empty");
        return Ok(InMemorySchemaStore::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading state {}", path.display()))?;
    let snapshot: SchemaSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("parsing state {}", path.display()))?;
    if snapshot.is_empty() {
        tracing::debug!(path = %path.display(), "state file holds no rows");
    }
    InMemorySchemaStore::from_snapshot(snapshot)
        .with_context(|| format!("loading state {}", path.display()))
}

fn save_state(store: &InMemorySchemaStore, path: &Path) -> anyhow::Result<()> {
    let snapshot = store.snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json).with_context(|| format!("writing state {}", path.display()))?;
    Ok(())
}

fn open_service(
    state: &Path,
    config: ServiceConfig,
) -> anyhow::Result<(Service, Arc<InMemorySchemaStore>)> {
    let store = Arc::new(load_state(state)?);
    let refresher = Arc::new(InMemoryKindRefresher::new());
    let service = Service::with_config(store.clone(), refresher, config);
    Ok((service, store))
}

// ---- Output ----

fn print_plan(plan: &SchemaPlan, out: &mut impl Write) -> anyhow::Result<()> {
    let status = if plan.extension_exists {
        format!("existing, id {}", plan.extension.id()).yellow()
    } else {
        "new".green()
    };
    writeln!(out, "Extension {} ({})", plan.extension.name.bold(), status)?;

    print_actions("node kinds", &plan.node_kinds, out)?;
    print_actions("edge kinds", &plan.edge_kinds, out)?;
    print_actions("properties", &plan.properties, out)?;
    Ok(())
}

fn print_actions<T: Named>(
    title: &str,
    actions: &MapDiffActions<T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}:", title.bold())?;
    if actions.is_empty() {
        writeln!(out, "  {}", "(none)".dimmed())?;
        return Ok(());
    }
    for bucket in DiffBucket::ORDER {
        for name in sorted_names(actions.bucket(bucket)) {
            let marker = match bucket {
                DiffBucket::Delete => "-".red(),
                DiffBucket::Update => "~".yellow(),
                DiffBucket::Insert => "+".green(),
            };
            writeln!(out, "  {} {}", marker, name)?;
        }
    }
    Ok(())
}

fn print_report(report: &UpsertReport, out: &mut impl Write) -> anyhow::Result<()> {
    let verb = if report.extension_existed { "Updated" } else { "Created" };
    writeln!(
        out,
        "{} {} extension {} (id {})",
        "✓".green().bold(),
        verb,
        report.extension.name.bold(),
        report.extension.id()
    )?;
    for (title, stats) in [
        ("node kinds", report.node_kinds),
        ("edge kinds", report.edge_kinds),
        ("properties", report.properties),
    ] {
        writeln!(
            out,
            "  {}: {} deleted, {} updated, {} inserted",
            title, stats.deleted, stats.updated, stats.inserted
        )?;
    }
    Ok(())
}

fn sorted_names<T: Named>(items: &[T]) -> Vec<&str> {
    let mut names: Vec<&str> = items.iter().map(Named::name).collect();
    names.sort_unstable();
    names
}

fn actions_json<T: Named>(actions: &MapDiffActions<T>) -> Value {
    let mut object = serde_json::Map::new();
    for bucket in DiffBucket::ORDER {
        object.insert(bucket.as_str().to_string(), json!(sorted_names(actions.bucket(bucket))));
    }
    Value::Object(object)
}

fn plan_json(plan: &SchemaPlan) -> Value {
    json!({
        "extension": plan.extension.name,
        "exists": plan.extension_exists,
        "node_kinds": actions_json(&plan.node_kinds),
        "edge_kinds": actions_json(&plan.edge_kinds),
        "properties": actions_json(&plan.properties),
    })
}

fn stats_json(stats: &ApplyStats) -> Value {
    json!({ "deleted": stats.deleted, "updated": stats.updated, "inserted": stats.inserted })
}

fn report_json(report: &UpsertReport) -> Value {
    json!({
        "extension": report.extension.name,
        "id": report.extension.id(),
        "existed": report.extension_existed,
        "node_kinds": stats_json(&report.node_kinds),
        "edge_kinds": stats_json(&report.edge_kinds),
        "properties": stats_json(&report.properties),
    })
}
