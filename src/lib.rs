pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod csv_codec;
pub mod dataset;
pub mod error;
pub mod io_utils;
pub mod service;
pub mod sqlite_codec;
pub mod table;

use std::{env, fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info};
use serde_json::{Map, Value as JsonValue};

use crate::{
    analysis::{SignatureTable, WorkflowSummary},
    cli::{Cli, Commands},
    config::CatalogRoots,
    dataset::Dataset,
    service::DataService,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("lead_inspector", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let roots = CatalogRoots::resolve(
        &cli.roots.root,
        cli.roots.lead_list_dir.as_deref(),
        cli.roots.leads_dir.as_deref(),
    );
    debug!("Catalog roots: {:?}", roots);
    match cli.command {
        Commands::List(args) => handle_list(&roots, &args),
        Commands::Show(args) => handle_show(&roots, &args),
        Commands::Workflow(args) => handle_workflow(roots, &args),
        Commands::Save(args) => handle_save(&roots, &args),
        Commands::Export(args) => handle_export(&roots, &args),
    }
}

fn handle_list(roots: &CatalogRoots, args: &cli::ListArgs) -> Result<()> {
    let service = DataService::new(roots.clone());
    let datasets = service.list_datasets();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&datasets)?);
        return Ok(());
    }
    if datasets.is_empty() {
        let scanned = service.roots();
        info!(
            "No datasets found under {:?} or {:?}",
            scanned.csv_root, scanned.sqlite_root
        );
        return Ok(());
    }
    let headers = ["name", "display name", "size", "modified", "source"]
        .map(String::from)
        .to_vec();
    let rows = datasets
        .iter()
        .map(|d| {
            vec![
                d.name.clone(),
                d.display_name.clone(),
                d.size_label.clone(),
                d.modified_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                d.source.kind().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_show(roots: &CatalogRoots, args: &cli::ShowArgs) -> Result<()> {
    let service = DataService::new(roots.clone());
    let mut dataset = service
        .load(&args.name)
        .with_context(|| format!("Loading dataset '{}'", args.name))?;
    if let Some(query) = &args.search {
        dataset = dataset.filter_matching(query);
    }
    if let Some(directive) = &args.sort {
        let (column, descending) = crate::dataset::parse_sort_directive(directive);
        if !dataset.columns().contains(&column) {
            bail!("Unknown sort column '{column}' in '{}'", args.name);
        }
        dataset.sort_by(&column, descending);
    }
    let matched = dataset.len();
    if args.rows > 0 {
        dataset = dataset.head(args.rows);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(dataset.rows())?);
        return Ok(());
    }
    table::print_table(dataset.columns().names(), &dataset.records());
    info!(
        "Displayed {} of {} row(s) from '{}'",
        dataset.len(),
        matched,
        args.name
    );
    Ok(())
}

fn handle_workflow(roots: CatalogRoots, args: &cli::WorkflowArgs) -> Result<()> {
    let service = match &args.signatures {
        Some(path) => DataService::with_signatures(roots, SignatureTable::load(path)?),
        None => DataService::new(roots),
    };
    let summary = service
        .summarize(&args.name)
        .with_context(|| format!("Analyzing dataset '{}'", args.name))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &WorkflowSummary) {
    println!(
        "rows: {}  columns: {}  original: {}  enriched: {}",
        summary.total_rows,
        summary.total_columns,
        summary.original_columns,
        summary.enriched_columns
    );
    if summary.integrations.is_empty() {
        println!("No integration columns found.");
        return;
    }
    let headers = [
        "integration",
        "category",
        "populated",
        "empty",
        "total",
        "success %",
        "columns",
    ]
    .map(String::from)
    .to_vec();
    let rows = summary
        .integrations
        .iter()
        .map(|(name, report)| {
            vec![
                name.clone(),
                report.category.to_string(),
                report.populated.to_string(),
                report.empty.to_string(),
                report.total.to_string(),
                report.success_rate.clone(),
                report.columns.join(", "),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
}

fn handle_save(roots: &CatalogRoots, args: &cli::SaveArgs) -> Result<()> {
    let dataset = read_input_rows(&args.input)
        .with_context(|| format!("Reading rows from {:?}", args.input))?;
    if dataset.is_empty() {
        info!("No rows in {:?}; '{}' left unchanged", args.input, args.name);
        return Ok(());
    }
    DataService::new(roots.clone())
        .save(&args.name, &dataset)
        .with_context(|| format!("Saving dataset '{}'", args.name))?;
    Ok(())
}

fn read_input_rows(path: &Path) -> Result<Dataset> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        return Ok(csv_codec::read_file(path)?);
    }
    let raw = fs::read_to_string(path).with_context(|| format!("Opening {path:?}"))?;
    let records: Vec<Map<String, JsonValue>> =
        serde_json::from_str(&raw).context("Expected a JSON array of objects")?;
    Ok(Dataset::from_records(records))
}

fn handle_export(roots: &CatalogRoots, args: &cli::ExportArgs) -> Result<()> {
    let written = DataService::new(roots.clone())
        .export(&args.name, &args.output)
        .with_context(|| format!("Exporting dataset '{}'", args.name))?;
    if written == 0 {
        info!("'{}' has no rows; nothing written to {:?}", args.name, args.output);
    }
    Ok(())
}
