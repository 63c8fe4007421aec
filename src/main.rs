mod cli;
mod config;
mod engine;
mod error;
mod extract;
mod graph;
mod output;
mod query;
mod scan;
mod store;
mod walker;

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use config::MigrationGraphConfig;
use graph::DependencyGraph;
use graph::record::Partition;
use store::Store;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("MIGRATION_GRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "migration_graph=debug,warn"
        } else {
            "warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn open_store(root: &Path, config: &MigrationGraphConfig, db: Option<&Path>) -> Result<Store> {
    Store::open(&config.database_path(root, db))
}

/// Open the store for a read command, failing if no scan was ever committed.
fn open_scanned_store(
    root: &Path,
    config: &MigrationGraphConfig,
    db: Option<&Path>,
) -> Result<Store> {
    let store = open_store(root, config, db)?;
    if store.last_scan()?.is_none() {
        bail!(
            "no scan results in {}; run `migration-graph scan {}` first",
            store.path().display(),
            root.display()
        );
    }
    Ok(store)
}

/// Project-relative file argument with `/` separators and no leading `./`.
fn normalize_file_arg(file: &str) -> String {
    file.replace('\\', "/")
        .trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let db = cli.db.as_deref();

    match cli.command {
        Commands::Scan { path, format } => {
            let config = MigrationGraphConfig::load(&path);
            let mut store = open_store(&path, &config, db)?;
            let summary = scan::full_scan(&path, &config, &mut store)?;
            output::print_summary(&summary, &format);
        }

        Commands::Report {
            path,
            limit,
            format,
        } => {
            let config = MigrationGraphConfig::load(&path);
            let store = open_scanned_store(&path, &config, db)?;
            let entries = query::priority::prioritized_components(&store, limit)?;
            query::output::format_priority(&entries, &format);
        }

        Commands::Rollup {
            path,
            prefix,
            format,
        } => {
            let config = MigrationGraphConfig::load(&path);
            let store = open_scanned_store(&path, &config, db)?;
            let rollup = query::rollup::folder_rollup(&store, &normalize_file_arg(&prefix))?;
            query::output::format_rollup(&rollup, &format);
        }

        Commands::Show { path, file, format } => {
            let config = MigrationGraphConfig::load(&path);
            let store = open_scanned_store(&path, &config, db)?;
            let file = normalize_file_arg(&file);
            let partition = Partition::from_path(&file)
                .with_context(|| format!("{file} is outside components/, layouts/ and pages/"))?;
            let Some(record) = store.get(partition, &file)? else {
                bail!("{file} not found in the last scan");
            };
            query::output::format_record(&record, partition, &format);
        }

        Commands::Cycles { path, format } => {
            let config = MigrationGraphConfig::load(&path);
            let store = open_scanned_store(&path, &config, db)?;
            let components = store.load_partition(Partition::Components)?;
            let graph = DependencyGraph::build(&components)?;
            let cycles = graph::cycles::find_cycles(&graph);
            query::output::format_cycles(&cycles, &format);
        }

        Commands::Copy {
            path,
            file,
            template,
            format,
        } => {
            let config = MigrationGraphConfig::load(&path);
            let store = open_scanned_store(&path, &config, db)?;
            let template = template.as_deref().unwrap_or(config.copy_template());
            let plan = query::copy::copy_plan(&store, &normalize_file_arg(&file), template)?;
            query::output::format_copy_plan(&plan, &format);
        }
    }

    Ok(())
}
