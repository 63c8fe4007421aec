use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Migration effort and priority estimator for Vue component trees.
///
/// migration-graph scans `components/`, `layouts/` and `pages/`, resolves
/// every file's transitive dependencies on local components and on the legacy
/// UI framework, and scores how hard each file is to migrate and how much
/// migrating it unblocks.
#[derive(Parser, Debug)]
#[command(
    name = "migration-graph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Log debug events to stderr (overridden by MIGRATION_GRAPH_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (defaults to `database` from migration-graph.toml, then
    /// `.migration-graph/db.sqlite` under the project root).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// Compact one-line-per-result format (default).
    #[default]
    Compact,
    /// Human-readable columnar table with optional ANSI color when stdout is a terminal.
    Table,
    /// Structured JSON suitable for programmatic consumption.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a project, score every component, layout and page, and store the results.
    ///
    /// Every scan is a full recomputation that replaces the previous results.
    Scan {
        /// Path to the project root.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// List components in migration order: highest value first, then lowest complexity.
    Report {
        /// Path to the project root.
        path: PathBuf,

        /// Show at most this many components.
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Sum migration complexity over a folder, with a per-child breakdown.
    Rollup {
        /// Path to the project root.
        path: PathBuf,

        /// Folder relative to the project root (e.g. `components/forms`); empty for everything.
        #[arg(default_value = "")]
        prefix: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Show the direct and transitive dependencies and scores of one file.
    Show {
        /// Path to the project root.
        path: PathBuf,

        /// File relative to the project root (e.g. `components/UserCard.vue`).
        file: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Report groups of components that depend on each other in a cycle.
    Cycles {
        /// Path to the project root.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },

    /// Print copy commands for a file and every local component it depends on.
    Copy {
        /// Path to the project root.
        path: PathBuf,

        /// File relative to the project root.
        file: String,

        /// Command template with `[[from]]` and `[[to]]` placeholders
        /// (defaults to `copy_template` from migration-graph.toml, then `cp [[from]] [[to]]`).
        #[arg(long)]
        template: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
        format: OutputFormat,
    },
}
