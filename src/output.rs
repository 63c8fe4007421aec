use serde::Serialize;

use crate::cli::OutputFormat;
use crate::engine::DanglingDependency;
use crate::graph::cycles::ComponentCycle;

/// Aggregate statistics produced by a scan.
#[derive(Debug, Serialize)]
pub struct ScanSummary {
    pub components: usize,
    pub layouts: usize,
    pub pages: usize,
    /// Local dependencies that no component defines.
    pub dangling: Vec<DanglingDependency>,
    /// Component dependency cycles (diagnostic only).
    pub cycles: Vec<ComponentCycle>,
    /// Database the scan was written to.
    pub database: String,
    /// Wall-clock time for the scan in seconds.
    pub elapsed_secs: f64,
}

impl ScanSummary {
    pub fn file_count(&self) -> usize {
        self.components + self.layouts + self.pages
    }
}

/// Print a summary of the scan.
///
/// JSON goes to stdout as one pretty-printed object. Otherwise a cargo-style
/// summary goes to stdout and dangling references are listed on **stderr** so
/// that stdout stays machine-friendly.
pub fn print_summary(summary: &ScanSummary, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            match serde_json::to_string_pretty(summary) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("error serialising summary: {}", e),
            }
            return;
        }

        OutputFormat::Compact => {
            println!(
                "scanned {} files ({} components, {} layouts, {} pages) in {:.2}s",
                summary.file_count(),
                summary.components,
                summary.layouts,
                summary.pages,
                summary.elapsed_secs,
            );
        }

        OutputFormat::Table => {
            println!(
                "Scanned {} files in {:.2}s",
                summary.file_count(),
                summary.elapsed_secs
            );
            println!(
                "  {} components, {} layouts, {} pages",
                summary.components, summary.layouts, summary.pages,
            );
            println!("  Written to {}", summary.database);
        }
    }

    if !summary.cycles.is_empty() {
        println!("  {} component cycles", summary.cycles.len());
    }

    if !summary.dangling.is_empty() {
        eprintln!("  {} dangling local dependencies", summary.dangling.len());
        for d in &summary.dangling {
            eprintln!("    {} -> {}", d.path, d.name);
        }
    }
}
