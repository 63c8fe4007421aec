use std::collections::BTreeSet;
use std::io::IsTerminal;

use crate::cli::OutputFormat;
use crate::graph::cycles::ComponentCycle;
use crate::graph::record::{DependencyRecord, Partition};
use crate::query::copy::CopyPlan;
use crate::query::priority::PriorityEntry;
use crate::query::rollup::{EntryKind, FolderRollup};

fn bold(use_color: bool) -> impl Fn(&str) -> String {
    move |s: &str| {
        if use_color {
            format!("\x1b[1m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }
}

fn joined(set: &BTreeSet<String>) -> String {
    if set.is_empty() {
        "-".to_string()
    } else {
        set.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("error serialising output: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Priority report
// ---------------------------------------------------------------------------

/// Format and print the migration priority report.
pub fn format_priority(entries: &[PriorityEntry], format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            for e in entries {
                println!(
                    "{} {} value={} complexity={}",
                    e.rank, e.path, e.migration_value, e.migration_complexity
                );
            }
            println!("{} components", entries.len());
        }

        OutputFormat::Table => {
            let use_color = std::io::stdout().is_terminal();

            let name_w = entries
                .iter()
                .map(|e| e.display_name.len())
                .max()
                .unwrap_or(9)
                .max(9);
            let path_w = entries
                .iter()
                .map(|e| e.path.len())
                .max()
                .unwrap_or(4)
                .max(4);

            let header = format!(
                "{:>4}  {:<name_w$}  {:<path_w$}  {:>5}  {:>10}  {:>6}  {:>10}",
                "RANK", "COMPONENT", "PATH", "VALUE", "COMPLEXITY", "LEGACY", "DIRECTIVES"
            );
            println!("{}", bold(use_color)(&header));

            for e in entries {
                println!(
                    "{:>4}  {:<name_w$}  {:<path_w$}  {:>5}  {:>10}  {:>6}  {:>10}",
                    e.rank,
                    e.display_name,
                    e.path,
                    e.migration_value,
                    e.migration_complexity,
                    e.legacy_components,
                    e.legacy_directives,
                );
            }
        }

        OutputFormat::Json => print_json(entries),
    }
}

// ---------------------------------------------------------------------------
// Folder rollup
// ---------------------------------------------------------------------------

/// Format and print a folder rollup.
pub fn format_rollup(rollup: &FolderRollup, format: &OutputFormat) {
    let label = if rollup.prefix.is_empty() {
        "."
    } else {
        rollup.prefix.as_str()
    };

    match format {
        OutputFormat::Compact => {
            println!(
                "{} files={} complexity={} legacy={}",
                label,
                rollup.files,
                rollup.migration_complexity,
                joined(&rollup.legacy_components)
            );
            for e in &rollup.entries {
                let kind = match e.kind {
                    EntryKind::Folder => "dir",
                    EntryKind::File => "file",
                };
                match e.migration_value {
                    Some(value) => println!(
                        "{kind} {} complexity={} value={}",
                        e.path, e.migration_complexity, value
                    ),
                    None => println!(
                        "{kind} {} files={} complexity={}",
                        e.path, e.files, e.migration_complexity
                    ),
                }
            }
        }

        OutputFormat::Table => {
            let header = bold(std::io::stdout().is_terminal());

            println!("{}", header(&format!("=== {label} ===")));
            println!("Files:       {}", rollup.files);
            println!("Complexity:  {}", rollup.migration_complexity);
            println!("Legacy:      {}", joined(&rollup.legacy_components));
            println!();

            if rollup.entries.is_empty() {
                return;
            }
            let path_w = rollup
                .entries
                .iter()
                .map(|e| e.path.len() + 1)
                .max()
                .unwrap_or(4)
                .max(4);
            println!(
                "{}",
                header(&format!(
                    "{:<path_w$}  {:>5}  {:>10}  {:>5}  {}",
                    "PATH", "FILES", "COMPLEXITY", "VALUE", "LEGACY"
                ))
            );
            for e in &rollup.entries {
                let path = match e.kind {
                    EntryKind::Folder => format!("{}/", e.path),
                    EntryKind::File => e.path.clone(),
                };
                let value = e
                    .migration_value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<path_w$}  {:>5}  {:>10}  {:>5}  {}",
                    path,
                    e.files,
                    e.migration_complexity,
                    value,
                    joined(&e.legacy_components)
                );
            }
        }

        OutputFormat::Json => print_json(rollup),
    }
}

// ---------------------------------------------------------------------------
// Single record
// ---------------------------------------------------------------------------

/// Format and print one stored record with its direct and transitive sets.
pub fn format_record(record: &DependencyRecord, partition: Partition, format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            println!("{} {} {}", partition, record.path, record.canonical_name);
            println!("local {}", joined(&record.local_dependencies));
            println!("other {}", joined(&record.other_library_dependencies));
            println!("legacy {}", joined(&record.legacy_components));
            println!("directives {}", joined(&record.legacy_directives));
            println!("all-local {}", joined(&record.closures.local));
            println!("all-other {}", joined(&record.closures.other_library));
            println!("all-legacy {}", joined(&record.closures.legacy_components));
            println!("all-directives {}", joined(&record.closures.legacy_directives));
            match record.migration_value {
                Some(value) => println!(
                    "complexity {} value {}",
                    record.migration_complexity, value
                ),
                None => println!("complexity {}", record.migration_complexity),
            }
        }

        OutputFormat::Table => {
            let header = bold(std::io::stdout().is_terminal());

            println!("{}", header(&format!("=== {} ===", record.display_name)));
            println!("Path:        {}", record.path);
            println!("Partition:   {}", partition);
            println!("Canonical:   {}", record.canonical_name);
            println!("Complexity:  {}", record.migration_complexity);
            if let Some(value) = record.migration_value {
                println!("Value:       {}", value);
            }
            println!();
            println!("{}", header("--- Direct ---"));
            println!("  Local:       {}", joined(&record.local_dependencies));
            println!("  Other:       {}", joined(&record.other_library_dependencies));
            println!("  Legacy:      {}", joined(&record.legacy_components));
            println!("  Directives:  {}", joined(&record.legacy_directives));
            println!();
            println!("{}", header("--- Transitive ---"));
            println!("  Local:       {}", joined(&record.closures.local));
            println!("  Other:       {}", joined(&record.closures.other_library));
            println!("  Legacy:      {}", joined(&record.closures.legacy_components));
            println!("  Directives:  {}", joined(&record.closures.legacy_directives));
        }

        OutputFormat::Json => print_json(record),
    }
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// Format and print component dependency cycles.
pub fn format_cycles(cycles: &[ComponentCycle], format: &OutputFormat) {
    match format {
        OutputFormat::Compact => {
            for cycle in cycles {
                println!("cycle {}", cycle.members.join(" <-> "));
            }
            println!("{} cycles found", cycles.len());
        }

        OutputFormat::Table => {
            let header = bold(std::io::stdout().is_terminal());

            for (i, cycle) in cycles.iter().enumerate() {
                println!("{}", header(&format!("=== Cycle {} ===", i + 1)));
                for member in &cycle.members {
                    println!("  {}", member);
                }
                println!();
            }
            println!("{} cycles found", cycles.len());
        }

        OutputFormat::Json => print_json(cycles),
    }
}

// ---------------------------------------------------------------------------
// Copy plan
// ---------------------------------------------------------------------------

/// Print copy commands. Compact output is a pasteable shell script.
pub fn format_copy_plan(plan: &CopyPlan, format: &OutputFormat) {
    match format {
        OutputFormat::Compact | OutputFormat::Table => {
            println!("# target");
            println!("{}", plan.target.command);
            println!("# direct dependencies");
            for cmd in &plan.direct {
                println!("{}", cmd.command);
            }
            println!("# deep dependencies");
            for cmd in &plan.deep {
                println!("{}", cmd.command);
            }
        }

        OutputFormat::Json => print_json(plan),
    }
}
