use std::collections::BTreeSet;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::extract::naming::kebab_case;
use crate::graph::record::Partition;
use crate::store::Store;

pub const FROM_PLACEHOLDER: &str = "[[from]]";
pub const TO_PLACEHOLDER: &str = "[[to]]";

/// One file to copy into the new codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyCommand {
    pub from: String,
    pub to: String,
    /// The copy template with both placeholders filled in.
    pub command: String,
}

/// Everything that has to move together with one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyPlan {
    pub target: CopyCommand,
    /// Components the target uses directly.
    pub direct: Vec<CopyCommand>,
    /// Components reached only through other components.
    pub deep: Vec<CopyCommand>,
}

/// Build copy commands for `path` and every local component it depends on.
///
/// Dangling names are skipped: there is no file to copy for them.
pub fn copy_plan(store: &Store, path: &str, template: &str) -> Result<CopyPlan> {
    let path = path.trim_start_matches("./").trim_start_matches('/');
    let Some(partition) = Partition::from_path(path) else {
        bail!("{path} is outside components/, layouts/ and pages/");
    };
    let Some(record) = store.get(partition, path)? else {
        bail!("{path} not found in {partition}; run a scan first");
    };

    let direct_names = &record.local_dependencies;
    let deep_names: BTreeSet<String> = record
        .closures
        .local
        .iter()
        .filter(|name| !direct_names.contains(*name))
        .cloned()
        .collect();

    let to_commands = |paths: Vec<String>| -> Vec<CopyCommand> {
        paths.iter().map(|p| copy_command(p, template)).collect()
    };
    let direct: Vec<String> = store
        .components_by_canonical(direct_names)?
        .into_iter()
        .filter(|r| r.path != record.path)
        .map(|r| r.path)
        .collect();
    let deep: Vec<String> = store
        .components_by_canonical(&deep_names)?
        .into_iter()
        .filter(|r| r.path != record.path)
        .map(|r| r.path)
        .collect();

    Ok(CopyPlan {
        target: copy_command(&record.path, template),
        direct: to_commands(direct),
        deep: to_commands(deep),
    })
}

/// Fill the template for one file.
pub fn copy_command(from: &str, template: &str) -> CopyCommand {
    let to = destination_path(from);
    CopyCommand {
        command: template
            .replace(FROM_PLACEHOLDER, from)
            .replace(TO_PLACEHOLDER, &to),
        from: from.to_string(),
        to,
    }
}

/// Destination with a kebab-cased file name. A nested `Foo/index.vue`
/// becomes `foo.vue` next to the `Foo` folder.
pub fn destination_path(from: &str) -> String {
    let mut parts: Vec<&str> = from.split('/').collect();
    if parts.len() >= 3 && parts.last() == Some(&"index.vue") {
        parts.pop();
    }

    let Some(name) = parts.pop() else {
        return from.to_string();
    };
    let stem = name.strip_suffix(".vue").unwrap_or(name);
    let file = format!("{}.vue", kebab_case(stem));

    if parts.is_empty() {
        file
    } else {
        format!("{}/{}", parts.join("/"), file)
    }
}
