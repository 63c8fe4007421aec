use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};

use crate::config::MigrationGraphConfig;
use crate::engine::{self, ScanInput};
use crate::extract::{self, classify::Classifier};
use crate::graph::record::Partition;
use crate::output::ScanSummary;
use crate::store::Store;
use crate::walker;

/// Run a full scan of `root` and replace the store contents with it.
///
/// Discovery and extraction run per partition, components first; scoring
/// runs once over the complete record set; persistence is a single
/// transaction. Any failure leaves the store as it was.
pub fn full_scan(
    root: &Path,
    config: &MigrationGraphConfig,
    store: &mut Store,
) -> Result<ScanSummary> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let start = Instant::now();
    let classifier = Classifier::new(&config.classify).context("invalid [classify] configuration")?;

    let mut input = ScanInput::default();
    for partition in Partition::ALL {
        let paths = walker::discover(root, partition, config)
            .with_context(|| format!("discover {partition}"))?;
        let records = extract::analyze_partition(root, &paths, &classifier)?;
        tracing::info!(
            partition = %partition,
            files = records.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "extracted"
        );

        match partition {
            Partition::Components => input.components = records,
            Partition::Layouts => input.layouts = records,
            Partition::Pages => input.pages = records,
        }
    }

    let output = engine::run(input, &config.weights)?;
    store.replace_scan(&output)?;

    Ok(ScanSummary {
        components: output.components.len(),
        layouts: output.layouts.len(),
        pages: output.pages.len(),
        dangling: output.dangling,
        cycles: output.cycles,
        database: store.path().display().to_string(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, source: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "components/Icon.vue", "<template><v-icon>x</v-icon><svg/></template>");
        write(
            root,
            "components/AppButton.vue",
            "<template><v-btn v-ripple><Icon/></v-btn></template>",
        );
        write(
            root,
            "components/cards/UserCard.vue",
            "<template><v-card><app-button/><MissingThing/></v-card></template>",
        );
        write(root, "layouts/default.vue", "<template><v-app><AppButton/><nuxt/></v-app></template>");
        write(root, "pages/index.vue", "<template><div><UserCard/></div></template>");
        dir
    }

    #[test]
    fn test_full_scan_persists_scored_records() {
        let dir = project();
        let mut store = Store::open(&dir.path().join(".migration-graph/db.sqlite")).unwrap();

        let summary = full_scan(dir.path(), &MigrationGraphConfig::default(), &mut store).unwrap();
        assert_eq!((summary.components, summary.layouts, summary.pages), (3, 1, 1));
        assert_eq!(summary.dangling.len(), 1);
        assert_eq!(summary.dangling[0].name, "missing-thing");
        assert!(summary.cycles.is_empty());

        let button = store
            .get(Partition::Components, "components/AppButton.vue")
            .unwrap()
            .unwrap();
        // Used directly by UserCard; reached by the default layout and the index page.
        assert_eq!(button.migration_value, Some(1 + 3 + 2));
        // local {icon} x5, legacy {v-btn} x3, directives {v-ripple} x2.
        assert_eq!(button.migration_complexity, 5 + 3 + 2);

        let page = store.get(Partition::Pages, "pages/index.vue").unwrap().unwrap();
        let local: Vec<&str> = page.closures.local.iter().map(String::as_str).collect();
        assert_eq!(local, vec!["app-button", "icon", "user-card"]);
        assert_eq!(page.migration_value, None);
    }

    #[test]
    fn test_duplicate_component_leaves_store_untouched() {
        let dir = project();
        let mut store = Store::open(&dir.path().join("db.sqlite")).unwrap();
        full_scan(dir.path(), &MigrationGraphConfig::default(), &mut store).unwrap();

        write(dir.path(), "components/legacy/Icon.vue", "<template><i/></template>");
        assert!(full_scan(dir.path(), &MigrationGraphConfig::default(), &mut store).is_err());
        assert_eq!(store.load_partition(Partition::Components).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(&dir.path().join("db.sqlite")).unwrap();
        let missing = dir.path().join("nope");
        assert!(full_scan(&missing, &MigrationGraphConfig::default(), &mut store).is_err());
    }
}
