pub mod classify;
pub mod naming;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use crate::graph::record::DependencyRecord;

use classify::{Classifier, TagClass};
use naming::{display_name, kebab_case};

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// `<script ...>...</script>` blocks; group 1 is the body.
fn script_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("valid regex"))
}

fn style_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"))
}

fn html_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"))
}

/// Opening tag names; group 1 is the raw tag.
fn opening_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([A-Za-z][A-Za-z0-9_\-]*)[\s./:>]").expect("valid regex"))
}

/// Quoted `.vue` module specifiers in script blocks; group 1 is the specifier.
fn vue_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"`]([^'"`\s]+\.vue)['"`]"#).expect("valid regex"))
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Classified direct dependencies of one component source file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectDependencies {
    pub local: BTreeSet<String>,
    pub other_library: BTreeSet<String>,
    pub legacy_components: BTreeSet<String>,
    pub legacy_directives: BTreeSet<String>,
}

/// Extract direct dependencies from single-file-component source text.
///
/// Template tags are canonicalized and classified; local `.vue` imports in
/// script blocks count as local dependencies under their canonical name.
/// This is pattern matching over text, not parsing: tags inside string
/// literals are picked up too, and dynamic `<component :is>` targets are not.
pub fn extract_dependencies(source: &str, classifier: &Classifier) -> DirectDependencies {
    let mut deps = DirectDependencies::default();

    let scripts: Vec<&str> = script_block()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    let without_scripts = script_block().replace_all(source, "");
    let without_styles = style_block().replace_all(&without_scripts, "");
    let template = html_comment().replace_all(&without_styles, "");

    for caps in opening_tag().captures_iter(&template) {
        let tag = classifier.canonical_tag(&caps[1]);
        match classifier.classify_tag(&tag) {
            Some(TagClass::Local) => deps.local.insert(tag),
            Some(TagClass::OtherLibrary) => deps.other_library.insert(tag),
            Some(TagClass::LegacyComponent) => deps.legacy_components.insert(tag),
            None => false,
        };
    }

    deps.legacy_directives.extend(classifier.directives_in(&template));

    for script in scripts {
        for caps in vue_import().captures_iter(script) {
            let name = kebab_case(&display_name(&caps[1]));
            if !name.is_empty() {
                deps.local.insert(name);
            }
        }
    }

    deps
}

/// Read one file and build its direct dependency record.
///
/// `rel_path` is relative to `root` and uses `/` separators.
pub fn analyze_file(root: &Path, rel_path: &str, classifier: &Classifier) -> Result<DependencyRecord> {
    let bytes = std::fs::read(root.join(rel_path))
        .with_context(|| format!("failed to read {rel_path}"))?;
    let source = String::from_utf8_lossy(&bytes);

    let display = display_name(rel_path);
    let canonical = kebab_case(&display);
    let deps = extract_dependencies(&source, classifier);

    let mut record = DependencyRecord::new(rel_path, display, canonical);
    record.local_dependencies = deps.local;
    record.other_library_dependencies = deps.other_library;
    record.legacy_components = deps.legacy_components;
    record.legacy_directives = deps.legacy_directives;
    Ok(record)
}

/// Analyze a batch of files in parallel. Output order matches `paths`.
pub fn analyze_partition(
    root: &Path,
    paths: &[String],
    classifier: &Classifier,
) -> Result<Vec<DependencyRecord>> {
    paths
        .par_iter()
        .map(|path| analyze_file(root, path, classifier))
        .collect()
}
