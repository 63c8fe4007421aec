use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use super::naming::kebab_case;

/// Standard HTML elements; never component references.
const HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd",
    "keygen", "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noindex", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param",
    "picture", "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "section",
    "select", "small", "source", "span", "strong", "style", "sub", "summary", "sup", "table",
    "template", "tbody", "td", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track",
    "u", "ul", "var", "video", "wbr", "webview",
];

/// SVG elements, kebab-cased the same way tags are before lookup.
const SVG_ELEMENTS: &[&str] = &[
    "svg", "animate", "animateMotion", "animateTransform", "circle", "clipPath", "defs", "desc",
    "ellipse", "feBlend", "feColorMatrix", "feComponentTransfer", "feComposite",
    "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap", "feDistantLight",
    "feDropShadow", "feFlood", "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur",
    "feImage", "feMerge", "feMergeNode", "feMorphology", "feOffset", "fePointLight",
    "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence", "filter", "foreignObject", "g",
    "image", "line", "linearGradient", "marker", "mask", "metadata", "mpath", "path", "pattern",
    "polygon", "polyline", "radialGradient", "rect", "stop", "switch", "symbol", "text",
    "textPath", "tspan", "use", "view",
];

/// Framework built-ins and router/meta tags.
const META_ELEMENTS: &[&str] = &[
    "component", "scrollbar", "template", "slot", "keep-alive", "n-link", "nuxt", "nuxt-child",
];

/// Boolean props that the tag pattern picks up on multi-line opening tags.
const BOOLEAN_PROPS: &[&str] = &[
    "dense", "disabled", "required", "scrollable", "danger", "nuxt", "prominent", "nav", "narrow",
    "readonly", "top", "left", "right", "bottom", "outlined", "multiple", "mandatory",
    "hide-actions",
];

const DEFAULT_LEGACY_PREFIX: &str = "v-";

const DEFAULT_LEGACY_DIRECTIVES: &[&str] = &[
    "resize", "click-outside", "mutate", "intersect", "ripple", "scroll",
];

/// Legacy tags that carry no migration cost: layout primitives and transitions.
const DEFAULT_LEGACY_IGNORE_PATTERNS: &[&str] = &[
    r"^v-(spacer|divider|col|row|icon)$",
    r"^v-(.+)-transition$",
    r"^v-else$",
];

const DEFAULT_OTHER_LIBRARIES: &[&str] = &[
    "line-chart", "pie-chart", "column-chart", "bar-chart", "area-chart", "scatter-chart",
    "geo-chart", "timeline", "draggable", "quill-editor", "vue-cropper", "v-chart", "tip-tap",
];

/// Prefix stripped from lazily-loaded component tags (`<LazyFoo>` uses `foo`).
const LAZY_PREFIX: &str = "lazy-";

/// Classification table, as read from the `[classify]` config section.
///
/// Every list extends (`ignore`) or replaces (the rest) the built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Tag prefix identifying legacy framework components and directives.
    pub legacy_prefix: String,
    /// Directive names (without prefix) counted as legacy directives.
    pub legacy_directives: Vec<String>,
    /// Regexes for legacy tags that are ignored entirely.
    pub legacy_ignore_patterns: Vec<String>,
    /// Third-party component tags, checked before the legacy prefix.
    pub other_libraries: Vec<String>,
    /// Extra tags to ignore, on top of HTML, SVG and framework built-ins.
    pub ignore: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        let owned =
            |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            legacy_prefix: DEFAULT_LEGACY_PREFIX.to_string(),
            legacy_directives: owned(DEFAULT_LEGACY_DIRECTIVES),
            legacy_ignore_patterns: owned(DEFAULT_LEGACY_IGNORE_PATTERNS),
            other_libraries: owned(DEFAULT_OTHER_LIBRARIES),
            ignore: Vec::new(),
        }
    }
}

/// What a canonical template tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Local,
    OtherLibrary,
    LegacyComponent,
}

/// Compiled classification table.
pub struct Classifier {
    legacy_prefix: String,
    legacy_directives: HashSet<String>,
    legacy_ignore: Vec<Regex>,
    other_libraries: HashSet<String>,
    ignored: HashSet<String>,
    directive_pattern: Regex,
}

impl Classifier {
    pub fn new(config: &ClassifyConfig) -> Result<Self> {
        let legacy_ignore = config
            .legacy_ignore_patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid legacy ignore pattern {p:?}")))
            .collect::<Result<Vec<_>>>()?;

        let ignored = HTML_ELEMENTS
            .iter()
            .chain(SVG_ELEMENTS)
            .chain(META_ELEMENTS)
            .chain(BOOLEAN_PROPS)
            .map(|s| kebab_case(s))
            .chain(config.ignore.iter().map(|s| kebab_case(s)))
            .collect();

        // An attribute starting with the prefix after whitespace or `(`;
        // group 1 is the directive name without modifiers or argument.
        let directive_pattern = Regex::new(&format!(
            r"(?m)(?:^|[\s(]){}([a-z][a-z0-9\-]*)",
            regex::escape(&config.legacy_prefix)
        ))
        .context("invalid legacy prefix")?;

        Ok(Self {
            legacy_prefix: config.legacy_prefix.clone(),
            legacy_directives: config.legacy_directives.iter().cloned().collect(),
            legacy_ignore,
            other_libraries: config.other_libraries.iter().cloned().collect(),
            ignored,
            directive_pattern,
        })
    }

    /// Canonical form of a raw template tag: kebab-cased, lazy prefix removed.
    pub fn canonical_tag(&self, raw: &str) -> String {
        let tag = kebab_case(raw);
        match tag.strip_prefix(LAZY_PREFIX) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => tag,
        }
    }

    /// Classify a canonical tag, or `None` if it is not a dependency at all.
    pub fn classify_tag(&self, tag: &str) -> Option<TagClass> {
        if self.ignored.contains(tag) || self.legacy_ignore.iter().any(|re| re.is_match(tag)) {
            return None;
        }
        if self.other_libraries.contains(tag) {
            return Some(TagClass::OtherLibrary);
        }
        if let Some(name) = tag.strip_prefix(self.legacy_prefix.as_str()) {
            // Directive names used as tags are counted by the attribute scan.
            if self.legacy_directives.contains(name) {
                return None;
            }
            return Some(TagClass::LegacyComponent);
        }
        Some(TagClass::Local)
    }

    /// Legacy directives used as attributes in `template`, prefix included.
    pub fn directives_in<'t>(&'t self, template: &'t str) -> impl Iterator<Item = String> + 't {
        self.directive_pattern
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|name| self.legacy_directives.contains(*name))
            .map(|name| format!("{}{}", self.legacy_prefix, name))
    }
}
