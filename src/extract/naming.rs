/// Convert a component name to its kebab-case canonical form.
///
/// `FooBar` → `foo-bar`, `HTMLEditor` → `html-editor`, `foo_bar` → `foo-bar`.
/// Already kebab-cased names are returned unchanged.
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '_' | ' ' | '.') {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
        }

        out.extend(c.to_lowercase());
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Display name for a project-relative `.vue` path: the file stem, or the
/// parent folder name for `index.vue` nested below a partition directory.
pub fn display_name(rel_path: &str) -> String {
    let mut segments = rel_path.rsplit('/');
    let file = segments.next().unwrap_or(rel_path);
    let stem = file.strip_suffix(".vue").unwrap_or(file);

    let parents: Vec<&str> = segments.collect();
    if stem == "index" && parents.len() >= 2 && !parents[0].is_empty() {
        return parents[0].to_string();
    }
    stem.to_string()
}
