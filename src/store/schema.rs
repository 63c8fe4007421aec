//! SQLite schema for the scan database.
//!
//! One table per partition, each row a full `DependencyRecord`. Set-valued
//! columns hold sorted, comma-joined names (empty set is the empty string).
//! `scan_meta` holds a single row describing the last committed scan.

/// Latest schema version understood by this binary.
pub const SCHEMA_VERSION: u32 = 1;

/// Columns shared by all partition tables, in `SELECT` order.
pub const RECORD_COLUMNS: &str = "path, display_name, canonical_name, \
    local_dependencies, other_library_dependencies, legacy_components, legacy_directives, \
    local_closure, other_library_closure, legacy_components_closure, legacy_directives_closure, \
    migration_complexity, migration_value";

pub const SCHEMA_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS components (
    path TEXT PRIMARY KEY,
    display_name TEXT NOT NULL UNIQUE,
    canonical_name TEXT NOT NULL UNIQUE,
    local_dependencies TEXT NOT NULL DEFAULT '',
    other_library_dependencies TEXT NOT NULL DEFAULT '',
    legacy_components TEXT NOT NULL DEFAULT '',
    legacy_directives TEXT NOT NULL DEFAULT '',
    local_closure TEXT NOT NULL DEFAULT '',
    other_library_closure TEXT NOT NULL DEFAULT '',
    legacy_components_closure TEXT NOT NULL DEFAULT '',
    legacy_directives_closure TEXT NOT NULL DEFAULT '',
    migration_complexity INTEGER NOT NULL DEFAULT 0,
    migration_value INTEGER
);

CREATE INDEX IF NOT EXISTS idx_components_priority
    ON components (migration_value DESC, migration_complexity ASC);

CREATE TABLE IF NOT EXISTS layouts (
    path TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    canonical_name TEXT NOT NULL,
    local_dependencies TEXT NOT NULL DEFAULT '',
    other_library_dependencies TEXT NOT NULL DEFAULT '',
    legacy_components TEXT NOT NULL DEFAULT '',
    legacy_directives TEXT NOT NULL DEFAULT '',
    local_closure TEXT NOT NULL DEFAULT '',
    other_library_closure TEXT NOT NULL DEFAULT '',
    legacy_components_closure TEXT NOT NULL DEFAULT '',
    legacy_directives_closure TEXT NOT NULL DEFAULT '',
    migration_complexity INTEGER NOT NULL DEFAULT 0,
    migration_value INTEGER CHECK (migration_value IS NULL)
);

CREATE TABLE IF NOT EXISTS pages (
    path TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    canonical_name TEXT NOT NULL,
    local_dependencies TEXT NOT NULL DEFAULT '',
    other_library_dependencies TEXT NOT NULL DEFAULT '',
    legacy_components TEXT NOT NULL DEFAULT '',
    legacy_directives TEXT NOT NULL DEFAULT '',
    local_closure TEXT NOT NULL DEFAULT '',
    other_library_closure TEXT NOT NULL DEFAULT '',
    legacy_components_closure TEXT NOT NULL DEFAULT '',
    legacy_directives_closure TEXT NOT NULL DEFAULT '',
    migration_complexity INTEGER NOT NULL DEFAULT 0,
    migration_value INTEGER CHECK (migration_value IS NULL)
);

CREATE TABLE IF NOT EXISTS scan_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    scanned_at_ms INTEGER NOT NULL,
    components INTEGER NOT NULL,
    layouts INTEGER NOT NULL,
    pages INTEGER NOT NULL,
    dangling INTEGER NOT NULL,
    cycles INTEGER NOT NULL
);
"#;
