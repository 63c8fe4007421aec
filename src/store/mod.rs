//! SQLite persistence for scan results.
//!
//! A `Store` owns its connection; callers open one per command and pass it
//! explicitly. Each scan replaces every table inside a single transaction, so
//! readers see either the previous scan or the new one, never a mix.

pub mod schema;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use serde::Serialize;

use crate::engine::ScanOutput;
use crate::graph::record::{Closures, DependencyRecord, Partition};

use schema::{RECORD_COLUMNS, SCHEMA_V1_SQL, SCHEMA_VERSION};

/// Busy timeout for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Separator for set-valued columns.
const SET_SEPARATOR: char = ',';

/// Summary row of the last committed scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMeta {
    pub scanned_at_ms: i64,
    pub components: usize,
    pub layouts: usize,
    pub pages: usize,
    pub dangling: usize,
    pub cycles: usize,
}

pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open (or create) the scan database, apply runtime pragmas, and bring
    /// the schema up to date.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }

        let mut conn = Connection::open(path)
            .with_context(|| format!("open database {}", path.display()))?;

        configure_connection(&conn).context("configure sqlite pragmas")?;
        migrate(&mut conn).context("apply schema")?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite all partitions with a finished scan.
    ///
    /// Runs as one transaction: on any failure nothing is written.
    pub fn replace_scan(&mut self, output: &ScanOutput) -> Result<()> {
        let tx = self.conn.transaction().context("begin scan transaction")?;

        let partitions: [(Partition, &[DependencyRecord]); 3] = [
            (Partition::Components, output.components.as_slice()),
            (Partition::Layouts, output.layouts.as_slice()),
            (Partition::Pages, output.pages.as_slice()),
        ];

        for (partition, records) in partitions {
            let table = partition.dir_name();
            tx.execute(&format!("DELETE FROM {table}"), [])
                .with_context(|| format!("clear {table}"))?;

            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {table} ({RECORD_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ))
                .with_context(|| format!("prepare insert into {table}"))?;

            for record in records {
                stmt.execute(params![
                    record.path,
                    record.display_name,
                    record.canonical_name,
                    encode_set(&record.local_dependencies),
                    encode_set(&record.other_library_dependencies),
                    encode_set(&record.legacy_components),
                    encode_set(&record.legacy_directives),
                    encode_set(&record.closures.local),
                    encode_set(&record.closures.other_library),
                    encode_set(&record.closures.legacy_components),
                    encode_set(&record.closures.legacy_directives),
                    to_sql_int(record.migration_complexity),
                    record.migration_value.map(to_sql_int),
                ])
                .with_context(|| format!("insert {} into {table}", record.path))?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO scan_meta \
             (id, scanned_at_ms, components, layouts, pages, dangling, cycles) \
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                now_ms(),
                output.components.len() as i64,
                output.layouts.len() as i64,
                output.pages.len() as i64,
                output.dangling.len() as i64,
                output.cycles.len() as i64,
            ],
        )
        .context("record scan metadata")?;

        tx.commit().context("commit scan transaction")?;
        tracing::info!(
            components = output.components.len(),
            layouts = output.layouts.len(),
            pages = output.pages.len(),
            "scan persisted"
        );
        Ok(())
    }

    /// Metadata of the last committed scan, if any.
    pub fn last_scan(&self) -> Result<Option<ScanMeta>> {
        self.conn
            .query_row(
                "SELECT scanned_at_ms, components, layouts, pages, dangling, cycles \
                 FROM scan_meta WHERE id = 1",
                [],
                |row| {
                    Ok(ScanMeta {
                        scanned_at_ms: row.get(0)?,
                        components: row.get::<_, i64>(1)? as usize,
                        layouts: row.get::<_, i64>(2)? as usize,
                        pages: row.get::<_, i64>(3)? as usize,
                        dangling: row.get::<_, i64>(4)? as usize,
                        cycles: row.get::<_, i64>(5)? as usize,
                    })
                },
            )
            .optional()
            .context("query scan metadata")
    }

    /// Every record of a partition, ordered by path.
    pub fn load_partition(&self, partition: Partition) -> Result<Vec<DependencyRecord>> {
        self.select(partition, "ORDER BY path ASC", [])
    }

    /// One record by path.
    pub fn get(&self, partition: Partition, path: &str) -> Result<Option<DependencyRecord>> {
        let mut records = self.select(partition, "WHERE path = ?1", [path])?;
        Ok(records.pop())
    }

    /// Components whose canonical names are in `names`, ordered by path.
    /// Names with no stored component are skipped.
    pub fn components_by_canonical(&self, names: &BTreeSet<String>) -> Result<Vec<DependencyRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!(
                "SELECT {RECORD_COLUMNS} FROM components WHERE canonical_name = ?1"
            ))
            .context("prepare component lookup")?;

        let mut found = Vec::with_capacity(names.len());
        for name in names {
            if let Some(record) = stmt
                .query_row([name], record_from_row)
                .optional()
                .with_context(|| format!("look up component {name}"))?
            {
                found.push(record);
            }
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }

    /// Components ordered by migration value (highest first), then by
    /// complexity (lowest first), then by path. `None` returns all of them.
    pub fn components_by_priority(&self, limit: Option<usize>) -> Result<Vec<DependencyRecord>> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        self.select(
            Partition::Components,
            "ORDER BY migration_value DESC, migration_complexity ASC, path ASC LIMIT ?1",
            [limit],
        )
    }

    fn select<P: rusqlite::Params>(
        &self,
        partition: Partition,
        clause: &str,
        params: P,
    ) -> Result<Vec<DependencyRecord>> {
        let table = partition.dir_name();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM {table} {clause}"))
            .with_context(|| format!("prepare select from {table}"))?;
        let rows = stmt
            .query_map(params, record_from_row)
            .with_context(|| format!("query {table}"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("decode {table} rows"))
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Read `PRAGMA user_version` as a `u32`.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
    })
}

/// Create the schema if the database is older than this binary.
///
/// The database only ever holds the last scan, so there is nothing to carry
/// across versions: older tables are dropped and recreated empty.
fn migrate(conn: &mut Connection) -> rusqlite::Result<()> {
    let current = current_schema_version(conn)?;
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current != 0 {
        tracing::info!(from = current, to = SCHEMA_VERSION, "resetting scan database schema");
        tx.execute_batch(
            "DROP TABLE IF EXISTS components;
             DROP TABLE IF EXISTS layouts;
             DROP TABLE IF EXISTS pages;
             DROP TABLE IF EXISTS scan_meta;",
        )?;
    }
    tx.execute_batch(SCHEMA_V1_SQL)?;
    tx.pragma_update(None, "user_version", i64::from(SCHEMA_VERSION))?;
    tx.commit()
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<DependencyRecord> {
    let set = |idx: usize| -> rusqlite::Result<BTreeSet<String>> {
        Ok(decode_set(&row.get::<_, String>(idx)?))
    };

    Ok(DependencyRecord {
        path: row.get(0)?,
        display_name: row.get(1)?,
        canonical_name: row.get(2)?,
        local_dependencies: set(3)?,
        other_library_dependencies: set(4)?,
        legacy_components: set(5)?,
        legacy_directives: set(6)?,
        closures: Closures {
            local: set(7)?,
            other_library: set(8)?,
            legacy_components: set(9)?,
            legacy_directives: set(10)?,
        },
        migration_complexity: from_sql_int(row.get(11)?),
        migration_value: row.get::<_, Option<i64>>(12)?.map(from_sql_int),
    })
}

/// Sorted, comma-joined. Identical sets always encode identically.
pub fn encode_set(set: &BTreeSet<String>) -> String {
    let mut out = String::new();
    for (i, value) in set.iter().enumerate() {
        if i > 0 {
            out.push(SET_SEPARATOR);
        }
        out.push_str(value);
    }
    out
}

pub fn decode_set(encoded: &str) -> BTreeSet<String> {
    encoded
        .split(SET_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
