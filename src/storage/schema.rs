//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Process records: one row per live process instance.
#[derive(Iden)]
pub enum Processes {
    Table,
    #[iden = "correlation_id"]
    CorrelationId,
    #[iden = "blob_data"]
    BlobData,
}

/// Header rows belonging to a process record.
#[derive(Iden)]
pub enum ProcessHeaders {
    Table,
    #[iden = "correlation_id"]
    CorrelationId,
    #[iden = "key"]
    Key,
    #[iden = "value"]
    Value,
}

/// SQLite DDL, one statement per entry.
pub const SQLITE_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS processes (
    correlation_id TEXT NOT NULL PRIMARY KEY,
    blob_data BLOB NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS process_headers (
    correlation_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_process_headers_correlation_id
    ON process_headers (correlation_id)
"#,
];

/// PostgreSQL DDL, one statement per entry.
pub const POSTGRES_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS processes (
    correlation_id TEXT NOT NULL PRIMARY KEY,
    blob_data BYTEA NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS process_headers (
    correlation_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_process_headers_correlation_id
    ON process_headers (correlation_id)
"#,
];
