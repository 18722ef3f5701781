//! SQL schema for the SQLite key-value backend.

/// Returns the schema as a single batch string.
///
/// One table, `kv`, maps a record key to its serialized JSON value.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#
}
