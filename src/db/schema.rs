//! DDL for the `status` type and the `file` / `batch` tables.
//!
//! Every statement is idempotent so setup can run against a database that
//! is already partially or fully provisioned.

/// Create the enum type, both tables and the batch lookup index.
pub const CREATE_ALL: &str = r#"
DO $$
BEGIN
    CREATE TYPE status AS ENUM ('completed', 'failed', 'in_progress');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END
$$;

CREATE TABLE IF NOT EXISTS file (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    content JSONB NOT NULL CHECK (jsonb_typeof(content) = 'object'),
    status status NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS batch (
    id VARCHAR PRIMARY KEY,
    status status NOT NULL,
    results JSONB CHECK (results IS NULL OR jsonb_typeof(results) = 'object'),
    file_id VARCHAR NOT NULL REFERENCES file(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_batch_file_id ON batch(file_id);
"#;

/// Drop both tables and the enum type. Children first.
pub const DROP_ALL: &str = r#"
DROP TABLE IF EXISTS batch;
DROP TABLE IF EXISTS file;
DROP TYPE IF EXISTS status;
"#;

/// Drop sea-orm-migration's revision history so a later migrate starts over.
pub const DROP_MIGRATION_HISTORY: &str = "DROP TABLE IF EXISTS seaql_migrations";

/// `CREATE SCHEMA` statement for a search-path override.
pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

/// Quote a PostgreSQL identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
