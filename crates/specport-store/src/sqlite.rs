// ABOUTME: SQLite-backed app database holding specification records outside any git workspace.
// ABOUTME: Provides open with schema migration, a read-only open for lookups, upsert, list, and id/file-name lookup.

use std::path::Path;

use chrono::DateTime;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use specport_core::{ApiSpec, ContentType};
use thiserror::Error;

use crate::store::{StoreError, WorkspaceStore};

/// Errors that can occur during SQLite store operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid content type in row {id}: {value}")]
    InvalidContentType { id: String, value: String },
}

/// The application database, one row per specification.
pub struct SqliteStore {
    conn: Connection,
    has_table: bool,
}

const SELECT_COLUMNS: &str =
    "SELECT id, parent_id, file_name, content_type, contents, modified FROM api_specs";

impl SqliteStore {
    /// Open or create the database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, SqliteError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// An in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self, SqliteError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open an existing database without changing it: no pragmas, no schema
    /// migration. A database without the `api_specs` table reads as empty.
    pub fn open_read_only(path: &Path) -> Result<Self, SqliteError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let has_table = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'api_specs'",
                [],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(Self { conn, has_table })
    }

    fn init(conn: Connection) -> Result<Self, SqliteError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS api_specs (
                id TEXT PRIMARY KEY,
                parent_id TEXT,
                file_name TEXT NOT NULL,
                content_type TEXT NOT NULL,
                contents TEXT NOT NULL,
                modified INTEGER
            );

            CREATE INDEX IF NOT EXISTS api_specs_file_name ON api_specs (file_name);",
        )?;
        Ok(Self {
            conn,
            has_table: true,
        })
    }

    /// Upsert a specification row.
    pub fn insert_spec(&self, spec: &ApiSpec) -> Result<(), SqliteError> {
        self.conn.execute(
            "INSERT INTO api_specs (id, parent_id, file_name, content_type, contents, modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                parent_id = excluded.parent_id,
                file_name = excluded.file_name,
                content_type = excluded.content_type,
                contents = excluded.contents,
                modified = excluded.modified",
            params![
                spec.id,
                spec.parent_id,
                spec.file_name,
                spec.content_type.as_str(),
                spec.contents,
                spec.modified.map(|m| m.timestamp_millis()),
            ],
        )?;
        Ok(())
    }

    /// All rows ordered by id.
    pub fn list_specs(&self) -> Result<Vec<ApiSpec>, SqliteError> {
        if !self.has_table {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let rows = stmt.query_map([], read_row)?;

        let mut specs = Vec::new();
        for row in rows {
            specs.push(into_spec(row?)?);
        }
        Ok(specs)
    }

    /// Find a row by id, then by file name. The earliest id wins on duplicate names.
    pub fn find_spec(&self, identifier: &str) -> Result<Option<ApiSpec>, SqliteError> {
        if !self.has_table {
            return Ok(None);
        }
        let by_id = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![identifier],
                read_row,
            )
            .optional()?;
        let row = match by_id {
            Some(row) => Some(row),
            None => self
                .conn
                .query_row(
                    &format!("{SELECT_COLUMNS} WHERE file_name = ?1 ORDER BY id ASC LIMIT 1"),
                    params![identifier],
                    read_row,
                )
                .optional()?,
        };
        row.map(into_spec).transpose()
    }
}

/// Raw column values, before the content type is validated.
struct SpecRow {
    id: String,
    parent_id: Option<String>,
    file_name: String,
    content_type: String,
    contents: String,
    modified: Option<i64>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<SpecRow> {
    Ok(SpecRow {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        file_name: row.get(2)?,
        content_type: row.get(3)?,
        contents: row.get(4)?,
        modified: row.get(5)?,
    })
}

fn into_spec(row: SpecRow) -> Result<ApiSpec, SqliteError> {
    let content_type = row
        .content_type
        .parse::<ContentType>()
        .map_err(|_| SqliteError::InvalidContentType {
            id: row.id.clone(),
            value: row.content_type.clone(),
        })?;
    Ok(ApiSpec {
        id: row.id,
        parent_id: row.parent_id,
        file_name: row.file_name,
        content_type,
        contents: row.contents,
        modified: row.modified.and_then(DateTime::from_timestamp_millis),
    })
}

impl WorkspaceStore for SqliteStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn list(&self) -> Result<Vec<ApiSpec>, StoreError> {
        Ok(self.list_specs()?)
    }

    fn lookup(&self, identifier: &str) -> Result<Option<ApiSpec>, StoreError> {
        Ok(self.find_spec(identifier)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn make_spec(id: &str, file_name: &str) -> ApiSpec {
        let mut spec = ApiSpec::new(id, file_name, "openapi: '3.0.2'\nx-kong-name: pets\n");
        spec.parent_id = Some("wrk_1".to_string());
        spec.modified = Utc.timestamp_millis_opt(1_611_785_380_145).single();
        spec
    }

    #[test]
    fn sqlite_insert_and_lookup() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("app.db")).unwrap();
        let spec = make_spec("spc_a", "Pets");

        store.insert_spec(&spec).unwrap();

        let found = store.find_spec("spc_a").unwrap().unwrap();
        assert_eq!(found, spec);

        let by_name = store.find_spec("Pets").unwrap().unwrap();
        assert_eq!(by_name.id, "spc_a");

        assert!(store.find_spec("missing").unwrap().is_none());
    }

    #[test]
    fn sqlite_upsert_replaces_contents() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut spec = make_spec("spc_a", "Pets");
        store.insert_spec(&spec).unwrap();

        spec.contents = "{\"openapi\": \"3.1.0\"}".to_string();
        spec.content_type = ContentType::Json;
        store.insert_spec(&spec).unwrap();

        let specs = store.list_specs().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].content_type, ContentType::Json);
        assert!(specs[0].contents.contains("3.1.0"));
    }

    #[test]
    fn sqlite_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_spec(&make_spec("spc_b", "Beta")).unwrap();
            store.insert_spec(&make_spec("spc_a", "Alpha")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["spc_a", "spc_b"]);
    }

    #[test]
    fn sqlite_read_only_reads_rows_and_refuses_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        SqliteStore::open(&path)
            .unwrap()
            .insert_spec(&make_spec("spc_a", "Pets"))
            .unwrap();

        let store = SqliteStore::open_read_only(&path).unwrap();

        assert_eq!(store.find_spec("Pets").unwrap().unwrap().id, "spc_a");
        assert!(store.insert_spec(&make_spec("spc_b", "Other")).is_err());
        assert_eq!(store.list_specs().unwrap().len(), 1);
    }

    #[test]
    fn sqlite_read_only_without_table_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (x INTEGER);")
            .unwrap();

        let store = SqliteStore::open_read_only(&path).unwrap();

        assert!(store.list_specs().unwrap().is_empty());
        assert!(store.find_spec("spc_a").unwrap().is_none());
    }

    #[test]
    fn sqlite_rejects_unknown_content_type() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO api_specs (id, file_name, content_type, contents) VALUES ('spc_x', 'X', 'xml', '<a/>')",
                [],
            )
            .unwrap();

        let err = store.find_spec("spc_x").unwrap_err();
        assert!(matches!(err, SqliteError::InvalidContentType { .. }));
    }
}
