use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use ulid::Ulid;

use crate::contracts::types::{ImportRunItem, ImportSummary};
use crate::record::ClientRecord;
use crate::setup::StoreContext;
use crate::state::{map_sqlite_error, open_connection};
use crate::store::{ClientStore, StoredClient, new_client_id, now_timestamp};
use crate::{ClientError, ClientResult};

pub struct SqliteClientStore {
    connection: Connection,
    db_path: PathBuf,
}

pub(crate) struct RunRecord<'a> {
    pub(crate) source_kind: &'a str,
    pub(crate) source_ref: Option<&'a str>,
    pub(crate) rows_read: i64,
    pub(crate) skipped_blank: i64,
    pub(crate) summary: ImportSummary,
}

impl SqliteClientStore {
    /// Opens the store of an initialized home. Run
    /// [`crate::setup::ensure_initialized_at`] first.
    pub fn open(context: &StoreContext) -> ClientResult<Self> {
        Self::open_path(&context.db_path)
    }

    pub(crate) fn open_path(db_path: &Path) -> ClientResult<Self> {
        Ok(Self {
            connection: open_connection(db_path)?,
            db_path: db_path.to_path_buf(),
        })
    }

    pub(crate) fn record_run(&self, run: RunRecord<'_>) -> ClientResult<String> {
        let run_id = format!("run_{}", Ulid::new());
        self.connection
            .execute(
                "INSERT INTO import_runs (
                    run_id,
                    created_at,
                    source_kind,
                    source_ref,
                    rows_read,
                    new_count,
                    updated_count,
                    skipped_blank
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    &run_id,
                    now_timestamp(),
                    run.source_kind,
                    run.source_ref,
                    run.rows_read,
                    run.summary.new_count,
                    run.summary.updated_count,
                    run.skipped_blank
                ],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        Ok(run_id)
    }

    pub(crate) fn list_runs(&self) -> ClientResult<Vec<ImportRunItem>> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT run_id, created_at, source_kind, source_ref, rows_read,
                        new_count, updated_count, skipped_blank
                 FROM import_runs
                 ORDER BY created_at DESC, run_id DESC",
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let rows = statement
            .query_map([], |row| {
                Ok(ImportRunItem {
                    run_id: row.get(0)?,
                    created_at: row.get(1)?,
                    source_kind: row.get(2)?,
                    source_ref: row.get(3)?,
                    rows_read: row.get(4)?,
                    new_count: row.get(5)?,
                    updated_count: row.get(6)?,
                    skipped_blank: row.get(7)?,
                })
            })
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(row.map_err(|error| map_sqlite_error(&self.db_path, &error))?);
        }
        Ok(runs)
    }
}

impl ClientStore for SqliteClientStore {
    fn list_all(&self) -> ClientResult<Vec<StoredClient>> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT client_id, created_at, updated_at, record_json
                 FROM clients
                 ORDER BY created_at ASC, rowid ASC",
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut clients = Vec::new();
        for row in rows {
            let (id, created_at, updated_at, record_json) =
                row.map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            let record = decode(&id, &record_json)?;
            clients.push(StoredClient {
                id,
                created_at,
                updated_at,
                record,
            });
        }
        Ok(clients)
    }

    fn insert(&mut self, record: &ClientRecord) -> ClientResult<String> {
        let id = new_client_id();
        let timestamp = now_timestamp();
        let record_json = encode(record)?;
        self.connection
            .execute(
                "INSERT INTO clients (client_id, created_at, updated_at, record_json)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&id, &timestamp, &timestamp, record_json],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        Ok(id)
    }

    fn update(&mut self, id: &str, record: &ClientRecord) -> ClientResult<()> {
        let transaction = self
            .connection
            .transaction()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let stored_json = transaction
            .query_row(
                "SELECT record_json FROM clients WHERE client_id = ?1",
                [id],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?
            .ok_or_else(|| ClientError::client_not_found(id))?;

        let mut merged = decode(id, &stored_json)?;
        merged.merge_from(record);
        let record_json = encode(&merged)?;

        transaction
            .execute(
                "UPDATE clients SET updated_at = ?2, record_json = ?3 WHERE client_id = ?1",
                params![id, now_timestamp(), record_json],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))
    }
}

fn encode(record: &ClientRecord) -> ClientResult<String> {
    serde_json::to_string(record).map_err(|error| {
        ClientError::internal_serialization(&format!("Could not encode client record: {error}"))
    })
}

fn decode(id: &str, record_json: &str) -> ClientResult<ClientRecord> {
    serde_json::from_str::<ClientRecord>(record_json).map_err(|error| {
        ClientError::internal_serialization(&format!(
            "Stored client `{id}` has an unreadable record: {error}"
        ))
    })
}
