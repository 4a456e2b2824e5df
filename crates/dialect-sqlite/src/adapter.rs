use std::{cell::Cell, collections::BTreeMap, error::Error as StdError, path::Path};

use dumpconv_core::{DatabaseAdapter, ExecutionError, Result, StoreError};
use rusqlite::Connection;
use tracing::warn;

use crate::export_queries;

const BEGIN_SQL: &str = "BEGIN";
const COMMIT_SQL: &str = "COMMIT";
const CLOSE_SQL: &str = "CLOSE sqlite";
// Durability is traded for import speed; a failed run is redone from scratch.
const RELAXED_DURABILITY_SQL: &str = "PRAGMA synchronous = OFF; PRAGMA journal_mode = MEMORY;";

pub(crate) struct SqliteAdapter {
    connection: Connection,
    in_transaction: Cell<bool>,
}

impl SqliteAdapter {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path).map_err(|source| open_error(path, source))?;
        Self::relax(connection, path)
    }

    pub(crate) fn open_in_memory() -> Result<Self> {
        let path = Path::new(":memory:");
        let connection = Connection::open_in_memory().map_err(|source| open_error(path, source))?;
        Self::relax(connection, path)
    }

    fn relax(connection: Connection, path: &Path) -> Result<Self> {
        connection
            .execute_batch(RELAXED_DURABILITY_SQL)
            .map_err(|source| open_error(path, source))?;
        Ok(Self {
            connection,
            in_transaction: Cell::new(false),
        })
    }

    fn query_string_rows(&self, query: &str) -> Result<Vec<String>> {
        let mut statement = self
            .connection
            .prepare(query)
            .map_err(|source| execution_error(query, source))?;
        let mut rows = statement
            .query([])
            .map_err(|source| execution_error(query, source))?;

        let mut values = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|source| execution_error(query, source))?
        {
            values.push(
                row.get::<_, String>(0)
                    .map_err(|source| execution_error(query, source))?,
            );
        }

        Ok(values)
    }
}

impl DatabaseAdapter for SqliteAdapter {
    fn execute(&self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(|source| execution_error(sql, source))
    }

    fn begin(&self) -> Result<()> {
        self.execute(BEGIN_SQL)?;
        self.in_transaction.set(true);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        if !self.in_transaction.replace(false) {
            return Ok(());
        }
        // SQLite ends the transaction on its own after FULL, IOERR or NOMEM.
        if self.connection.is_autocommit() {
            warn!("transaction opened for the import was rolled back before commit");
            return Err(ExecutionError::TransactionAborted {
                sql: COMMIT_SQL.to_string(),
            }
            .into());
        }
        self.execute(COMMIT_SQL)
    }

    fn export_schema(&self) -> Result<String> {
        let table_names = self.query_string_rows(export_queries::TABLE_NAMES_QUERY)?;

        let mut statements = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            let table_sql: String = self
                .connection
                .query_row(export_queries::TABLE_DDL_QUERY, [&table_name], |row| {
                    row.get(0)
                })
                .map_err(|source| execution_error(export_queries::TABLE_DDL_QUERY, source))?;
            statements.push(ensure_statement_terminated(table_sql));
        }

        Ok(statements.join("\n\n"))
    }

    fn row_counts(&self) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for table_name in self.query_string_rows(export_queries::TABLE_NAMES_QUERY)? {
            let query = export_queries::row_count_query(&table_name);
            let count: i64 = self
                .connection
                .query_row(&query, [], |row| row.get(0))
                .map_err(|source| execution_error(&query, source))?;
            counts.insert(table_name, u64::try_from(count).unwrap_or_default());
        }

        Ok(counts)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.connection
            .close()
            .map_err(|(_, source)| execution_error(CLOSE_SQL, source))
    }
}

fn ensure_statement_terminated(sql: String) -> String {
    let trimmed = sql.trim();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{trimmed};")
    }
}

fn open_error(path: &Path, source: rusqlite::Error) -> dumpconv_core::Error {
    StoreError::Open {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
    .into()
}

fn execution_error<E>(sql: &str, source: E) -> dumpconv_core::Error
where
    E: StdError + Send + Sync + 'static,
{
    ExecutionError::query_failed(sql, source).into()
}
