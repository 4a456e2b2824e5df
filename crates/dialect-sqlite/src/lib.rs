//! SQLite as a conversion target.

mod adapter;
mod destination;
mod export_queries;

use std::path::Path;

use dumpconv_core::{DatabaseAdapter, Result, TargetDialect};
use tracing::debug;

use crate::adapter::SqliteAdapter;

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// A fresh in-memory store, for tests and dry runs.
    pub fn open_in_memory(&self) -> Result<Box<dyn DatabaseAdapter>> {
        Ok(Box::new(SqliteAdapter::open_in_memory()?))
    }
}

impl TargetDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn recreate(&self, destination: &Path) -> Result<Box<dyn DatabaseAdapter>> {
        destination::remove_existing(destination)?;
        let adapter = SqliteAdapter::open(destination)?;
        debug!(path = %destination.display(), "opened sqlite destination");
        Ok(Box::new(adapter))
    }
}

#[must_use]
pub fn table_names_query() -> &'static str {
    export_queries::TABLE_NAMES_QUERY
}
