use std::collections::BTreeMap;

use crate::Result;

/// Handle on the destination store for the duration of one run.
///
/// A run opens exactly one adapter, drives it from a single thread, and
/// closes it once the input is exhausted.
pub trait DatabaseAdapter {
    fn execute(&self, sql: &str) -> Result<()>;
    fn begin(&self) -> Result<()>;
    fn commit(&self) -> Result<()>;
    /// Table DDL as stored by the destination catalog, in name order.
    fn export_schema(&self) -> Result<String>;
    fn row_counts(&self) -> Result<BTreeMap<String, u64>>;
    fn close(self: Box<Self>) -> Result<()>;
}
