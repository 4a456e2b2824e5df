use std::path::Path;

use crate::{DatabaseAdapter, ExecutableStatement, RawStatement, Result, StatementKind};

/// Rewrite rules for the dialect a dump was written in.
pub trait SourceDialect {
    fn name(&self) -> &'static str;

    /// Line prefixes dropped by the segmenter before buffering.
    fn default_denylist(&self) -> Vec<String>;

    fn classify(&self, statement: &RawStatement) -> StatementKind;

    /// Returns `None` for ignored statements and for table definitions that
    /// cannot be rewritten into something worth creating.
    fn rewrite(&self, statement: RawStatement) -> Option<ExecutableStatement>;
}

/// The engine that receives rewritten statements.
pub trait TargetDialect {
    fn name(&self) -> &'static str;

    /// Deletes any store at `destination` and opens a fresh one.
    ///
    /// Must fail with [`crate::StoreError::Locked`] before deleting anything
    /// when another process holds the existing store.
    fn recreate(&self, destination: &Path) -> Result<Box<dyn DatabaseAdapter>>;
}
