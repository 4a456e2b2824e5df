use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use dumpconv_core::{
    DatabaseAdapter, ExecutableStatement, RawStatement, Result, SourceDialect, StatementKind,
    StoreError, TargetDialect,
};

use crate::fake_adapter::FakeAdapter;

/// Classifies by leading keyword and passes statements through unchanged.
/// `CREATE TABLE broken` stands in for a definition that cannot be rewritten.
#[derive(Debug, Default)]
pub struct FakeSource;

impl SourceDialect for FakeSource {
    fn name(&self) -> &'static str {
        "fake-source"
    }

    fn default_denylist(&self) -> Vec<String> {
        vec!["--".to_string(), "SET".to_string(), "LOCK".to_string()]
    }

    fn classify(&self, statement: &RawStatement) -> StatementKind {
        let sql = statement.sql.to_ascii_uppercase();
        if sql.starts_with("CREATE TABLE") {
            StatementKind::TableDefinition
        } else if sql.starts_with("INSERT INTO") {
            StatementKind::Insert
        } else if sql.starts_with("DROP TABLE") {
            StatementKind::Drop
        } else {
            StatementKind::Ignored
        }
    }

    fn rewrite(&self, statement: RawStatement) -> Option<ExecutableStatement> {
        let kind = self.classify(&statement);
        if kind == StatementKind::Ignored || statement.sql.starts_with("CREATE TABLE broken") {
            return None;
        }

        let target = statement
            .sql
            .split_whitespace()
            .nth(2)
            .map(|name| name.trim_end_matches(';').to_string());
        let executable = ExecutableStatement::new(kind, statement.sql, statement.source_location);
        match (kind, target) {
            (StatementKind::TableDefinition, Some(target)) => Some(executable.with_target(target)),
            _ => Some(executable),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeTarget {
    adapter: FakeAdapter,
    locked: bool,
    recreated: RefCell<Vec<PathBuf>>,
}

#[allow(dead_code)]
impl FakeTarget {
    pub fn new(adapter: FakeAdapter) -> Self {
        Self {
            adapter,
            ..Self::default()
        }
    }

    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Self::default()
        }
    }

    pub fn recreated(&self) -> Vec<PathBuf> {
        self.recreated.borrow().clone()
    }
}

impl TargetDialect for FakeTarget {
    fn name(&self) -> &'static str {
        "fake-target"
    }

    fn recreate(&self, destination: &Path) -> Result<Box<dyn DatabaseAdapter>> {
        if self.locked {
            return Err(StoreError::Locked {
                path: destination.to_path_buf(),
            }
            .into());
        }

        self.recreated.borrow_mut().push(destination.to_path_buf());
        Ok(Box::new(self.adapter.clone()))
    }
}
