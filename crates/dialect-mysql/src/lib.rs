//! MySQL (mysqldump) as a conversion source.
//!
//! Table definitions are cleaned down to their columns and plain table
//! constraints, inserts have their quote escapes normalized, and drops pass
//! through. Everything else is ignored.

mod classify;
mod column;
mod insert;
mod scan;
mod table;

use dumpconv_core::{ExecutableStatement, RawStatement, SourceDialect, StatementKind};

pub use column::{ClauseKind, ColumnClause};
pub use insert::normalize_insert;
pub use table::TableDefinition;

/// Line prefixes mysqldump emits for comments, session setup, locking and
/// administration.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "--",
    "/*",
    "LOCK",
    "UNLOCK",
    "CREATE DATABASE",
    "USE",
    "GRANT",
    "FLUSH",
    "SET",
    "ALTER",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl SourceDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn default_denylist(&self) -> Vec<String> {
        DEFAULT_DENYLIST
            .iter()
            .map(|prefix| (*prefix).to_string())
            .collect()
    }

    fn classify(&self, statement: &RawStatement) -> StatementKind {
        classify::classify_sql(&statement.sql)
    }

    fn rewrite(&self, statement: RawStatement) -> Option<ExecutableStatement> {
        let kind = self.classify(&statement);
        let RawStatement {
            sql,
            source_location,
        } = statement;

        match kind {
            StatementKind::TableDefinition => {
                let table = TableDefinition::parse(&sql)?;
                Some(
                    ExecutableStatement::new(kind, table.to_sql(), source_location)
                        .with_target(table.name),
                )
            }
            StatementKind::Insert => Some(ExecutableStatement::new(
                kind,
                normalize_insert(&sql),
                source_location,
            )),
            StatementKind::Drop => Some(ExecutableStatement::new(kind, sql, source_location)),
            StatementKind::Ignored => None,
        }
    }
}
