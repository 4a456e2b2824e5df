use tracing::{trace, warn};

use crate::{
    BoxedError, DatabaseAdapter, Error, ExecutableStatement, ExecutionError, ImportStats,
    InsertErrorMode,
};

#[derive(Debug)]
pub enum ExecutionOutcome {
    Applied,
    /// The failure was surfaced to the operator.
    Reported(ExecutionError),
    /// The failure was counted and discarded.
    Suppressed,
}

impl ExecutionOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Applies rewritten statements one at a time; a failure never stops the run.
pub struct Executor<'a> {
    adapter: &'a dyn DatabaseAdapter,
    insert_errors: InsertErrorMode,
    statement_index: usize,
    stats: ImportStats,
}

impl<'a> Executor<'a> {
    #[must_use]
    pub fn new(adapter: &'a dyn DatabaseAdapter, insert_errors: InsertErrorMode) -> Self {
        Self {
            adapter,
            insert_errors,
            statement_index: 0,
            stats: ImportStats::default(),
        }
    }

    pub fn apply(&mut self, statement: &ExecutableStatement) -> ExecutionOutcome {
        let statement_index = self.statement_index;
        self.statement_index += 1;

        if statement.sql.trim().is_empty() {
            return ExecutionOutcome::Applied;
        }

        let Err(error) = self.adapter.execute(&statement.sql) else {
            self.stats.record_applied(statement.kind);
            return ExecutionOutcome::Applied;
        };
        let error = statement_failure(statement_index, statement, error);

        if statement.kind.is_table_definition() || self.insert_errors == InsertErrorMode::Report {
            self.stats.record_failed(statement.kind, true);
            report_failure(statement, &error);
            ExecutionOutcome::Reported(error)
        } else {
            self.stats.record_failed(statement.kind, false);
            trace!(
                kind = statement.kind.tag(),
                line = statement.source_location.line,
                error = %error.store_message(),
                "suppressed statement failure"
            );
            ExecutionOutcome::Suppressed
        }
    }

    #[must_use]
    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ImportStats {
        &mut self.stats
    }

    #[must_use]
    pub fn finish(self) -> ImportStats {
        self.stats
    }
}

fn report_failure(statement: &ExecutableStatement, error: &ExecutionError) {
    match statement.target.as_deref() {
        Some(table) if statement.kind.is_table_definition() => warn!(
            table,
            line = statement.source_location.line,
            "failed to create table: {}",
            error.store_message()
        ),
        _ => warn!(
            kind = statement.kind.tag(),
            line = statement.source_location.line,
            "statement failed: {}",
            error.store_message()
        ),
    }
}

fn statement_failure(
    statement_index: usize,
    statement: &ExecutableStatement,
    error: Error,
) -> ExecutionError {
    let source: BoxedError = match error {
        Error::Execute(ExecutionError::StatementFailed { source, .. })
        | Error::Execute(ExecutionError::QueryFailed { source, .. }) => source,
        other => Box::new(other),
    };

    ExecutionError::StatementFailed {
        statement_index,
        sql: statement.sql.clone(),
        source_location: Some(statement.source_location.clone()),
        source,
    }
}
