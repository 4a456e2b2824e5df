use std::{cell::RefCell, collections::BTreeMap, error::Error as StdError, fmt, rc::Rc};

use dumpconv_core::{DatabaseAdapter, ExecutionError, Result};

#[derive(Debug, Default)]
struct FailureRule {
    sql_prefix: String,
    message: String,
}

#[derive(Debug, Default)]
struct FakeAdapterState {
    executed_sql: Vec<String>,
    begin_count: usize,
    commit_count: usize,
    close_count: usize,
    failures: Vec<FailureRule>,
}

/// In-memory adapter whose state is shared between clones, so a test can keep
/// observing it after the orchestrator consumed and closed its own handle.
#[derive(Debug, Clone, Default)]
pub struct FakeAdapter {
    state: Rc<RefCell<FakeAdapterState>>,
}

#[allow(dead_code)]
impl FakeAdapter {
    pub fn fail_when_sql_starts_with(&self, sql_prefix: impl Into<String>, message: impl Into<String>) {
        self.state.borrow_mut().failures.push(FailureRule {
            sql_prefix: sql_prefix.into(),
            message: message.into(),
        });
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.state.borrow().executed_sql.clone()
    }

    pub fn begin_count(&self) -> usize {
        self.state.borrow().begin_count
    }

    pub fn commit_count(&self) -> usize {
        self.state.borrow().commit_count
    }

    pub fn close_count(&self) -> usize {
        self.state.borrow().close_count
    }
}

impl DatabaseAdapter for FakeAdapter {
    fn execute(&self, sql: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();

        if let Some(rule) = state
            .failures
            .iter()
            .find(|rule| sql.starts_with(rule.sql_prefix.as_str()))
        {
            return Err(ExecutionError::query_failed(sql, FakeStoreError(rule.message.clone())).into());
        }

        state.executed_sql.push(sql.to_string());
        Ok(())
    }

    fn begin(&self) -> Result<()> {
        self.state.borrow_mut().begin_count += 1;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.state.borrow_mut().commit_count += 1;
        Ok(())
    }

    fn export_schema(&self) -> Result<String> {
        Ok(self
            .state
            .borrow()
            .executed_sql
            .iter()
            .filter(|sql| sql.starts_with("CREATE TABLE"))
            .cloned()
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn row_counts(&self) -> Result<BTreeMap<String, u64>> {
        Ok(BTreeMap::new())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.state.borrow_mut().close_count += 1;
        Ok(())
    }
}

#[derive(Debug)]
struct FakeStoreError(String);

impl fmt::Display for FakeStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for FakeStoreError {}
