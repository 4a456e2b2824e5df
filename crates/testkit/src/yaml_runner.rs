use std::{collections::BTreeMap, fs, io, path::Path};

use dumpconv_core::{
    ConvertConfig, DatabaseAdapter, ImportStats, InsertErrorMode, SourceDialect,
    StatementSegmenter, import_stream,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionCase {
    pub dump: String,
    /// Statements the source dialect should emit, in order.
    pub rewritten: Option<Vec<String>>,
    /// Row count per table after importing into an empty store.
    pub tables: Option<BTreeMap<String, u64>>,
    /// Statements expected to fail during import, reported or not.
    pub failures: Option<u64>,
    pub strict_inserts: Option<bool>,
    pub deny_prefixes: Option<Vec<String>>,
    /// Skips the online runner.
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Error)]
pub enum CaseLoadError {
    #[error("failed to read conversion cases from `{path}`")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid conversion cases ({location}): {source}")]
    Yaml {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
enum RunnerError {
    #[error(transparent)]
    Conversion(#[from] dumpconv_core::Error),
    #[error("{0}")]
    Mismatch(String),
}

pub fn load_cases_from_str(
    yaml: &str,
) -> std::result::Result<BTreeMap<String, ConversionCase>, CaseLoadError> {
    serde_yaml::from_str(yaml).map_err(|source| CaseLoadError::Yaml {
        location: source.location().map_or_else(
            || "location=unknown".to_string(),
            |location| format!("line {}:{}", location.line(), location.column()),
        ),
        source,
    })
}

pub fn load_cases_from_path(
    path: &Path,
) -> std::result::Result<BTreeMap<String, ConversionCase>, CaseLoadError> {
    let yaml = fs::read_to_string(path).map_err(|source| CaseLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_cases_from_str(&yaml)
}

/// Checks the rewritten statements of a case without touching a store.
pub fn run_offline_case(source: &dyn SourceDialect, case: &ConversionCase) -> TestResult {
    into_test_result(run_offline_flow(source, case))
}

/// Imports the dump of a case into `adapter`, which should hold an empty
/// store, and checks the resulting row counts and failure count.
pub fn run_online_case(
    source: &dyn SourceDialect,
    adapter: &dyn DatabaseAdapter,
    case: &ConversionCase,
) -> TestResult {
    if case.offline {
        return TestResult::Skipped("offline-only conversion case".to_string());
    }
    into_test_result(run_online_flow(source, adapter, case))
}

fn into_test_result(outcome: std::result::Result<(), RunnerError>) -> TestResult {
    match outcome {
        Ok(()) => TestResult::Passed,
        Err(error) => TestResult::Failed(error.to_string()),
    }
}

fn run_offline_flow(
    source: &dyn SourceDialect,
    case: &ConversionCase,
) -> std::result::Result<(), RunnerError> {
    let Some(expected) = case.rewritten.as_deref() else {
        return Ok(());
    };

    let denylist = case
        .deny_prefixes
        .clone()
        .unwrap_or_else(|| source.default_denylist());
    let mut actual = Vec::new();
    for raw in StatementSegmenter::new(case.dump.as_bytes(), denylist) {
        if let Some(statement) = source.rewrite(raw?) {
            actual.push(statement.sql);
        }
    }

    let expected: Vec<&str> = expected.iter().map(|sql| sql.trim()).collect();
    let actual: Vec<&str> = actual.iter().map(|sql| sql.trim()).collect();
    if expected == actual {
        return Ok(());
    }

    Err(RunnerError::Mismatch(format!(
        "rewritten SQL mismatch; expected:\n{}\nactual:\n{}",
        expected.join("\n"),
        actual.join("\n")
    )))
}

fn run_online_flow(
    source: &dyn SourceDialect,
    adapter: &dyn DatabaseAdapter,
    case: &ConversionCase,
) -> std::result::Result<(), RunnerError> {
    let stats = import_stream(source, case.dump.as_bytes(), adapter, &case_config(case))?;

    if let Some(expected) = case.failures {
        let actual = failure_count(&stats);
        if actual != expected {
            return Err(RunnerError::Mismatch(format!(
                "expected {expected} failed statements, got {actual}\n{stats}"
            )));
        }
    }

    let Some(expected) = case.tables.as_ref() else {
        return Ok(());
    };
    let actual = adapter.row_counts()?;
    if &actual == expected {
        return Ok(());
    }

    Err(RunnerError::Mismatch(format!(
        "row counts mismatch; expected: {expected:?}, actual: {actual:?}"
    )))
}

fn case_config(case: &ConversionCase) -> ConvertConfig {
    let insert_errors = if case.strict_inserts.unwrap_or(false) {
        InsertErrorMode::Report
    } else {
        InsertErrorMode::Lenient
    };
    let config = ConvertConfig::default().with_insert_errors(insert_errors);
    match case.deny_prefixes.clone() {
        Some(prefixes) => config.with_denylist_prefixes(prefixes),
        None => config,
    }
}

fn failure_count(stats: &ImportStats) -> u64 {
    stats.tables_failed + stats.inserts_failed + stats.drops_failed
}
