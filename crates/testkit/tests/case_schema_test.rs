use std::{collections::BTreeMap, path::Path};

use dumpconv_dialect_mysql::MysqlDialect;
use dumpconv_dialect_sqlite::SqliteDialect;
use dumpconv_testkit::{
    CaseLoadError, ConversionCase, TestResult, load_cases_from_path, load_cases_from_str,
    run_offline_case, run_online_case,
};

#[test]
fn omitted_fields_take_defaults() {
    let cases = load_cases_from_str("minimal:\n  dump: \"DROP TABLE t;\"\n")
        .unwrap_or_else(|error| panic!("failed to parse cases: {error}"));

    let case = cases.get("minimal").expect("minimal case should be present");
    assert_eq!(
        case,
        &ConversionCase {
            dump: "DROP TABLE t;".to_string(),
            ..ConversionCase::default()
        }
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let error = load_cases_from_str("bad:\n  dump: \"\"\n  expected_sql: []\n")
        .expect_err("unknown field must be rejected");

    assert!(matches!(error, CaseLoadError::Yaml { .. }), "{error:?}");
    assert!(error.to_string().contains("expected_sql"), "{error}");
}

#[test]
fn missing_corpus_file_is_a_read_error() {
    let error = load_cases_from_path(Path::new("does/not/exist.yml"))
        .expect_err("missing file must fail");

    assert!(matches!(error, CaseLoadError::Read { .. }), "{error:?}");
    assert!(error.to_string().contains("does/not/exist.yml"));
}

#[test]
fn rewritten_mismatch_fails_the_offline_case() {
    let case = ConversionCase {
        dump: "CREATE TABLE `t` (`id` int(11));\n".to_string(),
        rewritten: Some(vec!["CREATE TABLE `t` (`id` int(11));".to_string()]),
        ..ConversionCase::default()
    };

    let TestResult::Failed(message) = run_offline_case(&MysqlDialect, &case) else {
        panic!("mismatched rewrite must fail");
    };
    assert!(message.contains("rewritten SQL mismatch"), "{message}");
    assert!(message.contains("`id` INTEGER"), "{message}");
}

#[test]
fn row_count_and_failure_mismatches_fail_the_online_case() {
    let case = ConversionCase {
        dump: "CREATE TABLE `t` (`id` int);\nINSERT INTO `t` VALUES (1);\n".to_string(),
        tables: Some(BTreeMap::from([("t".to_string(), 5)])),
        ..ConversionCase::default()
    };
    let adapter = SqliteDialect
        .open_in_memory()
        .unwrap_or_else(|error| panic!("failed to open in-memory store: {error}"));

    let TestResult::Failed(message) = run_online_case(&MysqlDialect, adapter.as_ref(), &case) else {
        panic!("row count mismatch must fail");
    };
    assert!(message.contains("row counts mismatch"), "{message}");

    let case = ConversionCase {
        dump: "INSERT INTO `ghost` VALUES (1);\n".to_string(),
        failures: Some(0),
        ..ConversionCase::default()
    };
    let adapter = SqliteDialect
        .open_in_memory()
        .unwrap_or_else(|error| panic!("failed to open in-memory store: {error}"));

    let TestResult::Failed(message) = run_online_case(&MysqlDialect, adapter.as_ref(), &case) else {
        panic!("unexpected failure count must fail");
    };
    assert!(message.contains("expected 0 failed statements, got 1"), "{message}");
}

#[test]
fn offline_cases_are_skipped_online() {
    let case = ConversionCase {
        dump: "DROP TABLE t;\n".to_string(),
        offline: true,
        ..ConversionCase::default()
    };
    let adapter = SqliteDialect
        .open_in_memory()
        .unwrap_or_else(|error| panic!("failed to open in-memory store: {error}"));

    assert!(matches!(
        run_online_case(&MysqlDialect, adapter.as_ref(), &case),
        TestResult::Skipped(_)
    ));
}
