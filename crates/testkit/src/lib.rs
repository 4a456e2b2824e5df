//! YAML-driven conversion cases shared by the dialect test suites.

mod yaml_runner;

pub use yaml_runner::{
    CaseLoadError, ConversionCase, TestResult, load_cases_from_path, load_cases_from_str,
    run_offline_case, run_online_case,
};
