use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "import.sql";
pub const DEFAULT_OUTPUT_PATH: &str = "dental_data.db";

/// How the sink executor treats failures of non-table statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertErrorMode {
    /// Count the failure and move on without reporting it (`lenient-inserts`).
    #[default]
    Lenient,
    /// Report every failed statement to the operator.
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub insert_errors: InsertErrorMode,
    /// Replaces the source dialect's default denylist when set.
    pub denylist_prefixes: Option<Vec<String>>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            insert_errors: InsertErrorMode::default(),
            denylist_prefixes: None,
        }
    }
}

impl ConvertConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_insert_errors(mut self, mode: InsertErrorMode) -> Self {
        self.insert_errors = mode;
        self
    }

    #[must_use]
    pub fn with_denylist_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.denylist_prefixes = Some(prefixes);
        self
    }
}
