use crate::SourceLocation;

/// One terminator-delimited span of dump text, not yet classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    pub sql: String,
    pub source_location: SourceLocation,
}

impl RawStatement {
    pub fn new(sql: impl Into<String>, source_location: SourceLocation) -> Self {
        Self {
            sql: sql.into(),
            source_location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    TableDefinition,
    Insert,
    Drop,
    Ignored,
}

impl StatementKind {
    #[must_use]
    pub fn is_table_definition(self) -> bool {
        self == Self::TableDefinition
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::TableDefinition => "create-table",
            Self::Insert => "insert",
            Self::Drop => "drop-table",
            Self::Ignored => "ignored",
        }
    }
}

/// A rewritten statement ready for the target store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub target: Option<String>,
    pub source_location: SourceLocation,
}

impl ExecutableStatement {
    pub fn new(kind: StatementKind, sql: impl Into<String>, source_location: SourceLocation) -> Self {
        Self {
            kind,
            sql: sql.into(),
            target: None,
            source_location,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}
