use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    column::{ClauseKind, ColumnClause},
    scan::{matching_close, split_top_level},
};

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?",
        r#"(?:(?:`(?:[^`]|``)+`|"(?:[^"]|"")+"|\w+)\s*\.\s*)?"#,
        r#"(?:`((?:[^`]|``)+)`|"((?:[^"]|"")+)"|(\w+))"#,
    ))
    .expect("table name pattern is valid")
});

/// A `CREATE TABLE` statement reduced to what the target engine accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// Unquoted table name; the schema qualifier, if any, is dropped.
    pub name: String,
    /// Retained clauses in declaration order. At least one is a column.
    pub clauses: Vec<ColumnClause>,
}

impl TableDefinition {
    /// Parses and cleans a MySQL table definition.
    ///
    /// Returns `None` when no table name or parenthesised body can be found, or
    /// when no column survives clause filtering.
    #[must_use]
    pub fn parse(sql: &str) -> Option<Self> {
        let sql = BLOCK_COMMENT.replace_all(sql, "");

        let captures = TABLE_NAME.captures(&sql)?;
        let name = table_name(&captures)?;
        let name_end = captures.get(0)?.end();

        let last_close = sql.rfind(')')?;
        let open = name_end + sql.get(name_end..last_close)?.find('(')?;
        let close = matching_close(&sql, open)
            .filter(|close| *close <= last_close)
            .unwrap_or(last_close);

        let clauses: Vec<ColumnClause> = split_top_level(&sql[open + 1..close], b',')
            .into_iter()
            .filter_map(ColumnClause::parse)
            .filter(|clause| clause.kind.is_retained())
            .collect();

        if !clauses
            .iter()
            .any(|clause| clause.kind == ClauseKind::Column)
        {
            return None;
        }

        Some(Self { name, clauses })
    }

    #[must_use]
    pub fn to_sql(&self) -> String {
        let body = self
            .clauses
            .iter()
            .map(|clause| clause.sql.as_str())
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({body});",
            quote_identifier(&self.name)
        )
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnClause> {
        self.clauses
            .iter()
            .filter(|clause| clause.kind == ClauseKind::Column)
    }
}

fn table_name(captures: &regex::Captures<'_>) -> Option<String> {
    if let Some(backticked) = captures.get(1) {
        return Some(backticked.as_str().replace("``", "`"));
    }
    if let Some(double_quoted) = captures.get(2) {
        return Some(double_quoted.as_str().replace("\"\"", "\""));
    }
    captures.get(3).map(|bare| bare.as_str().to_string())
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
