use dumpconv_core::StatementKind;

use crate::scan::leading_keyword;

const KEYWORD_RULES: &[(&[&str], StatementKind)] = &[
    (&["CREATE", "TABLE"], StatementKind::TableDefinition),
    (&["INSERT", "INTO"], StatementKind::Insert),
    (&["DROP", "TABLE"], StatementKind::Drop),
];

/// Classifies a statement by its leading keywords, ignoring case and the
/// amount of whitespace between them.
pub(crate) fn classify_sql(sql: &str) -> StatementKind {
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| starts_with_keywords(sql, keywords))
        .map_or(StatementKind::Ignored, |(_, kind)| *kind)
}

fn starts_with_keywords(sql: &str, keywords: &[&str]) -> bool {
    let mut words = sql.split_whitespace();
    keywords.iter().enumerate().all(|(position, keyword)| {
        words.next().is_some_and(|word| {
            let leading = leading_keyword(word);
            // Only the last keyword may run straight into `(` or a quoted name.
            leading == *keyword && (position + 1 == keywords.len() || leading.len() == word.len())
        })
    })
}
