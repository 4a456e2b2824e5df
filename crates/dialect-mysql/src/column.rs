use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::{contains_unquoted_keyword, leading_keyword, split_words};

const INTEGER_TYPE: &str = "INTEGER";
const REAL_TYPE: &str = "REAL";
const TEXT_TYPE: &str = "TEXT";

const INDEX_PREFIXES: &[&[&str]] = &[
    &["KEY"],
    &["INDEX"],
    &["UNIQUE", "KEY"],
    &["UNIQUE", "INDEX"],
    &["FULLTEXT"],
    &["SPATIAL"],
];
const TABLE_CONSTRAINT_PREFIXES: &[&[&str]] = &[&["PRIMARY", "KEY"], &["UNIQUE"], &["CHECK"]];
const KEY_PART_CONSTRAINTS: &[&[&str]] = &[&["PRIMARY", "KEY"], &["UNIQUE"]];

/// `(191)` after a key part: a MySQL index prefix length.
static KEY_PREFIX_LENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([`"\w])\s*\(\s*\d+\s*\)"#).expect("key prefix length pattern is valid")
});

/// What a fragment of a `CREATE TABLE` body declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Column,
    /// `PRIMARY KEY (…)`, `UNIQUE (…)`, `CHECK (…)`; the target understands these.
    TableConstraint,
    Index,
    /// `FOREIGN KEY` declarations and anything carrying `REFERENCES`.
    Reference,
    /// `CONSTRAINT <name> …`
    NamedConstraint,
}

impl ClauseKind {
    #[must_use]
    pub fn is_retained(self) -> bool {
        matches!(self, Self::Column | Self::TableConstraint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnClause {
    pub kind: ClauseKind,
    /// Rewritten text for retained clauses, the trimmed original otherwise.
    pub sql: String,
}

impl ColumnClause {
    /// Classifies and rewrites one comma-separated fragment. Blank fragments yield `None`.
    #[must_use]
    pub fn parse(fragment: &str) -> Option<Self> {
        let fragment = fragment.trim();
        let words = split_words(fragment);
        if words.is_empty() {
            return None;
        }

        let kind = classify_clause(fragment, &words);
        let sql = match kind {
            ClauseKind::Column => rewrite_column(&words),
            ClauseKind::TableConstraint => rewrite_table_constraint(&words),
            ClauseKind::Index | ClauseKind::Reference | ClauseKind::NamedConstraint => {
                fragment.to_string()
            }
        };

        Some(Self { kind, sql })
    }
}

fn classify_clause(fragment: &str, words: &[&str]) -> ClauseKind {
    if INDEX_PREFIXES
        .iter()
        .any(|prefix| starts_with_keywords(words, prefix))
    {
        return ClauseKind::Index;
    }
    if starts_with_keywords(words, &["FOREIGN", "KEY"])
        || contains_unquoted_keyword(fragment, "REFERENCES")
    {
        return ClauseKind::Reference;
    }
    if starts_with_keywords(words, &["CONSTRAINT"]) {
        return ClauseKind::NamedConstraint;
    }
    // `UNIQUE <name> (…)` is a named index in MySQL.
    if starts_with_keywords(words, &["UNIQUE"])
        && words[0].len() == "UNIQUE".len()
        && words.get(1).is_some_and(|next| !next.starts_with('('))
    {
        return ClauseKind::Index;
    }
    if TABLE_CONSTRAINT_PREFIXES
        .iter()
        .any(|prefix| starts_with_keywords(words, prefix))
    {
        return ClauseKind::TableConstraint;
    }
    ClauseKind::Column
}

fn starts_with_keywords(words: &[&str], keywords: &[&str]) -> bool {
    words.len() >= keywords.len()
        && words
            .iter()
            .zip(keywords)
            .all(|(word, keyword)| leading_keyword(word) == *keyword)
}

fn rewrite_table_constraint(words: &[&str]) -> String {
    let sql = strip_annotations(words).join(" ");
    if KEY_PART_CONSTRAINTS
        .iter()
        .any(|prefix| starts_with_keywords(words, prefix))
    {
        KEY_PREFIX_LENGTH.replace_all(&sql, "$1").into_owned()
    } else {
        sql
    }
}

fn rewrite_column(words: &[&str]) -> String {
    let Some((name, rest)) = words.split_first() else {
        return String::new();
    };
    let mut rewritten = vec![(*name).to_string()];

    let rest = match rest.split_first() {
        Some((type_word, tail)) => {
            let (type_word, tail) = attach_detached_arguments(type_word, tail);
            let (folded, tail) = fold_type(&type_word, tail);
            rewritten.push(folded);
            tail
        }
        None => rest,
    };

    rewritten.extend(strip_annotations(rest));
    rewritten.join(" ")
}

/// `int (11)` is the same type as `int(11)`.
fn attach_detached_arguments<'a>(type_word: &str, tail: &'a [&'a str]) -> (String, &'a [&'a str]) {
    match tail.split_first() {
        Some((arguments, rest)) if arguments.starts_with('(') && !type_word.contains('(') => {
            (format!("{type_word}{arguments}"), rest)
        }
        _ => (type_word.to_string(), tail),
    }
}

/// Folds a MySQL column type onto the target's loose storage classes.
///
/// Only the type word is touched, so a column named like a type keeps its name.
pub(crate) fn fold_type<'a>(type_word: &str, tail: &'a [&'a str]) -> (String, &'a [&'a str]) {
    let base = leading_keyword(type_word);
    let bare = base.len() == type_word.len();
    let has_arguments = !bare && type_word[base.len()..].starts_with('(');
    if !bare && !has_arguments {
        return (type_word.to_string(), tail);
    }

    match base.as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
            (INTEGER_TYPE.to_string(), tail)
        }
        "DOUBLE" => match tail.split_first() {
            Some((precision, rest)) if leading_keyword(precision) == "PRECISION" => {
                (REAL_TYPE.to_string(), rest)
            }
            _ => (REAL_TYPE.to_string(), tail),
        },
        "FLOAT" | "REAL" => (REAL_TYPE.to_string(), tail),
        "ENUM" | "SET" if has_arguments => (TEXT_TYPE.to_string(), tail),
        _ => (type_word.to_string(), tail),
    }
}

/// Drops MySQL-only column and index annotations, keeping every other word.
pub(crate) fn strip_annotations(words: &[&str]) -> Vec<String> {
    let mut kept = Vec::with_capacity(words.len());
    let mut index = 0;

    while index < words.len() {
        let skip = annotation_len(&words[index..]);
        if skip == 0 {
            kept.push(words[index].to_string());
            index += 1;
        } else {
            index += skip;
        }
    }

    kept
}

fn annotation_len(words: &[&str]) -> usize {
    let Some(word) = words.first() else {
        return 0;
    };
    let keyword = leading_keyword(word);
    let next = words.get(1).map(|next| leading_keyword(next));
    let exact = keyword.len() == word.len();

    match keyword.as_str() {
        "UNSIGNED" | "SIGNED" | "ZEROFILL" | "AUTO_INCREMENT" if exact => 1,
        "COLLATE" | "CHARSET" | "COMMENT" => assignment_len(words),
        "CHARACTER" if exact && next.as_deref() == Some("SET") => 1 + assignment_len(&words[1..]),
        "DEFAULT"
            if exact && matches!(next.as_deref(), Some("CHARSET" | "CHARACTER" | "COLLATE")) =>
        {
            1
        }
        "ON" if exact && next.as_deref() == Some("UPDATE") => words.len().min(3),
        "USING" if exact && matches!(next.as_deref(), Some("BTREE" | "HASH")) => 2,
        _ => 0,
    }
}

/// Length of `KEYWORD value`, `KEYWORD=value`, `KEYWORD= value` or `KEYWORD = value`.
fn assignment_len(words: &[&str]) -> usize {
    let Some(word) = words.first() else {
        return 0;
    };
    let span = match word.find('=') {
        Some(position) if position + 1 < word.len() => 1,
        Some(_) => 2,
        None if words.get(1) == Some(&"=") => 3,
        None => 2,
    };
    span.min(words.len())
}
