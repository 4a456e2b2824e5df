// Ordered by name so exports and row counts compare stably across runs.

pub(crate) const TABLE_NAMES_QUERY: &str = r#"
SELECT tbl_name
FROM sqlite_master
WHERE type = 'table' AND substr(tbl_name, 1, 7) <> 'sqlite_'
ORDER BY tbl_name ASC;
"#;

pub(crate) const TABLE_DDL_QUERY: &str = r#"
SELECT sql
FROM sqlite_master
WHERE tbl_name = ?1 AND type = 'table';
"#;

pub(crate) fn row_count_query(table_name: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM \"{}\";",
        table_name.replace('"', "\"\"")
    )
}
