/// Rewrites MySQL backslash escapes of quote characters into the forms the
/// target accepts: `\'` becomes `''` and `\"` becomes `"`.
///
/// The replacement is textual and does not track literal boundaries, so a
/// value ending in an escaped backslash (`'a\\'`) is rewritten as well. No arity
/// or structure check is made; a malformed insert fails when executed.
#[must_use]
pub fn normalize_insert(sql: &str) -> String {
    sql.replace("\\'", "''").replace("\\\"", "\"")
}
