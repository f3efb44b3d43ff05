//! Builders for the store's `filterByFormula` expressions.

/// Quotes `value` as a formula string literal.
pub(crate) fn string_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// `{field} = 'value'`
pub(crate) fn field_equals(field: &str, value: &str) -> String {
    format!("{{{}}} = {}", field, string_literal(value))
}

/// `{field} = TRUE()`
pub(crate) fn field_is_true(field: &str) -> String {
    format!("{{{}}} = TRUE()", field)
}
