//! PostgREST query-string builder.
//!
//! Filters follow the `column=op.value` convention; values are
//! percent-encoded when the query string is rendered.

use std::fmt::Display;

/// Filters, ordering and paging for one table request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to return, including embedded resources (`*, contacts(name)`).
    pub fn select(self, columns: &str) -> Self {
        let columns: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self.push("select", columns)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{}", value))
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("gte.{}", value))
    }

    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("lt.{}", value))
    }

    /// Case-insensitive substring match on any of `columns`.
    pub fn or_ilike(self, columns: &[&str], term: &str) -> Self {
        let pattern = quote_reserved(&format!("*{}*", term.trim()));
        let clauses: Vec<String> = columns
            .iter()
            .map(|col| format!("{}.ilike.{}", col, pattern))
            .collect();
        self.push("or", format!("({})", clauses.join(",")))
    }

    pub fn order(self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.push("order", format!("{}.{}", column, direction))
    }

    pub fn limit(self, n: usize) -> Self {
        self.push("limit", n.to_string())
    }

    /// Raw (unencoded) parameters in insertion order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}

/// Values inside `or=(...)` that contain PostgREST delimiters must be quoted.
fn quote_reserved(value: &str) -> String {
    if value.contains([',', '(', ')', '"', '\\', ':']) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_and_order() {
        let query = Query::new()
            .select("*, contacts(name, phone)")
            .eq("user_id", "u1")
            .order("created_at", false)
            .limit(5);

        assert_eq!(query.get("select"), Some("*,contacts(name,phone)"));
        assert_eq!(query.get("user_id"), Some("eq.u1"));
        assert_eq!(query.get("order"), Some("created_at.desc"));
        assert_eq!(query.get("limit"), Some("5"));
    }

    #[test]
    fn test_query_string_is_encoded() {
        let query = Query::new().eq("name", "Ana & Co").gte("due_date", "2024-01-01T00:00:00+00:00");
        assert_eq!(
            query.to_query_string(),
            "name=eq.Ana%20%26%20Co&due_date=gte.2024-01-01T00%3A00%3A00%2B00%3A00"
        );
    }

    #[test]
    fn test_or_ilike() {
        let query = Query::new().or_ilike(&["name", "email"], " ana ");
        assert_eq!(query.get("or"), Some("(name.ilike.*ana*,email.ilike.*ana*)"));
    }

    #[test]
    fn test_or_ilike_quotes_delimiters() {
        let query = Query::new().or_ilike(&["company"], "Acme, Inc");
        assert_eq!(query.get("or"), Some("(company.ilike.\"*Acme, Inc*\")"));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(Query::new().to_query_string(), "");
    }
}
