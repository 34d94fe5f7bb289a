//! Query-string building for the store's REST interface
//!
//! Filters follow the `column=operator.value` convention; values that may
//! contain reserved characters are double-quoted.

use chrono::{DateTime, SecondsFormat, Utc};

/// Columns the search overlay needs
pub const SEARCH_COLUMNS: &str = "id,title,image_url,content_type";

/// Columns of a catalog card
pub const CATALOG_COLUMNS: &str =
    "id,title,description,image_url,content_type,is_premium,is_new,genres,created_at";

/// Watch-progress rows with the content summary joined in
pub const WATCH_PROGRESS_COLUMNS: &str = "content:content_id(id,title,image_url,content_type,is_premium,is_new),progress_seconds,last_watched_at";

/// Builder for a REST read URL
#[derive(Debug, Clone, Default)]
pub struct RestQuery {
    params: Vec<(String, String)>,
}

impl RestQuery {
    pub fn select(columns: &str) -> Self {
        Self {
            params: vec![("select".to_string(), columns.to_string())],
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("gte.{}", value.to_string())));
        self
    }

    /// Case-insensitive substring match on `column`
    pub fn ilike_contains(mut self, column: &str, needle: &str) -> Self {
        self.params
            .push((column.to_string(), format!("ilike.{}", contains_pattern(needle))));
        self
    }

    /// Array column contains every listed value
    pub fn contains(mut self, column: &str, values: &[&str]) -> Self {
        let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
        self.params
            .push((column.to_string(), format!("cs.{{{}}}", quoted.join(","))));
        self
    }

    /// `order` may be given as `column.asc,other.desc`
    pub fn order(mut self, order: &str) -> Self {
        self.params.push(("order".to_string(), order.to_string()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.params.push(("offset".to_string(), offset.to_string()));
        self
    }

    /// Render against `{rest_url}/{table}`
    pub fn to_url(&self, rest_url: &str, table: &str) -> String {
        let mut url = format!("{}/{}", rest_url, table);
        if !self.params.is_empty() {
            url.push('?');
            let param_strings: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url.push_str(&param_strings.join("&"));
        }
        url
    }
}

/// `*needle*` with LIKE metacharacters escaped, quoted for the filter grammar.
/// A literal `*` in the needle cannot be expressed and acts as a wildcard.
pub fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 4);
    for ch in needle.trim().chars() {
        match ch {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    quote(&format!("*{}*", escaped))
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn contains_pattern_wraps_and_quotes() {
        assert_eq!(contains_pattern("matrix"), "\"*matrix*\"");
        assert_eq!(contains_pattern("  lost "), "\"*lost*\"");
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%"), r#""*100\\%*""#);
        assert_eq!(contains_pattern("a_b"), r#""*a\\_b*""#);
        assert_eq!(contains_pattern("say \"hi\""), r#""*say \"hi\"*""#);
    }

    #[test]
    fn search_url_is_encoded() {
        let url = RestQuery::select(SEARCH_COLUMNS)
            .ilike_contains("title", "the office")
            .order("title.asc,id.asc")
            .limit(20)
            .offset(40)
            .to_url("https://demo.supabase.co/rest/v1", "content");

        assert!(url.starts_with("https://demo.supabase.co/rest/v1/content?select="));
        assert!(url.contains("title=ilike.%22%2Athe%20office%2A%22"));
        assert!(url.contains("order=title.asc%2Cid.asc"));
        assert!(url.ends_with("limit=20&offset=40"));
    }

    #[test]
    fn genre_filter_uses_array_literal() {
        let url = RestQuery::default()
            .contains("genres", &["Sci-Fi"])
            .to_url("http://x/rest/v1", "content");
        assert_eq!(url, "http://x/rest/v1/content?genres=cs.%7B%22Sci-Fi%22%7D");
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(timestamp(at), "2024-03-01T12:00:00Z");
    }
}
