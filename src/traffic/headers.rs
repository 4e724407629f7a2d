//! Header lists, the display deny-list, and header block rendering.

use super::highlight::{ContentKind, Highlighter};
use reqwest::header::HeaderMap;

/// Ordered `(name, value)` pairs as they appeared on the wire.
pub type HeaderList = Vec<(String, String)>;

/// Header names never shown in traffic dumps. Matched exactly.
pub const IGNORE_HEADERS: [&str; 10] = [
    "Cache-Control",
    "Content-Security-Policy",
    "Cookie",
    "Set-Cookie",
    "Strict-Transport-Security",
    "X-Content-Security-Policy",
    "X-WebKit-CSP",
    "X-Content-Type-Options",
    "X-XSS-Protection",
    "X-Frame-Options",
];

/// Shown in place of values the client marked as sensitive.
const REDACTED: &str = "<redacted>";

pub fn is_ignored(name: &str) -> bool {
    IGNORE_HEADERS.contains(&name)
}

/// Case-insensitive lookup of the first header with `name`.
pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Restore conventional casing for a lowercase header name.
///
/// Names on the deny-list keep their listed spelling so that filtering still
/// applies to headers coming from `http`, which lowercases everything.
pub fn canonical_name(name: &str) -> String {
    if let Some(listed) = IGNORE_HEADERS
        .iter()
        .find(|listed| listed.eq_ignore_ascii_case(name))
    {
        return listed.to_string();
    }

    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// Convert a header map into a display list.
pub fn from_header_map(map: &HeaderMap) -> HeaderList {
    map.iter()
        .map(|(name, value)| {
            let value = if value.is_sensitive() {
                REDACTED.to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (canonical_name(name.as_str()), value)
        })
        .collect()
}

/// Render a status line followed by every displayable header.
pub fn format_headers(
    prefix: &str,
    headers: &[(String, String)],
    highlighter: &dyn Highlighter,
) -> String {
    let mut lines = vec![prefix.to_string()];
    lines.extend(
        headers
            .iter()
            .filter(|(name, _)| !is_ignored(name))
            .map(|(name, value)| format!("{}: {}", name, value)),
    );

    highlighter.highlight(ContentKind::Http, &lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::highlight::PlainHighlighter;
    use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, SET_COOKIE};

    fn pairs(items: &[(&str, &str)]) -> HeaderList {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_format_headers_filters_deny_list() {
        let headers = pairs(&[("Set-Cookie", "x"), ("X-Custom", "y"), ("Cache-Control", "no-store")]);
        let block = format_headers("HTTP/1.1 200 OK", &headers, &PlainHighlighter);

        assert_eq!(block, "HTTP/1.1 200 OK\nX-Custom: y\n");
        assert!(!block.contains("Set-Cookie"));
    }

    #[test]
    fn test_deny_list_is_case_sensitive() {
        let headers = pairs(&[("set-cookie", "x")]);
        let block = format_headers("GET / HTTP/1.1", &headers, &PlainHighlighter);
        assert!(block.contains("set-cookie: x"));
    }

    #[test]
    fn test_header_value_lookup() {
        let headers = pairs(&[("content-type", "application/json"), ("Accept", "*/*")]);
        assert_eq!(header_value(&headers, "Content-Type"), Some("application/json"));
        assert_eq!(header_value(&headers, "accept"), Some("*/*"));
        assert_eq!(header_value(&headers, "X-Missing"), None);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_name("x-xss-protection"), "X-XSS-Protection");
        assert_eq!(canonical_name("x-webkit-csp"), "X-WebKit-CSP");
        assert_eq!(canonical_name("etag"), "Etag");
    }

    #[test]
    fn test_from_header_map() {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        map.insert(SET_COOKIE, HeaderValue::from_static("session=1"));
        let mut secret = HeaderValue::from_static("Bearer sk-test");
        secret.set_sensitive(true);
        map.insert(AUTHORIZATION, secret);

        let headers = from_header_map(&map);
        assert_eq!(header_value(&headers, "Content-Type"), Some("text/html"));
        assert_eq!(header_value(&headers, "Authorization"), Some(REDACTED));
        assert!(headers.iter().any(|(k, _)| k == "Set-Cookie"));

        let block = format_headers("HTTP/1.1 200 OK", &headers, &PlainHighlighter);
        assert!(!block.contains("session=1"));
        assert!(!block.contains("sk-test"));
    }
}
