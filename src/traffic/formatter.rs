//! Renders traffic records as readable request/response dumps.

use super::body::format_body;
use super::exchange::{RequestView, ResponseView};
use super::headers::{format_headers, header_value};
use super::highlight::{self, Highlighter, PlainHighlighter};
use super::record::TrafficRecord;

/// Outbound requests are always shown as HTTP/1.1.
const REQUEST_HTTP_VERSION: &str = "1.1";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Display label for a numeric protocol indicator.
pub fn protocol_label(version: u8) -> &'static str {
    match version {
        10 => "1.0",
        11 => "1.1",
        20 => "2.0",
        _ => "unknown",
    }
}

/// Formats log records together with any HTTP exchange attached to them.
///
/// ```
/// use heimdall::traffic::{CapturedResponse, TrafficFormatter, TrafficRecord};
/// use tracing::Level;
///
/// let response = CapturedResponse::new(11, 200, "OK")
///     .with_header("Content-Type", "application/json")
///     .with_text(r#"{"ok":true}"#);
/// let record = TrafficRecord::new(Level::INFO, "fetched").with_response(response);
///
/// let out = TrafficFormatter::plain().format(&record);
/// assert!(out.contains("HTTP/1.1 200 OK"));
/// ```
#[derive(Clone, Copy)]
pub struct TrafficFormatter {
    highlighter: &'static dyn Highlighter,
}

impl std::fmt::Debug for TrafficFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficFormatter")
            .field("highlighter", &self.highlighter.name())
            .finish()
    }
}

impl Default for TrafficFormatter {
    fn default() -> Self {
        Self::new(highlight::active())
    }
}

impl TrafficFormatter {
    pub fn new(highlighter: &'static dyn Highlighter) -> Self {
        Self { highlighter }
    }

    /// A formatter that never emits colour codes.
    pub fn plain() -> Self {
        Self::new(&PlainHighlighter)
    }

    pub fn format(&self, record: &TrafficRecord) -> String {
        let response = record.response.as_ref().map(|r| r as &dyn ResponseView);
        let request = record
            .request
            .as_ref()
            .map(|r| r as &dyn RequestView)
            .or_else(|| response.and_then(|r| r.request()));

        let mut msg = self.format_message(record);

        if let Some(request) = request {
            ensure_newline(&mut msg);
            msg.push_str(&self.format_request(request));
        }

        if let Some(response) = response {
            ensure_newline(&mut msg);
            msg.push_str(&self.format_response(response));
        }

        msg
    }

    /// The leading `[time] LEVEL [http:log] message` line.
    pub fn format_message(&self, record: &TrafficRecord) -> String {
        format!(
            "[{}] {} [http:log] {}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.level,
            record.message
        )
    }

    pub fn format_request(&self, request: &dyn RequestView) -> String {
        let status = format!(
            "{} {} HTTP/{}",
            request.method(),
            request.path(),
            REQUEST_HTTP_VERSION
        );
        let headers = request.headers();

        format!(
            "{}\n{}\n",
            format_headers(&status, &headers, self.highlighter),
            format_body(&request.body(), header_value(&headers, "Content-Type"), self.highlighter)
        )
    }

    pub fn format_response(&self, response: &dyn ResponseView) -> String {
        let status = format!(
            "HTTP/{} {} {}",
            protocol_label(response.version()),
            response.status(),
            response.reason()
        );
        let headers = response.headers();

        format!(
            "{}\n{}",
            format_headers(&status, &headers, self.highlighter),
            format_body(&response.text(), header_value(&headers, "Content-Type"), self.highlighter)
        )
    }
}

fn ensure_newline(msg: &mut String) {
    if !msg.ends_with('\n') {
        msg.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::exchange::{CapturedRequest, CapturedResponse};
    use chrono::{Local, TimeZone};
    use tracing::Level;

    fn record(message: &str) -> TrafficRecord {
        let mut record = TrafficRecord::new(Level::INFO, message);
        record.timestamp = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        record
    }

    #[test]
    fn test_message_only() {
        let out = TrafficFormatter::plain().format(&record("hello"));
        assert_eq!(out, "[2024-05-01 12:30:00,000] INFO [http:log] hello");
    }

    #[test]
    fn test_protocol_labels() {
        assert_eq!(protocol_label(10), "1.0");
        assert_eq!(protocol_label(11), "1.1");
        assert_eq!(protocol_label(20), "2.0");
        assert_eq!(protocol_label(30), "unknown");
        assert_eq!(protocol_label(0), "unknown");
    }

    #[test]
    fn test_response_status_line() {
        let response = CapturedResponse::new(11, 200, "OK");
        let out = TrafficFormatter::plain().format_response(&response);
        assert!(out.starts_with("HTTP/1.1 200 OK"));
    }

    #[test]
    fn test_request_block() {
        let request = CapturedRequest::new("POST", "/v1/chat/completions")
            .with_header("Content-Type", "application/json")
            .with_header("Cookie", "secret")
            .with_body(r#"{"model":"m","messages":[]}"#);

        let out = TrafficFormatter::plain().format_request(&request);
        assert_eq!(
            out,
            "POST /v1/chat/completions HTTP/1.1\nContent-Type: application/json\n\n{\n  \"messages\": [],\n  \"model\": \"m\"\n}\n\n"
        );
    }

    #[test]
    fn test_full_exchange() {
        let request = CapturedRequest::new("GET", "/items?page=1");
        let response = CapturedResponse::new(20, 404, "Not Found")
            .with_header("Content-Type", "text/plain")
            .with_header("Set-Cookie", "x")
            .with_header("X-Custom", "y")
            .with_text("nope");

        let out = TrafficFormatter::plain().format(
            &record("lookup")
                .with_request(request)
                .with_response(response),
        );

        let expected = "[2024-05-01 12:30:00,000] INFO [http:log] lookup\n\
                        GET /items?page=1 HTTP/1.1\n\
                        \n\
                        <unknown>\n\
                        HTTP/2.0 404 Not Found\n\
                        Content-Type: text/plain\n\
                        X-Custom: y\n\
                        \n\
                        nope";
        assert_eq!(out, expected);
        assert!(!out.contains("Set-Cookie"));
    }

    #[test]
    fn test_request_falls_back_to_response_request() {
        let response = CapturedResponse::new(11, 204, "No Content")
            .with_request(CapturedRequest::new("DELETE", "/items/7"));

        let out = TrafficFormatter::plain().format(&record("deleted").with_response(response));
        assert!(out.contains("\nDELETE /items/7 HTTP/1.1\n"));
        assert!(out.contains("HTTP/1.1 204 No Content"));
    }

    #[test]
    fn test_explicit_request_wins_over_response_request() {
        let response = CapturedResponse::new(11, 200, "OK")
            .with_request(CapturedRequest::new("GET", "/from-response"));

        let out = TrafficFormatter::plain().format(
            &record("x")
                .with_request(CapturedRequest::new("GET", "/explicit"))
                .with_response(response),
        );
        assert!(out.contains("/explicit"));
        assert!(!out.contains("/from-response"));
    }

    #[test]
    fn test_malformed_json_response_is_raw() {
        let response = CapturedResponse::new(11, 500, "Internal Server Error")
            .with_header("Content-Type", "application/json")
            .with_text("{bad");

        let out = TrafficFormatter::plain().format_response(&response);
        assert!(out.ends_with("\n{bad"));
    }

    #[test]
    fn test_empty_reason_keeps_status_shape() {
        let response = CapturedResponse::new(11, 299, "");
        let out = TrafficFormatter::plain().format_response(&response);
        assert!(out.starts_with("HTTP/1.1 299 \n"));
    }
}
