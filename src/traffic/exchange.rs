//! Captured HTTP requests and responses, and the narrow views the formatter reads.

use super::headers::{from_header_map, header_value, HeaderList};
use crate::error::Result;
use reqwest::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A request or response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Body {
    /// No payload at all.
    #[default]
    Empty,
    /// Decoded text.
    Text(String),
    /// Raw bytes; printable only when they are valid UTF-8.
    Bytes(Vec<u8>),
    /// A streaming payload that was never buffered.
    Stream,
}

impl Body {
    /// Build a body from buffered bytes, preferring text when they decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Body::Empty;
        }
        match String::from_utf8(bytes) {
            Ok(text) => Body::Text(text),
            Err(e) => Body::Bytes(e.into_bytes()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Bytes(bytes) => bytes.is_empty(),
            Body::Stream => false,
        }
    }

    /// The payload as text, or `None` for streams and non-UTF-8 bytes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Empty => Some(""),
            Body::Text(text) => Some(text),
            Body::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            Body::Stream => None,
        }
    }

    /// The buffered payload bytes. Streams have none.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Empty | Body::Stream => &[],
            Body::Text(text) => text.as_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

/// What the formatter needs to know about an outbound request.
pub trait RequestView {
    fn method(&self) -> &str;

    /// Path plus query string, e.g. `/v1/items?page=2`.
    fn path(&self) -> String;

    fn headers(&self) -> HeaderList;

    fn body(&self) -> Body;
}

/// What the formatter needs to know about an inbound response.
pub trait ResponseView {
    /// Numeric protocol indicator: 10, 11, 20, ...
    fn version(&self) -> u8;

    fn status(&self) -> u16;

    fn reason(&self) -> &str;

    fn headers(&self) -> HeaderList;

    fn text(&self) -> Body;

    /// The request that produced this response, when it was kept.
    fn request(&self) -> Option<&dyn RequestView> {
        None
    }
}

/// Map a protocol version to the numeric indicator used in traffic dumps.
pub fn version_code(version: Version) -> u8 {
    match version {
        Version::HTTP_09 => 9,
        Version::HTTP_10 => 10,
        Version::HTTP_11 => 11,
        Version::HTTP_2 => 20,
        Version::HTTP_3 => 30,
        _ => 0,
    }
}

/// An owned snapshot of an outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderList,
    pub body: Body,
}

impl CapturedRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Snapshot any request view.
    pub fn from_view(view: &dyn RequestView) -> Self {
        Self {
            method: view.method().to_string(),
            path: view.path(),
            headers: view.headers(),
            body: view.body(),
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        header_value(&self.headers, "Content-Type")
    }
}

impl RequestView for CapturedRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn headers(&self) -> HeaderList {
        self.headers.clone()
    }

    fn body(&self) -> Body {
        self.body.clone()
    }
}

impl From<&reqwest::Request> for CapturedRequest {
    fn from(request: &reqwest::Request) -> Self {
        Self::from_view(request)
    }
}

impl RequestView for reqwest::Request {
    fn method(&self) -> &str {
        reqwest::Request::method(self).as_str()
    }

    fn path(&self) -> String {
        let url = self.url();
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    fn headers(&self) -> HeaderList {
        from_header_map(reqwest::Request::headers(self))
    }

    fn body(&self) -> Body {
        match reqwest::Request::body(self) {
            None => Body::Empty,
            Some(body) => match body.as_bytes() {
                Some(bytes) => Body::from_bytes(bytes.to_vec()),
                None => Body::Stream,
            },
        }
    }
}

/// An owned snapshot of an inbound response, with its request when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturedResponse {
    pub version: u8,
    pub status: u16,
    pub reason: String,
    pub headers: HeaderList,
    pub text: Body,
    pub request: Option<CapturedRequest>,
}

impl Default for CapturedResponse {
    fn default() -> Self {
        Self {
            version: 11,
            status: 200,
            reason: "OK".to_string(),
            headers: Vec::new(),
            text: Body::Empty,
            request: None,
        }
    }
}

impl CapturedResponse {
    pub fn new(version: u8, status: u16, reason: &str) -> Self {
        Self {
            version,
            status,
            reason: reason.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_text(mut self, text: impl Into<Body>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_request(mut self, request: CapturedRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Consume a live response, buffering its body.
    pub async fn capture(
        response: reqwest::Response,
        request: Option<CapturedRequest>,
    ) -> Result<Self> {
        let status = response.status();
        let version = version_code(response.version());
        let headers = from_header_map(response.headers());
        // HTTP/1 servers may send a non-canonical reason phrase.
        let reason = match response.extensions().get::<hyper::ext::ReasonPhrase>() {
            Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        };
        let bytes = response.bytes().await?;

        debug!(status = status.as_u16(), bytes = bytes.len(), "Captured response");

        Ok(Self {
            version,
            status: status.as_u16(),
            reason,
            headers,
            text: Body::from_bytes(bytes.to_vec()),
            request,
        })
    }

    pub fn content_type(&self) -> Option<&str> {
        header_value(&self.headers, "Content-Type")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl ResponseView for CapturedResponse {
    fn version(&self) -> u8 {
        self.version
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn headers(&self) -> HeaderList {
        self.headers.clone()
    }

    fn text(&self) -> Body {
        self.text.clone()
    }

    fn request(&self) -> Option<&dyn RequestView> {
        self.request.as_ref().map(|r| r as &dyn RequestView)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_from_bytes() {
        assert_eq!(Body::from_bytes(Vec::new()), Body::Empty);
        assert_eq!(Body::from_bytes(b"hello".to_vec()), Body::Text("hello".into()));
        assert_eq!(
            Body::from_bytes(vec![0xff, 0xfe, 0x00]),
            Body::Bytes(vec![0xff, 0xfe, 0x00])
        );
    }

    #[test]
    fn test_body_text_access() {
        assert!(Body::Stream.as_text().is_none());
        assert!(!Body::Stream.is_empty());
        assert!(Body::Text(String::new()).is_empty());
        assert_eq!(Body::Bytes(b"abc".to_vec()).as_text(), Some("abc"));
        assert_eq!(Body::Text("abc".into()).as_bytes(), b"abc");
    }

    #[test]
    fn test_version_code() {
        assert_eq!(version_code(Version::HTTP_10), 10);
        assert_eq!(version_code(Version::HTTP_11), 11);
        assert_eq!(version_code(Version::HTTP_2), 20);
        assert_eq!(version_code(Version::HTTP_3), 30);
    }

    #[test]
    fn test_reqwest_request_view() {
        let client = reqwest::Client::new();
        let request = client
            .post("https://api.example.com/v1/items?page=2")
            .header("X-Trace", "abc")
            .body("payload")
            .build()
            .unwrap();

        let captured = CapturedRequest::from(&request);
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.path, "/v1/items?page=2");
        assert_eq!(captured.headers, vec![("X-Trace".to_string(), "abc".to_string())]);
        assert_eq!(captured.body, Body::Text("payload".into()));
    }

    #[test]
    fn test_reqwest_request_without_body() {
        let request = reqwest::Client::new()
            .get("https://api.example.com/")
            .build()
            .unwrap();

        assert_eq!(RequestView::body(&request), Body::Empty);
        assert_eq!(RequestView::path(&request), "/");
    }

    #[test]
    fn test_capture_response() {
        let response = http::Response::builder()
            .status(404)
            .version(http::Version::HTTP_2)
            .header("content-type", "application/json")
            .body(r#"{"error":"missing"}"#)
            .unwrap();
        let request = CapturedRequest::new("GET", "/missing");

        let captured = tokio_test::block_on(CapturedResponse::capture(
            reqwest::Response::from(response),
            Some(request.clone()),
        ))
        .unwrap();

        assert_eq!(captured.version, 20);
        assert_eq!(captured.status, 404);
        assert_eq!(captured.reason, "Not Found");
        assert_eq!(captured.content_type(), Some("application/json"));
        assert_eq!(captured.text, Body::Text(r#"{"error":"missing"}"#.into()));
        assert_eq!(captured.request, Some(request));
        assert!(!captured.is_success());
    }

    #[test]
    fn test_capture_keeps_wire_reason_phrase() {
        let response = http::Response::builder()
            .status(520)
            .extension(hyper::ext::ReasonPhrase::from_static(b"Origin Error"))
            .body("")
            .unwrap();

        let captured =
            tokio_test::block_on(CapturedResponse::capture(reqwest::Response::from(response), None)).unwrap();

        assert_eq!(captured.status, 520);
        assert_eq!(captured.reason, "Origin Error");
    }

    #[test]
    fn test_response_request_fallback_view() {
        let response = CapturedResponse::default();
        assert!(ResponseView::request(&response).is_none());

        let response = response.with_request(CapturedRequest::new("DELETE", "/x"));
        let request = ResponseView::request(&response).unwrap();
        assert_eq!(request.method(), "DELETE");
    }

    #[test]
    fn test_capture_serde_round_trip() {
        let response = CapturedResponse::new(11, 201, "Created")
            .with_header("Content-Type", "text/plain")
            .with_text("done")
            .with_request(CapturedRequest::new("PUT", "/things/1").with_body("x"));

        let json = serde_json::to_string(&response).unwrap();
        let parsed: CapturedResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }
}
