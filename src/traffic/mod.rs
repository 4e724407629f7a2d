//! HTTP traffic capture and formatting.
//!
//! A [`TrafficRecord`] is a log event that may carry a captured request and
//! response. [`TrafficFormatter`] renders it as a status line, the displayable
//! headers, and a pretty-printed body for each side of the exchange.

mod body;
mod exchange;
mod formatter;
mod headers;
pub mod highlight;
mod html;
mod record;

pub use body::{format_body, BINARY, EMPTY, UNKNOWN};
pub use exchange::{version_code, Body, CapturedRequest, CapturedResponse, RequestView, ResponseView};
pub use formatter::{protocol_label, TrafficFormatter};
pub use headers::{canonical_name, format_headers, header_value, HeaderList, IGNORE_HEADERS};
pub use highlight::{ContentKind, Highlighter, PlainHighlighter};
pub use record::{RecordedExchange, TrafficRecord};
