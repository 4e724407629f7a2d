//! Heimdall - HTTP traffic logging for LLM API clients
//!
//! Captures the HTTP exchanges a chat-completion client makes and renders
//! them as readable dumps: status line, filtered headers, and a pretty-printed
//! body, optionally colourised for the terminal.
//!
//! # Architecture
//!
//! - `traffic` - Captured requests/responses and the traffic formatter
//! - `logging` - Tracing subscriber setup and the HTTP traffic layer
//! - `completion` - Chat completion client that logs its traffic
//! - `config` - Configuration management
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust
//! use heimdall::traffic::{CapturedRequest, CapturedResponse, TrafficFormatter, TrafficRecord};
//! use tracing::Level;
//!
//! let request = CapturedRequest::new("POST", "/v1/chat/completions")
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"model":"gpt-4o-mini","messages":[]}"#);
//! let response = CapturedResponse::new(11, 200, "OK")
//!     .with_header("Set-Cookie", "session=abc")
//!     .with_request(request);
//!
//! let record = TrafficRecord::new(Level::INFO, "chat completion").with_response(response);
//! let dump = TrafficFormatter::plain().format(&record);
//!
//! assert!(dump.contains("POST /v1/chat/completions HTTP/1.1"));
//! assert!(!dump.contains("Set-Cookie"));
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;
pub mod traffic;

pub use error::{HeimdallError, Result};
