//! Tracing layer that writes HTTP traffic dumps.

use super::HTTP_TARGET;
use crate::traffic::{CapturedRequest, CapturedResponse, TrafficFormatter, TrafficRecord};
use chrono::Local;
use std::fmt::Debug;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};

/// Log an HTTP exchange on the traffic target.
///
/// The captures travel as JSON fields on the event and are only serialised
/// when the target is enabled.
pub fn log_exchange(
    level: Level,
    message: &str,
    request: Option<&CapturedRequest>,
    response: Option<&CapturedResponse>,
) {
    macro_rules! emit {
        ($lvl:expr) => {
            if tracing::enabled!(target: HTTP_TARGET, $lvl) {
                let request = request.and_then(|r| serde_json::to_string(r).ok());
                let response = response.and_then(|r| serde_json::to_string(r).ok());
                tracing::event!(
                    target: HTTP_TARGET,
                    $lvl,
                    request = request.as_deref(),
                    response = response.as_deref(),
                    "{}",
                    message
                );
            }
        };
    }

    match level {
        Level::ERROR => emit!(Level::ERROR),
        Level::WARN => emit!(Level::WARN),
        Level::INFO => emit!(Level::INFO),
        Level::DEBUG => emit!(Level::DEBUG),
        _ => emit!(Level::TRACE),
    }
}

/// Collects the message, the serialised captures, and any other fields.
#[derive(Default)]
struct ExchangeVisitor {
    message: String,
    request: Option<String>,
    response: Option<String>,
    extra: Vec<String>,
}

impl Visit for ExchangeVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "request" => self.request = Some(value.to_string()),
            "response" => self.response = Some(value.to_string()),
            name => self.extra.push(format!("{}={}", name, value)),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "request" => self.request = Some(format!("{:?}", value)),
            "response" => self.response = Some(format!("{:?}", value)),
            name => self.extra.push(format!("{}={:?}", name, value)),
        }
    }
}

impl ExchangeVisitor {
    fn into_record(self, level: Level, target: &str) -> TrafficRecord {
        let mut message = self.message;
        for field in self.extra {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(&field);
        }

        // Malformed captures are dropped rather than failing the event.
        TrafficRecord {
            timestamp: Local::now(),
            level,
            target: target.to_string(),
            message,
            request: self.request.and_then(|json| serde_json::from_str(&json).ok()),
            response: self.response.and_then(|json| serde_json::from_str(&json).ok()),
        }
    }
}

/// Formats every event it sees with [`TrafficFormatter`].
///
/// Pair it with a per-layer filter to restrict it to [`HTTP_TARGET`].
pub struct HttpTrafficLayer<W> {
    formatter: TrafficFormatter,
    make_writer: W,
}

impl<W> HttpTrafficLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    pub fn new(formatter: TrafficFormatter, make_writer: W) -> Self {
        Self {
            formatter,
            make_writer,
        }
    }
}

impl<S, W> Layer<S> for HttpTrafficLayer<W>
where
    S: Subscriber,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = ExchangeVisitor::default();
        event.record(&mut visitor);

        let record = visitor.into_record(*metadata.level(), metadata.target());
        let mut output = self.formatter.format(&record);
        if !output.ends_with('\n') {
            output.push('\n');
        }

        let mut writer = self.make_writer.make_writer_for(metadata);
        if let Err(e) = writer.write_all(output.as_bytes()) {
            eprintln!(
                "[heimdall] Unable to write an HTTP traffic event to the writer! Error: {}",
                e
            );
        }
    }
}
