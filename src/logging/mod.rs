//! Logging setup.
//!
//! Console output goes to stderr in one of four formats (see [`LogFormat`]).
//! HTTP traffic is logged on its own target, [`HTTP_TARGET`], which never
//! reaches the console layer. When `log_http` is enabled a dedicated
//! [`HttpTrafficLayer`] dumps those events; otherwise they are discarded.

mod http_layer;
#[cfg(test)]
mod testing;

pub use crate::config::LogFormat;
pub use http_layer::{log_exchange, HttpTrafficLayer};

use crate::config::LoggingSettings;
use crate::error::{HeimdallError, Result};
use crate::traffic::{highlight, Highlighter, TrafficFormatter};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::filter::{filter_fn, Targets};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Target for HTTP request/response events.
pub const HTTP_TARGET: &str = "_http";

const VERBOSE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Parse a level name, accepting `warning` as an alias for `warn`.
pub fn parse_level(level: &str) -> Result<Level> {
    let level = match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    };
    Level::from_str(&level).map_err(|_| HeimdallError::Config(format!("Unknown log level: {}", level)))
}

/// The configured level, raised by `-v` (debug) and `-vv` (trace).
pub fn effective_level(settings: &LoggingSettings, verbosity: u8) -> Result<Level> {
    let configured = parse_level(&settings.level)?;
    Ok(match verbosity {
        0 => configured,
        1 => configured.max(Level::DEBUG),
        _ => Level::TRACE,
    })
}

fn console_layer<W>(format: LogFormat, highlighter: &'static dyn Highlighter, make_writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Verbose => fmt::layer()
            .with_writer(make_writer)
            .with_timer(ChronoLocal::new(VERBOSE_TIME_FORMAT.to_string()))
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Simple => fmt::layer()
            .with_writer(make_writer)
            .without_time()
            .with_target(false)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(make_writer)
            .with_timer(ChronoLocal::rfc_3339())
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .boxed(),
        LogFormat::Http => {
            HttpTrafficLayer::new(TrafficFormatter::new(highlighter), make_writer).boxed()
        }
    }
}

/// Build the layer stack for the given settings.
///
/// Console events go to `console_writer`, HTTP traffic to `http_writer`.
/// `RUST_LOG`, when set, replaces the console filter.
pub fn build_layers<C, H>(
    settings: &LoggingSettings,
    verbosity: u8,
    highlighter: &'static dyn Highlighter,
    console_writer: C,
    http_writer: H,
) -> Result<Vec<BoxedLayer>>
where
    C: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    H: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = effective_level(settings, verbosity)?;
    let directive = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string().to_lowercase());
    let env_filter = EnvFilter::try_new(&directive)
        .map_err(|e| HeimdallError::Config(format!("Invalid log filter '{}': {}", directive, e)))?;

    let mut layers = vec![console_layer(settings.format, highlighter, console_writer)
        .with_filter(env_filter)
        .with_filter(filter_fn(|metadata| metadata.target() != HTTP_TARGET))
        .boxed()];

    if settings.log_http {
        layers.push(
            HttpTrafficLayer::new(TrafficFormatter::new(highlighter), http_writer)
                .with_filter(Targets::new().with_target(HTTP_TARGET, level))
                .boxed(),
        );
    }

    Ok(layers)
}

/// Install the global subscriber.
pub fn init(settings: &LoggingSettings, verbosity: u8) -> Result<()> {
    let colors = console::Term::stderr().features().colors_supported();
    let highlighter = highlight::install(settings.highlight && colors);

    let layers = build_layers(
        settings,
        verbosity,
        highlighter,
        std::io::stderr,
        std::io::stderr,
    )?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| HeimdallError::Config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(
        format = %settings.format,
        log_http = settings.log_http,
        highlighter = highlighter.name(),
        "Logging initialized"
    );
    Ok(())
}
