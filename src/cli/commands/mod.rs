//! CLI command implementations.

mod ask;
mod config;
mod format;

pub use ask::run_ask;
pub use config::run_config;
pub use format::run_format;
