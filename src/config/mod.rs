//! Configuration module for Heimdall.
//!
//! Handles loading and saving the TOML settings file.

mod settings;

pub use settings::{LogFormat, LoggingSettings, OpenAiSettings, Settings, API_KEY_ENV};
