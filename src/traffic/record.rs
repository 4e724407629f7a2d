//! Log records that may carry an HTTP exchange.

use super::exchange::{CapturedRequest, CapturedResponse};
use crate::error::{HeimdallError, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::str::FromStr;
use tracing::Level;

/// One logging event, optionally with the request and response it is about.
#[derive(Debug, Clone)]
pub struct TrafficRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
    pub request: Option<CapturedRequest>,
    pub response: Option<CapturedResponse>,
}

impl TrafficRecord {
    pub fn new(level: Level, message: &str) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            target: crate::logging::HTTP_TARGET.to_string(),
            message: message.to_string(),
            request: None,
            response: None,
        }
    }

    pub fn with_request(mut self, request: CapturedRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_response(mut self, response: CapturedResponse) -> Self {
        self.response = Some(response);
        self
    }
}

/// An exchange saved to disk, as read by `heimdall format`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordedExchange {
    pub message: String,
    pub level: Option<String>,
    pub timestamp: Option<DateTime<Local>>,
    pub request: Option<CapturedRequest>,
    pub response: Option<CapturedResponse>,
}

impl RecordedExchange {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn into_record(self) -> Result<TrafficRecord> {
        let level = match self.level.as_deref() {
            Some(level) => Level::from_str(level)
                .map_err(|_| HeimdallError::InvalidInput(format!("Unknown log level: {}", level)))?,
            None => Level::INFO,
        };

        let mut record = TrafficRecord::new(level, &self.message);
        if let Some(timestamp) = self.timestamp {
            record.timestamp = timestamp;
        }
        record.request = self.request;
        record.response = self.response;
        Ok(record)
    }
}
