use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========== SWAP STATUS ==========

/// One lifecycle event reported by `my_swap_status`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SwapEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl SwapEvent {
    #[cfg(test)]
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: Some(event_type.to_string()),
            data: None,
        }
    }

    #[cfg(test)]
    pub fn with_error(event_type: &str, error: &str) -> Self {
        Self {
            event_type: Some(event_type.to_string()),
            data: Some(serde_json::json!({ "error": error })),
        }
    }

    /// Error cause embedded in the event data, if any
    pub fn error_cause(&self) -> Option<&str> {
        self.data.as_ref()?.get("error")?.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    event: SwapEvent,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    events: Vec<EventEnvelope>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    result: StatusResult,
}

/// Node answer to a status query, decoded once at the RPC boundary
#[derive(Debug, Clone, PartialEq)]
pub enum RawStatusResponse {
    /// `{"error": "..."}` reply
    ApplicationError(String),
    /// Ordered lifecycle events from `result.events`
    StatusResult(Vec<SwapEvent>),
    /// Anything that does not have the expected shape
    Malformed(String),
}

impl RawStatusResponse {
    pub fn decode(value: Value) -> Self {
        if let Some(message) = application_error(&value) {
            return RawStatusResponse::ApplicationError(message);
        }

        match serde_json::from_value::<StatusEnvelope>(value) {
            Ok(envelope) => RawStatusResponse::StatusResult(
                envelope.result.events.into_iter().map(|e| e.event).collect(),
            ),
            Err(e) => RawStatusResponse::Malformed(e.to_string()),
        }
    }
}

/// Extract a non-empty `error` field from a reply
pub fn application_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ========== ORDERBOOK ==========

/// Order count snapshot for a base/rel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderbookDepth {
    pub numasks: u64,
    pub numbids: u64,
}

impl OrderbookDepth {
    pub fn amount(&self) -> u64 {
        self.numasks + self.numbids
    }
}

// ========== ELECTRUM ==========

/// Electrum server entry for the `electrum` activation call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElectrumServer {
    pub url: String,
    pub protocol: String,
    pub disable_cert_verification: bool,
}

impl ElectrumServer {
    pub fn tcp(url: &str) -> Self {
        Self {
            url: url.to_string(),
            protocol: "TCP".to_string(),
            disable_cert_verification: true,
        }
    }
}
