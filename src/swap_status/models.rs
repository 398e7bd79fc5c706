use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Application error returned while the daemon has not written the swap yet
pub const SWAP_NOT_FOUND_SENTINEL: &str = "swap data is not found";

/// Event type closing a successful swap
pub const SUCCESS_EVENT: &str = "Finished";

/// Event types that end a swap unsuccessfully.
/// Refunds are listed here as well: a refunded swap did not trade.
pub const ERROR_EVENTS: [&str; 11] = [
    "StartFailed",
    "NegotiateFailed",
    "TakerFeeValidateFailed",
    "MakerPaymentTransactionFailed",
    "MakerPaymentDataSendFailed",
    "TakerPaymentValidateFailed",
    "TakerPaymentSpendFailed",
    "MakerPaymentRefunded",
    "MakerPaymentRefundFailed",
    "MakerPaymentValidateFailed",
    "TakerFeeSendFailed",
];

pub fn is_error_event(event_type: &str) -> bool {
    ERROR_EVENTS.contains(&event_type)
}

/// Identifier of one swap attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapId(String);

impl SwapId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SwapId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SwapId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Why a swap was classified as failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailureReason {
    pub fn is_refund(&self) -> bool {
        self.event == "MakerPaymentRefunded"
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "event: {} error: {}", self.event, error),
            None => write!(f, "event: {}", self.event),
        }
    }
}

/// Current determination of a swap's outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SwapVerdict {
    Unknown,
    Success,
    Failed(FailureReason),
    NotFound,
    /// Last poll returned an error; polled again next round
    ErrorResponse,
}

impl SwapVerdict {
    pub fn failed(event: &str, error: Option<&str>) -> Self {
        SwapVerdict::Failed(FailureReason {
            event: event.to_string(),
            error: error.map(str::to_string),
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapVerdict::Success | SwapVerdict::Failed(_) | SwapVerdict::NotFound
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SwapVerdict::Unknown => "unknown",
            SwapVerdict::Success => "success",
            SwapVerdict::Failed(_) => "failed",
            SwapVerdict::NotFound => "not_found",
            SwapVerdict::ErrorResponse => "error_response",
        }
    }
}

impl fmt::Display for SwapVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapVerdict::Failed(reason) => write!(f, "failed, {}", reason),
            other => f.write_str(other.label()),
        }
    }
}

/// Verdict per swap id. Entries are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SwapBatch {
    verdicts: HashMap<SwapId, SwapVerdict>,
}

impl SwapBatch {
    pub fn seeded<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = SwapId>,
    {
        Self {
            verdicts: ids
                .into_iter()
                .map(|id| (id, SwapVerdict::Unknown))
                .collect(),
        }
    }

    pub fn get(&self, id: &SwapId) -> Option<&SwapVerdict> {
        self.verdicts.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SwapId, &SwapVerdict)> {
        self.verdicts.iter()
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub(crate) fn slot_mut(&mut self, id: &SwapId) -> Option<&mut SwapVerdict> {
        self.verdicts.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_verdicts() {
        assert!(!SwapVerdict::Unknown.is_terminal());
        assert!(!SwapVerdict::ErrorResponse.is_terminal());
        assert!(SwapVerdict::Success.is_terminal());
        assert!(SwapVerdict::NotFound.is_terminal());
        assert!(SwapVerdict::failed("NegotiateFailed", None).is_terminal());
    }

    #[test]
    fn test_failure_display() {
        let verdict = SwapVerdict::failed("TakerFeeSendFailed", Some("insufficient funds"));
        assert_eq!(
            verdict.to_string(),
            "failed, event: TakerFeeSendFailed error: insufficient funds"
        );
        assert_eq!(SwapVerdict::NotFound.to_string(), "not_found");
    }

    #[test]
    fn test_refund_is_flagged() {
        match SwapVerdict::failed("MakerPaymentRefunded", None) {
            SwapVerdict::Failed(reason) => assert!(reason.is_refund()),
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_value(SwapVerdict::failed("StartFailed", Some("no balance"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "failed", "event": "StartFailed", "error": "no balance"})
        );
        assert_eq!(
            serde_json::to_value(SwapVerdict::Success).unwrap(),
            serde_json::json!({"status": "success"})
        );
    }

    #[test]
    fn test_seeded_batch_collapses_duplicates() {
        let batch = SwapBatch::seeded(["a", "b", "a"].into_iter().map(SwapId::from));
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|(_, v)| *v == SwapVerdict::Unknown));
    }
}
