use tracing::{debug, warn};
use crate::error::RpcError;
use crate::rpc::models::RawStatusResponse;
use crate::swap_status::models::{
    is_error_event, SwapId, SwapVerdict, SUCCESS_EVENT, SWAP_NOT_FOUND_SENTINEL,
};

/// Result of classifying one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: SwapVerdict,
    /// Event types seen before the scan stopped
    pub events: Vec<String>,
}

impl Classification {
    fn bare(verdict: SwapVerdict) -> Self {
        Self {
            verdict,
            events: Vec::new(),
        }
    }

    /// The poll failed and the id should cool down before the next query
    pub fn is_error(&self) -> bool {
        self.verdict == SwapVerdict::ErrorResponse
    }
}

/// Classify the outcome of one `my_swap_status` call
pub fn classify(id: &SwapId, response: &Result<RawStatusResponse, RpcError>) -> Classification {
    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Status query for {} failed: {}", id, e);
            return Classification::bare(SwapVerdict::ErrorResponse);
        }
    };

    match response {
        RawStatusResponse::ApplicationError(message) if message == SWAP_NOT_FOUND_SENTINEL => {
            debug!("Swap {} not recorded yet", id);
            Classification::bare(SwapVerdict::Unknown)
        }
        RawStatusResponse::ApplicationError(message) => {
            warn!("Error finding uuid {}: {}", id, message);
            Classification::bare(SwapVerdict::ErrorResponse)
        }
        RawStatusResponse::Malformed(detail) => {
            warn!("Swap not found, uuid {} ({})", id, detail);
            Classification::bare(SwapVerdict::NotFound)
        }
        RawStatusResponse::StatusResult(swap_events) => {
            let mut events = Vec::with_capacity(swap_events.len());
            let mut verdict = SwapVerdict::Unknown;

            for event in swap_events {
                let Some(event_type) = event.event_type.as_deref() else {
                    continue;
                };
                events.push(event_type.to_string());

                if is_error_event(event_type) {
                    verdict = SwapVerdict::failed(event_type, event.error_cause());
                    break;
                }
                if event_type == SUCCESS_EVENT {
                    verdict = SwapVerdict::Success;
                    break;
                }
            }

            match &verdict {
                SwapVerdict::Success => debug!("Swap success uuid {}", id),
                SwapVerdict::Failed(reason) => warn!("Swap failed uuid {}: {}", id, reason),
                _ => {}
            }

            Classification { verdict, events }
        }
    }
}
