// Swap status reconciler - polls a node until every swap reaches a verdict
//
// Round flow:
// 1. Snapshot the ids still pending (Unknown / ErrorResponse)
// 2. Query my_swap_status once per pending id
// 3. Classify each reply and apply it to the tracker
// 4. Stop when nothing is pending, otherwise sleep and start over
//
// Terminal ids (Success / Failed / NotFound) are never queried again.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};
use crate::rpc::traits::NodeRpc;
use crate::swap_status::aggregator::{summarize, BatchSummary};
use crate::swap_status::classifier::{classify, Classification};
use crate::swap_status::models::{SwapBatch, SwapId};
use crate::swap_status::policy::PollPolicy;
use crate::swap_status::tracker::{SwapProgress, SwapTracker};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    Converged,
    RoundLimitReached,
    DeadlineExceeded,
    Cancelled,
}

/// Final (or partial) state of a reconciliation
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    pub node: String,
    pub status: ReconcileStatus,
    pub rounds: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: BatchSummary,
    pub swaps: SwapBatch,
    #[serde(skip)]
    pub progress: Vec<SwapProgress>,
}

impl ReconcileOutcome {
    pub fn is_converged(&self) -> bool {
        self.status == ReconcileStatus::Converged
    }
}

pub struct SwapStatusReconciler {
    rpc: Arc<dyn NodeRpc>,
    policy: PollPolicy,
    cancel: Option<watch::Receiver<bool>>,
}

impl SwapStatusReconciler {
    pub fn new(rpc: Arc<dyn NodeRpc>, policy: PollPolicy) -> Self {
        Self {
            rpc,
            policy,
            cancel: None,
        }
    }

    /// Stop at the next suspension point once `true` is published
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Poll until every id holds a terminal verdict or a policy cap is hit
    #[instrument(skip(self, ids), fields(node = %self.rpc.endpoint(), swaps = ids.len()))]
    pub async fn reconcile(&self, ids: Vec<SwapId>) -> ReconcileOutcome {
        let started_at = Utc::now();
        let clock = Instant::now();
        let deadline = self.policy.deadline.map(|limit| clock + limit);
        let mut tracker = SwapTracker::new(ids);
        let mut rounds = 0u32;

        info!("🔄 Checking status of {} swaps", tracker.batch().len());

        let status = loop {
            if let Some(status) = self.stop_reason(&tracker, rounds, clock.elapsed()) {
                break status;
            }

            rounds += 1;
            self.poll_round(rounds, &mut tracker, deadline).await;

            if let Some(status) = self.stop_reason(&tracker, rounds, clock.elapsed()) {
                break status;
            }

            info!(
                "⏳ {} swaps unresolved after round {}, next check in {:?}",
                tracker.pending().len(),
                rounds,
                self.policy.round_interval
            );

            if !self.pause(self.policy.round_interval, deadline).await {
                break ReconcileStatus::Cancelled;
            }
        };

        let progress = tracker.progress();
        let swaps = tracker.into_batch();
        let summary = summarize(&swaps);

        match status {
            ReconcileStatus::Converged => info!(
                "✓ All {} swaps resolved after {} rounds ({} succeeded)",
                summary.total, rounds, summary.successes
            ),
            other => warn!(
                "⚠️ Stopped after {} rounds ({:?}) with {} swaps unresolved",
                rounds, other, summary.unresolved
            ),
        }

        ReconcileOutcome {
            node: self.rpc.endpoint().to_string(),
            status,
            rounds,
            started_at,
            finished_at: Utc::now(),
            summary,
            swaps,
            progress,
        }
    }

    fn stop_reason(
        &self,
        tracker: &SwapTracker,
        rounds: u32,
        elapsed: Duration,
    ) -> Option<ReconcileStatus> {
        if tracker.is_converged() {
            Some(ReconcileStatus::Converged)
        } else if self.is_cancelled() {
            Some(ReconcileStatus::Cancelled)
        } else if self.policy.round_limit_reached(rounds) {
            Some(ReconcileStatus::RoundLimitReached)
        } else if self.policy.deadline_passed(elapsed) {
            Some(ReconcileStatus::DeadlineExceeded)
        } else {
            None
        }
    }

    async fn poll_round(&self, round: u32, tracker: &mut SwapTracker, deadline: Option<Instant>) {
        let pending = tracker.pending();
        info!("--- Round {}: checking {} swaps ---", round, pending.len());

        let results: Vec<(SwapId, Option<Classification>)> = stream::iter(pending)
            .map(|id| async move {
                let classification = self.poll_one(&id, deadline).await;
                (id, classification)
            })
            .buffer_unordered(self.policy.concurrency.max(1))
            .collect()
            .await;

        let mut step = 0;
        for (id, classification) in results {
            // Not queried: the round was cut short
            let Some(classification) = classification else {
                continue;
            };
            step += 1;
            info!(
                "Check step {}: uuid {} -> {} event types: {:?}",
                step, id, classification.verdict, classification.events
            );
            tracker.apply_polled(u64::from(round), &id, classification);
        }
    }

    /// One status query. None when cancellation or the deadline came first.
    async fn poll_one(&self, id: &SwapId, deadline: Option<Instant>) -> Option<Classification> {
        if self.is_cancelled() || deadline.is_some_and(|at| Instant::now() >= at) {
            return None;
        }

        let response = match deadline {
            Some(at) => match timeout_at(at, self.rpc.my_swap_status(id.as_str())).await {
                Ok(response) => response,
                Err(_) => {
                    debug!("Deadline hit while querying {}", id);
                    return None;
                }
            },
            None => self.rpc.my_swap_status(id.as_str()).await,
        };
        let classification = classify(id, &response);

        // Keep an overloaded node from being hammered
        if classification.is_error() {
            self.pause(self.policy.error_cooldown, deadline).await;
        }

        Some(classification)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|cancel| *cancel.borrow())
            .unwrap_or(false)
    }

    /// Sleep for `duration`, never past `deadline`; false when cancelled first
    async fn pause(&self, duration: Duration, deadline: Option<Instant>) -> bool {
        let mut until = Instant::now() + duration;
        if let Some(deadline) = deadline {
            until = until.min(deadline);
        }

        let Some(cancel) = &self.cancel else {
            sleep_until(until).await;
            return true;
        };
        let mut cancel = cancel.clone();

        tokio::select! {
            _ = sleep_until(until) => true,
            cancelled = async { cancel.wait_for(|flag| *flag).await.is_ok() } => {
                if !cancelled {
                    // Sender dropped: nobody can cancel any more
                    sleep_until(until).await;
                }
                !cancelled
            }
        }
    }
}
