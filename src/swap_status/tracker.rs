use std::collections::HashMap;
use tracing::debug;
use crate::swap_status::classifier::Classification;
use crate::swap_status::models::{SwapBatch, SwapId, SwapVerdict};

/// What `apply` did with a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Updated,
    Unchanged,
    /// The id already holds a terminal verdict
    Terminal,
    /// A newer round was already applied for the id
    Stale,
    UnknownId,
}

#[derive(Debug, Clone, Default)]
struct PollRecord {
    last_round: u64,
    polls: u32,
    last_events: Vec<String>,
}

/// Per-swap progress for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapProgress {
    pub id: SwapId,
    pub verdict: SwapVerdict,
    pub polls: u32,
    pub last_events: Vec<String>,
}

/// Owns the batch and decides which ids still need polling
pub struct SwapTracker {
    batch: SwapBatch,
    order: Vec<SwapId>,
    records: HashMap<SwapId, PollRecord>,
}

impl SwapTracker {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = SwapId>,
    {
        let mut order = Vec::new();
        let mut records = HashMap::new();
        for id in ids {
            if !records.contains_key(&id) {
                records.insert(id.clone(), PollRecord::default());
                order.push(id);
            }
        }

        Self {
            batch: SwapBatch::seeded(order.iter().cloned()),
            order,
            records,
        }
    }

    /// Fresh snapshot of ids still at `Unknown` or `ErrorResponse`, seed order
    pub fn pending(&self) -> Vec<SwapId> {
        self.order
            .iter()
            .filter(|id| {
                self.batch
                    .get(id)
                    .map(|verdict| !verdict.is_terminal())
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn is_converged(&self) -> bool {
        self.pending().is_empty()
    }

    /// Overwrite the verdict of a non-terminal id
    pub fn apply(&mut self, id: &SwapId, verdict: SwapVerdict) -> ApplyOutcome {
        let Some(slot) = self.batch.slot_mut(id) else {
            return ApplyOutcome::UnknownId;
        };

        if slot.is_terminal() {
            debug!("Ignoring {} for {}: already {}", verdict, id, slot);
            return ApplyOutcome::Terminal;
        }
        if *slot == verdict {
            return ApplyOutcome::Unchanged;
        }

        *slot = verdict;
        ApplyOutcome::Updated
    }

    /// Apply the classification of the poll issued in `round`
    pub fn apply_polled(
        &mut self,
        round: u64,
        id: &SwapId,
        classification: Classification,
    ) -> ApplyOutcome {
        let Some(record) = self.records.get_mut(id) else {
            return ApplyOutcome::UnknownId;
        };

        if round < record.last_round {
            debug!(
                "Dropping stale poll for {} (round {} < {})",
                id, round, record.last_round
            );
            return ApplyOutcome::Stale;
        }

        record.last_round = round;
        record.polls += 1;
        record.last_events = classification.events;

        self.apply(id, classification.verdict)
    }

    #[cfg(test)]
    pub fn verdict(&self, id: &SwapId) -> Option<&SwapVerdict> {
        self.batch.get(id)
    }

    pub fn progress(&self) -> Vec<SwapProgress> {
        self.order
            .iter()
            .filter_map(|id| {
                let record = self.records.get(id)?;
                Some(SwapProgress {
                    id: id.clone(),
                    verdict: self.batch.get(id)?.clone(),
                    polls: record.polls,
                    last_events: record.last_events.clone(),
                })
            })
            .collect()
    }

    pub fn batch(&self) -> &SwapBatch {
        &self.batch
    }

    pub fn into_batch(self) -> SwapBatch {
        self.batch
    }
}
