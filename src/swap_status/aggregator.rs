use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use crate::swap_status::models::{SwapBatch, SwapVerdict};

/// Minimum observed/expected ratio for a saturated order book
pub const SATURATION_ACCEPTANCE: Decimal = dec!(0.95);

/// Counts over a finished or partially finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successes: usize,
    pub failed: usize,
    pub refunded: usize,
    pub not_found: usize,
    pub unresolved: usize,
}

pub fn total(batch: &SwapBatch) -> usize {
    batch.len()
}

pub fn successes(batch: &SwapBatch) -> usize {
    batch
        .iter()
        .filter(|(_, verdict)| **verdict == SwapVerdict::Success)
        .count()
}

pub fn summarize(batch: &SwapBatch) -> BatchSummary {
    let mut summary = BatchSummary {
        total: total(batch),
        successes: successes(batch),
        ..Default::default()
    };

    for (_, verdict) in batch.iter() {
        match verdict {
            SwapVerdict::Success => {}
            SwapVerdict::Failed(reason) => {
                summary.failed += 1;
                if reason.is_refund() {
                    summary.refunded += 1;
                }
            }
            SwapVerdict::NotFound => summary.not_found += 1,
            SwapVerdict::Unknown | SwapVerdict::ErrorResponse => summary.unresolved += 1,
        }
    }

    summary
}

/// True when the smaller count is at least 95% of the larger one.
/// Two empty counts are not saturated.
pub fn saturation_ratio(a: u64, b: u64) -> bool {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    if max == 0 {
        return false;
    }

    Decimal::from(min) / Decimal::from(max) >= SATURATION_ACCEPTANCE
}
