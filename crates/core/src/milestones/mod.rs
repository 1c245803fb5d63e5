//! Milestone signal: detects when a goal's progress crosses a threshold.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// Celebrated progress thresholds, in percent of target.
pub const MILESTONE_THRESHOLDS: [u32; 4] = [25, 50, 75, 100];

/// Reports the first threshold crossed by moving `current_amount` from `old`
/// to `new` against `target`.
///
/// Percentages are integer floor divisions. At most one threshold is reported
/// per call: the first match in ascending order, so a single deposit jumping
/// across two thresholds reports only the lower one. A non-positive target
/// never signals.
pub fn crossed_milestone(target: Decimal, old: Decimal, new: Decimal) -> Option<u32> {
    if target <= Decimal::ZERO {
        return None;
    }
    let old_pct = floor_percentage(old, target);
    let new_pct = floor_percentage(new, target);
    MILESTONE_THRESHOLDS
        .iter()
        .copied()
        .find(|&threshold| old_pct < threshold as i64 && new_pct >= threshold as i64)
}

fn floor_percentage(amount: Decimal, target: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED / target)
        .floor()
        .to_i64()
        .unwrap_or(0)
}
