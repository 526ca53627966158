//! Domain services: pure scheduling rules.

use rand::Rng;

use super::SchedulingParams;

/// Random forward delay, uniform over the inclusive window.
pub fn forward_delay<R: Rng>(params: &SchedulingParams, rng: &mut R) -> u64 {
    rng.gen_range(params.min_forward_delay_ms..=params.max_forward_delay_ms)
}

/// Whether a transaction issued at `issuance_ms` is too far from `now_ms`
/// to be worth forwarding: more than 90% of the tolerance either way.
pub fn is_stale(issuance_ms: i64, now_ms: u64, tolerance_ms: u64) -> bool {
    let drift = (i128::from(issuance_ms) - i128::from(now_ms)).unsigned_abs();
    drift * 10 > u128::from(tolerance_ms) * 9
}

/// How long the sender may sleep: until the next task is due (at least
/// 1 ms), or a whole round when nothing is queued.
pub fn wait_timeout_ms(next_due: Option<u64>, now_ms: u64, round_duration_ms: u64) -> u64 {
    match next_due {
        Some(due) => due.saturating_sub(now_ms).max(1),
        None => round_duration_ms,
    }
}
