//! Per-source tier: minimum-inter-arrival-time enforcement keyed by the
//! exact source address (§4.2, §3's "Per-source rate entry").

use crate::util::ShardedLru;

const PER_SOURCE_TABLE_CAPACITY: usize = 10_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

pub struct PerSourceLimiter {
    table: ShardedLru<u32, u64>,
}

impl PerSourceLimiter {
    pub fn new() -> Self {
        Self { table: ShardedLru::with_capacity(PER_SOURCE_TABLE_CAPACITY) }
    }

    /// `true` if at least `10^9 / limit` nanoseconds have elapsed since this
    /// source's last admitted packet. An absent entry always allows and
    /// inserts `now` (§4.2).
    pub fn check(&self, source_address: u32, limit: u32, now_ns: u64) -> bool {
        let min_interval_ns = NANOS_PER_SECOND / (limit.max(1) as u64);
        self.table.get_or_insert_with(
            source_address,
            || now_ns,
            |last_seen, is_new| {
                if is_new {
                    return true;
                }
                if now_ns.saturating_sub(*last_seen) >= min_interval_ns {
                    *last_seen = now_ns;
                    true
                } else {
                    false
                }
            },
        )
    }
}

impl Default for PerSourceLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_source_always_admits() {
        let limiter = PerSourceLimiter::new();
        assert!(limiter.check(1, 1_000, 0));
    }

    #[test]
    fn rejects_arrivals_faster_than_the_minimum_interval() {
        let limiter = PerSourceLimiter::new();
        assert!(limiter.check(1, 1_000, 0));
        // min interval is 1ms; arriving 1ns later must be rejected.
        assert!(!limiter.check(1, 1_000, 1));
        assert!(limiter.check(1, 1_000, 1_000_000));
    }
}
