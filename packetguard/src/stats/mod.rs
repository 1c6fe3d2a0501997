//! Statistics Tables (§4.9): the eight rejection/acceptance counters and a
//! performance record, updated on every pipeline invocation including early
//! exits.
//!
//! The original BPF program gets per-CPU counters for free from
//! `BPF_MAP_TYPE_PERCPU_ARRAY`. This userspace port has no such isolation,
//! so every counter is a plain `Atomic*` updated with `Ordering::Relaxed`:
//! cheap, lock-free, and sufficient because (§8) no invariant depends on
//! exact cross-counter ordering, only approximate totals (`passed` matching
//! the count of FORWARD verdicts "to within... aggregation skew").

mod perf;

pub use perf::{PerfSnapshot, PerfStats};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::protocol::AttackKind;

/// The eight rejection/acceptance counters plus the performance record.
#[derive(Debug, Default)]
pub struct Counters {
    dropped: AtomicU64,
    passed: AtomicU64,
    invalid_protocol: AtomicU64,
    rate_limited: AtomicU64,
    token_violations: AtomicU64,
    sequence_violations: AtomicU64,
    state_violations: AtomicU64,
    checksum_failures: AtomicU64,
    pub perf: PerfStats,
}

/// A point-in-time read of every counter, for consumers that aggregate
/// across a fleet of filter instances (§6: "read-only snapshots...
/// consumers aggregate").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub dropped: u64,
    pub passed: u64,
    pub invalid_protocol: u64,
    pub rate_limited: u64,
    pub token_violations: u64,
    pub sequence_violations: u64,
    pub state_violations: u64,
    pub checksum_failures: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_passed(&self) {
        self.passed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the counter bucket a given [`AttackKind`] maps to, and the
    /// aggregate `dropped` counter alongside it (§7: "every rejection
    /// increments the relevant counter").
    pub fn record_attack(&self, kind: AttackKind) {
        self.record_dropped();
        let counter = match kind {
            AttackKind::RateLimit => &self.rate_limited,
            AttackKind::InvalidProtocol => &self.invalid_protocol,
            AttackKind::Replay => &self.token_violations,
            AttackKind::StateViolation => &self.state_violations,
            AttackKind::ChecksumFail => &self.checksum_failures,
            AttackKind::SizeViolation => &self.invalid_protocol,
            AttackKind::SequenceAnomaly => &self.sequence_violations,
            AttackKind::TokenReuse => &self.token_violations,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dropped: self.dropped.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            invalid_protocol: self.invalid_protocol.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            token_violations: self.token_violations.load(Ordering::Relaxed),
            sequence_violations: self.sequence_violations.load(Ordering::Relaxed),
            state_violations: self.state_violations.load(Ordering::Relaxed),
            checksum_failures: self.checksum_failures.load(Ordering::Relaxed),
        }
    }
}
