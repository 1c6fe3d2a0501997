//! Attack Log (§3, §4.9): a fixed-size, lossy record of recent rejections,
//! keyed by a hash of the offending source so a repeated attacker overwrites
//! their own prior entry rather than growing the table.
//!
//! This mirrors the original's `BPF_MAP_TYPE_HASH` sized to exactly 1000
//! buckets with no eviction policy beyond "last write wins on collision" —
//! deliberately lossy, since the log is a diagnostic aid, not an audit
//! trail (§9, resolved open question: kept as-is, with `tracing::debug!`
//! added so a collocated log collector gets every entry even though the
//! in-memory table does not).

use parking_lot::Mutex;

use crate::protocol::AttackKind;

const ATTACK_LOG_BUCKETS: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct AttackLogEntry {
    pub source_address: u32,
    pub kind: AttackKind,
    pub timestamp_ns: u64,
}

pub struct AttackLog {
    buckets: Mutex<Box<[Option<AttackLogEntry>]>>,
}

impl AttackLog {
    pub fn new() -> Self {
        Self { buckets: Mutex::new(vec![None; ATTACK_LOG_BUCKETS].into_boxed_slice()) }
    }

    fn bucket_for(source_address: u32, timestamp_ns: u64) -> usize {
        let epoch_high = (timestamp_ns >> 32) as u32;
        ((source_address ^ epoch_high) as usize) % ATTACK_LOG_BUCKETS
    }

    /// Record a rejection, overwriting whatever previously occupied this
    /// source's bucket. Always emits a `tracing::debug!` regardless of
    /// whether the in-memory slot was free.
    pub fn record(&self, source_address: u32, kind: AttackKind, timestamp_ns: u64) {
        tracing::debug!(
            source_address,
            kind = kind.as_str(),
            timestamp_ns,
            "attack log entry"
        );
        let idx = Self::bucket_for(source_address, timestamp_ns);
        self.buckets.lock()[idx] =
            Some(AttackLogEntry { source_address, kind, timestamp_ns });
    }

    pub fn get(&self, source_address: u32, timestamp_ns: u64) -> Option<AttackLogEntry> {
        let idx = Self::bucket_for(source_address, timestamp_ns);
        self.buckets.lock()[idx]
    }
}

impl Default for AttackLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_retrieves_an_entry() {
        let log = AttackLog::new();
        log.record(0x0a00_0001, AttackKind::RateLimit, 1_000);
        let entry = log.get(0x0a00_0001, 1_000).expect("entry present");
        assert_eq!(entry.source_address, 0x0a00_0001);
        assert_eq!(entry.kind, AttackKind::RateLimit);
    }

    #[test]
    fn colliding_source_overwrites_prior_entry() {
        let log = AttackLog::new();
        // Same bucket index (timestamp epoch-high term is 0 for both).
        let a = 7u32;
        let b = a + ATTACK_LOG_BUCKETS as u32;
        log.record(a, AttackKind::RateLimit, 0);
        log.record(b, AttackKind::ChecksumFail, 0);
        let entry = log.get(a, 0).expect("bucket occupied");
        assert_eq!(entry.source_address, b);
        assert_eq!(entry.kind, AttackKind::ChecksumFail);
    }
}
