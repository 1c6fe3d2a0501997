//! Token Tracker (§4.4): bounds how many times a single connection token
//! fingerprint may be replayed, and from how long ago.

use crate::protocol::{AttackKind, MAX_TOKEN_AGE_NS};
use crate::util::ShardedLru;

const TOKEN_TABLE_CAPACITY: usize = 5_000;

/// A token is expected to be exercised at most this many times across the
/// initial OOB exchange; a 4th+ use indicates replay.
const MAX_USAGE_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy)]
struct TokenState {
    source_address: u32,
    first_seen_ns: u64,
    usage_count: u32,
}

pub struct TokenTracker {
    table: ShardedLru<u32, TokenState>,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self { table: ShardedLru::with_capacity(TOKEN_TABLE_CAPACITY) }
    }

    /// Validate a token fingerprint seen from `source_address` at `now_ns`.
    /// Returns `Ok(())` to accept or the [`AttackKind`] to log and reject on.
    pub fn check(
        &self,
        fingerprint: u32,
        source_address: u32,
        now_ns: u64,
    ) -> Result<(), AttackKind> {
        self.table.get_or_insert_with(
            fingerprint,
            || TokenState { source_address, first_seen_ns: now_ns, usage_count: 1 },
            |state, is_new| {
                if is_new {
                    return Ok(());
                }
                if state.source_address != source_address {
                    return Err(AttackKind::TokenReuse);
                }
                if state.usage_count >= MAX_USAGE_COUNT {
                    return Err(AttackKind::TokenReuse);
                }
                if now_ns.saturating_sub(state.first_seen_ns) > MAX_TOKEN_AGE_NS {
                    return Err(AttackKind::Replay);
                }
                state.usage_count += 1;
                Ok(())
            },
        )
    }
}

impl Default for TokenTracker {
    fn default() -> Self {
        Self::new()
    }
}
