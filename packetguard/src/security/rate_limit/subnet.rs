//! Per-/24-subnet tier: a tumbling-window counter keyed by the source
//! address masked to its /24 (§4.2, §3's "Subnet rate entry").

use crate::util::ShardedLru;

const WINDOW_NS: u64 = 1_000_000_000;
const SUBNET_TABLE_CAPACITY: usize = 1_024;

fn subnet_of(addr: u32) -> u32 {
    addr & 0xFFFF_FF00
}

struct SubnetWindow {
    start_ns: u64,
    count: u32,
}

pub struct SubnetLimiter {
    table: ShardedLru<u32, SubnetWindow>,
}

impl SubnetLimiter {
    pub fn new() -> Self {
        Self { table: ShardedLru::with_capacity(SUBNET_TABLE_CAPACITY) }
    }

    /// `true` if `source_address`'s /24 has not yet exceeded `limit` this
    /// window. A subnet entry is created on first hit with counter 1
    /// (§4.2), so the first packet from any subnet is always admitted.
    pub fn check(&self, source_address: u32, limit: u32, now_ns: u64) -> bool {
        let key = subnet_of(source_address);
        self.table.get_or_insert_with(
            key,
            || SubnetWindow { start_ns: now_ns, count: 1 },
            |window, is_new| {
                if is_new {
                    return true;
                }
                if now_ns.saturating_sub(window.start_ns) > WINDOW_NS {
                    window.start_ns = now_ns;
                    window.count = 1;
                    return true;
                }
                window.count += 1;
                window.count <= limit
            },
        )
    }
}

impl Default for SubnetLimiter {
    fn default() -> Self {
        Self::new()
    }
}
