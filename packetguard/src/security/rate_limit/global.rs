//! Global tier: a single tumbling-window counter shared by every packet
//! regardless of source (§4.2, the data model's "never evicted" singleton).

use parking_lot::Mutex;

const WINDOW_NS: u64 = 1_000_000_000;

struct Window {
    start_ns: u64,
    count: u64,
}

pub struct GlobalLimiter {
    window: Mutex<Window>,
}

impl GlobalLimiter {
    pub fn new() -> Self {
        Self { window: Mutex::new(Window { start_ns: 0, count: 0 }) }
    }

    /// `true` if this packet is admitted under the current window.
    ///
    /// `limit` is read from the live [`crate::config::Config`] on every call
    /// rather than captured once at construction, so a control-plane reload
    /// of `global_limit` takes effect on the very next packet, the same way
    /// the subnet and per-source tiers already pick up their limits fresh
    /// from the config snapshot each packet.
    pub fn check(&self, limit: u32, now_ns: u64) -> bool {
        let mut window = self.window.lock();
        if now_ns.saturating_sub(window.start_ns) > WINDOW_NS {
            window.start_ns = now_ns;
            window.count = 1;
            return true;
        }
        window.count += 1;
        window.count <= limit as u64
    }
}

impl Default for GlobalLimiter {
    fn default() -> Self {
        Self::new()
    }
}
