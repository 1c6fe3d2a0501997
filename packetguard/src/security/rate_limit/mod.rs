//! Hierarchical Rate Limiter (§4.2): global, per-/24-subnet, and per-source
//! tiers evaluated in that order, each an independent admission gate.
//!
//! The original filter estimates these counts with a Count-Min Sketch-style
//! approximation; this implementation uses exact tumbling-window counters
//! and exact per-source last-seen timestamps instead, because §8's
//! invariants bound *exact* admission counts ("never admits more than
//! `limit` packets over any one-second window") rather than approximate
//! ones. Exactness costs one table entry per distinct source/subnet instead
//! of a fixed sketch width; the sharded LRU tables in [`crate::util`] keep
//! that bounded the same way every other tracker in this crate is bounded.

mod global;
mod per_source;
mod subnet;

pub use global::GlobalLimiter;
pub use per_source::PerSourceLimiter;
pub use subnet::SubnetLimiter;

/// The three-tier gate. All three must admit for a packet to pass.
pub struct RateLimiter {
    global: GlobalLimiter,
    subnet: SubnetLimiter,
    per_source: PerSourceLimiter,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            global: GlobalLimiter::new(),
            subnet: SubnetLimiter::new(),
            per_source: PerSourceLimiter::new(),
        }
    }

    /// Evaluate all three tiers in order, short-circuiting on the first
    /// rejection (§4.2: "a rejection at any tier ... causes the pipeline to
    /// DROP"). All three limits are read from the live config snapshot on
    /// every call, so a control-plane reload takes effect on the next packet
    /// for every tier alike.
    pub fn admit(
        &self,
        source_address: u32,
        global_limit: u32,
        subnet_limit: u32,
        per_source_limit: u32,
        now_ns: u64,
    ) -> bool {
        self.global.check(global_limit, now_ns)
            && self.subnet.check(source_address, subnet_limit, now_ns)
            && self.per_source.check(source_address, per_source_limit, now_ns)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
