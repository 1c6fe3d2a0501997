use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::config::Config;

/// The single-slot configuration record the pipeline reads on every packet.
///
/// Backed by [`ArcSwap`] rather than a `RwLock`: the control plane writes
/// rarely (once at startup, occasionally on reload) while every packet on
/// every processing context reads, so readers must never block on a writer
/// and vice versa. This is the same lock-free-reader shape the original BPF
/// program gets for free from a single-entry `BPF_MAP_TYPE_ARRAY`.
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<Config>,
}

impl ConfigStore {
    /// Create a store seeded with `config`.
    pub fn new(config: Config) -> Self {
        Self { current: ArcSwap::from_pointee(config) }
    }

    /// Read the current configuration. Cheap: an atomic load plus a refcount bump.
    pub fn get(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Install a new configuration, replacing the previous one.
    ///
    /// Called by the control plane, never by the fast path.
    pub fn set(&self, config: Config) {
        info!(
            server_port = config.server_port,
            per_source_limit = config.per_source_limit,
            global_limit = config.global_limit,
            subnet_limit = config.subnet_limit,
            "configuration updated"
        );
        self.current.store(Arc::new(config));
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bit_for_bit() {
        let cfg = Config::medium(0x0a000001);
        let store = ConfigStore::new(cfg);
        assert_eq!(*store.get(), cfg);
    }

    #[test]
    fn set_replaces_the_record() {
        let store = ConfigStore::new(Config::small(0));
        assert_eq!(store.get().server_port, 30120);
        store.set(Config::large(0x7f000001));
        let after = store.get();
        assert_eq!(after.target_address, 0x7f000001);
        assert_eq!(after.per_source_limit, 2_000);
    }
}
