pub mod shard_map;

pub use shard_map::ShardedLru;

/// Monotonic nanosecond clock used throughout the filter.
///
/// A thin wrapper over [`std::time::Instant`] so call sites read `now_ns()`
/// the way the original BPF program reads `bpf_ktime_get_ns()`, and so a
/// single place can be swapped for an injectable clock if tests ever need
/// one beyond the relative-time tricks already used in `tests/`.
pub fn now_ns() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}
