//! Performance record: packet count, cumulative/peak processing time, and an
//! exponentially-weighted moving average of packet size (§4.9).

use std::sync::atomic::{AtomicU64, Ordering};

/// EWMA weight: new samples count for 1/8, history for 7/8, matching the
/// original's integer-only `(old * 7 + new) / 8` smoothing.
const EWMA_WEIGHT_SHIFT: u64 = 3;

#[derive(Debug, Default)]
pub struct PerfStats {
    packet_count: AtomicU64,
    total_processing_ns: AtomicU64,
    peak_processing_ns: AtomicU64,
    avg_packet_size: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerfSnapshot {
    pub packet_count: u64,
    pub total_processing_ns: u64,
    pub peak_processing_ns: u64,
    pub avg_packet_size: u64,
}

impl PerfStats {
    /// Record one packet's processing duration and size.
    ///
    /// Called unconditionally at the end of [`crate::pipeline::Pipeline::process`],
    /// regardless of the verdict reached, so the average reflects true
    /// pipeline load rather than only admitted traffic.
    pub fn record(&self, elapsed_ns: u64, packet_len: usize) {
        self.packet_count.fetch_add(1, Ordering::Relaxed);
        self.total_processing_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
        self.peak_processing_ns.fetch_max(elapsed_ns, Ordering::Relaxed);

        let new_sample = packet_len as u64;
        let _ = self.avg_packet_size.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |old| {
                let weighted = (old * ((1 << EWMA_WEIGHT_SHIFT) - 1) + new_sample)
                    >> EWMA_WEIGHT_SHIFT;
                Some(weighted)
            },
        );
    }

    pub fn snapshot(&self) -> PerfSnapshot {
        PerfSnapshot {
            packet_count: self.packet_count.load(Ordering::Relaxed),
            total_processing_ns: self.total_processing_ns.load(Ordering::Relaxed),
            peak_processing_ns: self.peak_processing_ns.load(Ordering::Relaxed),
            avg_packet_size: self.avg_packet_size.load(Ordering::Relaxed),
        }
    }
}
