//! Exposes a [`StatsSnapshot`]/[`PerfSnapshot`] pair as `prometheus` gauges.
//!
//! The pipeline's own counters are plain atomics (§4.9.1); this module is
//! the only place that knows about `prometheus`, converting a point-in-time
//! read into a `Registry` a control plane can scrape or push elsewhere.

use prometheus::{GaugeVec, IntGauge, Opts, Registry};

use crate::stats::{PerfSnapshot, StatsSnapshot};

pub struct Metrics {
    pub rejections: GaugeVec,
    pub passed: IntGauge,
    pub packet_count: IntGauge,
    pub avg_packet_size: IntGauge,
    pub peak_processing_ns: IntGauge,
}

impl Metrics {
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let rejections = GaugeVec::new(
            Opts::new("packetguard_rejections", "Rejected packets by attack kind"),
            &["kind"],
        )?;
        let passed =
            IntGauge::new("packetguard_passed_total", "Packets forwarded by the pipeline")?;
        let packet_count =
            IntGauge::new("packetguard_packet_count", "Total packets observed by the pipeline")?;
        let avg_packet_size = IntGauge::new(
            "packetguard_avg_packet_size_bytes",
            "EWMA of observed packet size",
        )?;
        let peak_processing_ns = IntGauge::new(
            "packetguard_peak_processing_nanoseconds",
            "Peak per-packet processing time observed",
        )?;

        registry.register(Box::new(rejections.clone()))?;
        registry.register(Box::new(passed.clone()))?;
        registry.register(Box::new(packet_count.clone()))?;
        registry.register(Box::new(avg_packet_size.clone()))?;
        registry.register(Box::new(peak_processing_ns.clone()))?;

        Ok(Self { rejections, passed, packet_count, avg_packet_size, peak_processing_ns })
    }

    /// Render a [`StatsSnapshot`]/[`PerfSnapshot`] pair into the registered
    /// gauges. Call this on whatever cadence the consumer scrapes at; it
    /// does not itself schedule anything.
    pub fn observe(&self, stats: &StatsSnapshot, perf: &PerfSnapshot) {
        self.rejections.with_label_values(&["dropped"]).set(stats.dropped as f64);
        self.rejections
            .with_label_values(&["invalid_protocol"])
            .set(stats.invalid_protocol as f64);
        self.rejections.with_label_values(&["rate_limited"]).set(stats.rate_limited as f64);
        self.rejections
            .with_label_values(&["token_violations"])
            .set(stats.token_violations as f64);
        self.rejections
            .with_label_values(&["sequence_violations"])
            .set(stats.sequence_violations as f64);
        self.rejections
            .with_label_values(&["state_violations"])
            .set(stats.state_violations as f64);
        self.rejections
            .with_label_values(&["checksum_failures"])
            .set(stats.checksum_failures as f64);

        self.passed.set(stats.passed as i64);
        self.packet_count.set(perf.packet_count as i64);
        self.avg_packet_size.set(perf.avg_packet_size as i64);
        self.peak_processing_ns.set(perf.peak_processing_ns as i64);
    }
}
