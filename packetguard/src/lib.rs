#![forbid(unsafe_code)]

pub mod attack_log;
pub mod checksum;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod protocol;
pub mod security;
pub mod stats;
pub mod telemetry;
pub mod util;

pub use attack_log::{AttackLog, AttackLogEntry};
pub use config::{load_from_path, Config, ConfigStore};
pub use error::{FilterError, Result};
pub use pipeline::{Pipeline, Verdict};
pub use protocol::AttackKind;
pub use stats::{Counters, StatsSnapshot};
