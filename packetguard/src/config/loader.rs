use std::fs;
use std::path::Path;

use crate::config::{validator, Config};
use crate::error::{FilterError, Result};

/// Load and validate a [`Config`] from a TOML file.
///
/// This is test/local-run tooling, not the production configuration path:
/// in production the control plane writes directly into the
/// [`ConfigStore`](crate::config::ConfigStore), which this crate treats as
/// an external collaborator (§1).
pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let text = fs::read_to_string(p)?;
    let cfg: Config =
        toml::from_str(&text).map_err(|e| FilterError::Parse(format!("{e}")))?;
    validator::validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("packetguard-{nanos}-{name}.toml"))
    }

    #[test]
    fn loads_a_valid_config() {
        let path = tmp_path("valid");
        let toml = r#"
target_address = 167772161
server_port = 30120
game_port1 = 6672
game_port2 = 6673
per_source_limit = 1000
global_limit = 50000
subnet_limit = 5000
checksum_validation = true
strict_framing = true
"#;
        fs::write(&path, toml).unwrap();

        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.server_port, 30120);
        assert_eq!(cfg.per_source_limit, 1000);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_invalid_config() {
        let path = tmp_path("invalid");
        let toml = r#"
target_address = 0
server_port = 30120
game_port1 = 6672
game_port2 = 6673
per_source_limit = 0
global_limit = 50000
subnet_limit = 5000
checksum_validation = true
strict_framing = true
"#;
        fs::write(&path, toml).unwrap();

        assert!(load_from_path(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_from_path("/nonexistent/packetguard.toml").unwrap_err();
        assert!(matches!(err, FilterError::Io(_)));
    }
}
