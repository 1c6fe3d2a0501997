use crate::config::types::Config;
use crate::error::FilterError;

/// Validate a [`Config`] before it is installed into the [`ConfigStore`](crate::config::ConfigStore).
///
/// Per the data model's invariant, the three rate limits must be positive
/// whenever they are applied; a `0` limit would make `1_000_000_000 / limit`
/// divide by zero in the per-source tier (§4.2).
pub fn validate(config: &Config) -> Result<(), FilterError> {
    if config.per_source_limit == 0 {
        return Err(FilterError::Validation("per_source_limit must be > 0".into()));
    }
    if config.global_limit == 0 {
        return Err(FilterError::Validation("global_limit must be > 0".into()));
    }
    if config.subnet_limit == 0 {
        return Err(FilterError::Validation("subnet_limit must be > 0".into()));
    }
    if config.server_port == 0 {
        return Err(FilterError::Validation("server_port must be > 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_documented_presets() {
        for cfg in [Config::small(0), Config::medium(0), Config::large(0), Config::dev(0)] {
            assert!(validate(&cfg).is_ok());
        }
    }

    #[test]
    fn rejects_zero_limits() {
        let mut cfg = Config::medium(0);
        cfg.per_source_limit = 0;
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::medium(0);
        cfg.global_limit = 0;
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::medium(0);
        cfg.subnet_limit = 0;
        assert!(validate(&cfg).is_err());
    }
}
