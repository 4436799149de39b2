//! Config validation: values that parse but cannot work.

use crate::config::AppConfig;
use crate::error::ConfigError;

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(path) = config.protected_paths.iter().find(|p| !p.starts_with('/')) {
        return Err(ConfigError::Invalid {
            key: "PROTECTED_PATHS",
            value: path.clone(),
        });
    }
    if config.token_ttl_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "TOKEN_TTL_SECS",
            value: "0".into(),
        });
    }
    if config.max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "DB_MAX_CONNECTIONS",
            value: "0".into(),
        });
    }
    Ok(())
}
