//! Config directory discovery.
//!
//! Everything the CLI persists lives under one directory:
//!
//! ```text
//! <config_dir>/
//!   client.yaml          contexts and defaults
//!   sessions/<ctx>.json  stored token per context
//!   logs/                rotating JSON logs
//! ```

use std::path::PathBuf;

use crate::{ConfigError, Result};

/// Application name used for the config subdirectory.
const APP_NAME: &str = "nexthara";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "NEXTHARA_CONFIG_DIR";

/// Default config filename.
pub(crate) const CLIENT_CONFIG_FILE: &str = "client.yaml";

const SESSIONS_DIR: &str = "sessions";
const LOGS_DIR: &str = "logs";

/// Resolve the config directory.
///
/// `NEXTHARA_CONFIG_DIR` wins when set and non-empty, otherwise the
/// platform config dir joined with `nexthara`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Path to the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Directory for rotating log files.
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join(LOGS_DIR))
}

/// Path to the stored session for a context.
pub fn session_path(context: &str) -> Result<PathBuf> {
    validate_context_name(context)?;
    let dir = config_dir()
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))?;
    Ok(dir.join(SESSIONS_DIR).join(format!("{context}.json")))
}

/// Context names double as file names, so keep them to a safe alphabet.
pub fn validate_context_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidContextName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_names() {
        assert!(validate_context_name("local").is_ok());
        assert!(validate_context_name("prod-mumbai_2").is_ok());
        assert!(validate_context_name("").is_err());
        assert!(validate_context_name("../etc").is_err());
        assert!(validate_context_name("a b").is_err());
    }

    #[test]
    fn test_invalid_session_path() {
        let err = session_path("x/y").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContextName(_)));
    }
}
