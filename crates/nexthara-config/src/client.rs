//! Client configuration for connecting to Nexthara backends.
//!
//! Implements a kubeconfig-style configuration with named contexts:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: local
//!
//! contexts:
//!   - name: local
//!     server: http://localhost:4000
//!   - name: staging
//!     server: https://crm.staging.nexthara.in
//!     email: ops@nexthara.in
//!     timeout: 60
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discovery::client_config_path;
use crate::{validate_context_name, ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the client config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for client config files.
pub const KIND: &str = "ClientConfig";

/// Server used when neither a flag, the environment nor a context names one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4000";

/// Root client configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// API version (always "v1" currently).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Config kind (always "ClientConfig").
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the current/default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named connection contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default settings applied to all contexts.
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// Create an empty client config.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Get the current context, if set and valid.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Get a context by name.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    ///
    /// The name must be usable as a session file name.
    pub fn set_context(&mut self, context: Context) -> Result<()> {
        validate_context_name(&context.name)?;
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
        Ok(())
    }

    /// Remove a context by name.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let pos = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(pos))
    }

    /// Set the current context by name.
    ///
    /// Returns an error if the context doesn't exist.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_some() {
            self.current_context = Some(name.to_string());
            Ok(())
        } else {
            Err(ConfigError::ContextNotFound(name.to_string()))
        }
    }

    /// List all context names.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Server URL for a context.
    pub fn server_url(&self, context_name: &str) -> Option<String> {
        self.get_context(context_name).map(|c| c.server.clone())
    }

    /// Effective request timeout in seconds for a context, applying defaults.
    pub fn timeout_secs(&self, context_name: &str) -> u64 {
        self.get_context(context_name)
            .and_then(|c| c.timeout)
            .unwrap_or(self.defaults.timeout)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named connection context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    /// Unique name for this context. Also names its session file.
    pub name: String,

    /// Backend origin (e.g., "http://localhost:4000").
    pub server: String,

    /// Email offered by `login` when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Request timeout override (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Context {
    /// Create a new context with just a name and server URL.
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            email: None,
            timeout: None,
        }
    }

    /// Set the default login email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default settings applied to all contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Default request timeout in seconds.
    pub timeout: u64,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Load the client configuration.
///
/// Returns a default config if the file doesn't exist.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load client config from a specific path.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No client config, using defaults");
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

/// Save the client configuration.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path()
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))?;
    save_client_config_to(config, &path)
}

/// Save client config to a specific path.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "Saved client config");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current_context.is_none());
        assert!(config.contexts.is_empty());
        assert_eq!(config.defaults.timeout, 30);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
api-version: v1
kind: ClientConfig
current-context: staging

contexts:
  - name: local
    server: http://localhost:4000

  - name: staging
    server: https://crm.staging.nexthara.in
    email: ops@nexthara.in
    timeout: 60

defaults:
  timeout: 15
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.current_context.as_deref(), Some("staging"));
        assert_eq!(config.contexts.len(), 2);

        let staging = config.current().unwrap();
        assert_eq!(staging.server, "https://crm.staging.nexthara.in");
        assert_eq!(staging.email.as_deref(), Some("ops@nexthara.in"));

        assert_eq!(config.timeout_secs("staging"), 60);
        assert_eq!(config.timeout_secs("local"), 15);
        assert_eq!(config.timeout_secs("missing"), 15);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ClientConfig::from_yaml("contexts: [oops").unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn test_set_context() {
        let mut config = ClientConfig::new();

        config
            .set_context(Context::new("local", "http://localhost:4000"))
            .unwrap();
        assert_eq!(config.contexts.len(), 1);

        config
            .set_context(Context::new("local", "http://localhost:5000"))
            .unwrap();
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(
            config.server_url("local").as_deref(),
            Some("http://localhost:5000")
        );

        let err = config
            .set_context(Context::new("../evil", "http://x"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContextName(_)));
    }

    #[test]
    fn test_remove_context() {
        let mut config = ClientConfig::new();
        config
            .set_context(Context::new("local", "http://localhost:4000"))
            .unwrap();
        config
            .set_context(Context::new("prod", "https://crm.nexthara.in"))
            .unwrap();
        config.current_context = Some("local".to_string());

        let removed = config.remove_context("prod").unwrap();
        assert_eq!(removed.name, "prod");
        assert_eq!(config.current_context.as_deref(), Some("local"));

        config.remove_context("local");
        assert!(config.current_context.is_none());
        assert!(config.remove_context("local").is_none());
    }

    #[test]
    fn test_use_context() {
        let mut config = ClientConfig::new();
        config
            .set_context(Context::new("local", "http://localhost:4000"))
            .unwrap();

        config.use_context("local").unwrap();
        assert_eq!(config.current_context.as_deref(), Some("local"));

        let err = config.use_context("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.yaml");

        let mut config = ClientConfig::new();
        config
            .set_context(
                Context::new("local", "http://localhost:4000")
                    .with_email("agent@nexthara.in")
                    .with_timeout(5),
            )
            .unwrap();
        config.use_context("local").unwrap();
        save_client_config_to(&config, &path).unwrap();

        let loaded = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(loaded.current_context.as_deref(), Some("local"));
        assert_eq!(loaded.contexts, config.contexts);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_client_config_from(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(loaded.contexts.is_empty());

        let loaded = load_client_config_from(None).unwrap();
        assert_eq!(loaded.kind, KIND);
    }
}
