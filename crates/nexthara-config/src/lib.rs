//! Client configuration for the Nexthara CLI.
//!
//! Kubeconfig-style YAML with named contexts:
//! - each context names a backend server and an optional timeout
//! - `current-context` selects the default
//! - stored sessions and logs live beside the config file
//!
//! The config directory is `$NEXTHARA_CONFIG_DIR` when set, otherwise
//! the platform config dir (e.g. `~/.config/nexthara`).

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{
    load_client_config, load_client_config_from, save_client_config, save_client_config_to,
    ClientConfig, ClientDefaults, Context, DEFAULT_SERVER_URL,
};
pub use discovery::{
    client_config_path, config_dir, logs_dir, session_path, validate_context_name,
    CONFIG_DIR_ENV,
};
pub use error::{ConfigError, Result};
