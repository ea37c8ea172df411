//! CLI command handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use nexthara_client::{FileTokenStore, LogoutReason, NextharaClient, SessionContext};
use nexthara_config::DEFAULT_SERVER_URL;
use serde_json::Value;

pub mod auth;
pub mod call;
pub mod config;
pub mod endpoints;
pub mod link;
pub mod upload;

/// Context name used when none is configured.
const DEFAULT_CONTEXT: &str = "default";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Server URL to connect to.
    pub server_url: String,
    /// Name of the active context; also keys the stored session.
    pub context_name: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Email offered by `login` when none is given.
    pub default_email: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Resolve server and context from flags, the client config and defaults.
    ///
    /// Server precedence: `--server` / `NEXTHARA_SERVER_URL`, then the
    /// context's server, then `http://localhost:4000`.
    pub fn resolve(
        server: Option<String>,
        context: Option<String>,
        json_output: bool,
        verbose: bool,
        allow_missing_context: bool,
    ) -> Result<Self> {
        let config = nexthara_config::load_client_config()?;

        let explicit = context.is_some();
        let context_name = context
            .or_else(|| config.current_context.clone())
            .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

        let entry = config.get_context(&context_name);
        if explicit && entry.is_none() && server.is_none() && !allow_missing_context {
            anyhow::bail!(
                "Context \"{}\" not found. Create it with 'nexthara config set-context {} --url <url>'.",
                context_name,
                context_name
            );
        }

        let server_url = server
            .or_else(|| entry.map(|c| c.server.clone()))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        tracing::debug!(context = %context_name, server = %server_url, "Resolved context");

        Ok(Self {
            timeout: Duration::from_secs(config.timeout_secs(&context_name)),
            default_email: entry.and_then(|c| c.email.clone()),
            server_url,
            context_name,
            json_output,
            verbose,
        })
    }

    /// File-backed session for the active context.
    ///
    /// Prints a hint when the server ends the session.
    pub fn session(&self) -> Result<Arc<SessionContext>> {
        let path = nexthara_config::session_path(&self.context_name)?;
        let session = Arc::new(SessionContext::new(FileTokenStore::new(path)));
        session.on_logout(|event| {
            if event.reason == LogoutReason::SessionExpired {
                eprintln!(
                    "{}",
                    console::style("Session expired. Run 'nexthara login' to sign in again.")
                        .yellow()
                );
            }
        });
        Ok(session)
    }

    /// Client bound to the active server and session.
    pub fn client(&self) -> Result<NextharaClient> {
        let client = NextharaClient::builder()
            .base_url(self.server_url.clone())
            .session(self.session()?)
            .timeout(self.timeout)
            .user_agent(format!("nexthara-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| format!("Invalid server URL: {}", self.server_url))?;
        Ok(client)
    }

    /// Print a response body: compact in JSON mode, indented otherwise.
    pub fn print_value(&self, value: &Value) -> Result<()> {
        if self.json_output {
            println!("{}", serde_json::to_string(value)?);
        } else {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }
}

/// Parse a `key=value` argument.
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}
