//! Session context: the stored bearer token and the logout broadcast.
//!
//! A [`SessionContext`] owns a [`TokenStore`] (the durable storage scope) and
//! a list of logout listeners. It is handed to the client at build time and
//! shared by every request the client makes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{Error, Result};

/// Key under which the bearer token is kept in durable storage.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Name carried by every [`LogoutEvent`].
pub const LOGOUT_EVENT: &str = "auth:logout";

// ─────────────────────────────────────────────────────────────────────────────
// Token storage
// ─────────────────────────────────────────────────────────────────────────────

/// Durable storage scope for the bearer token.
///
/// At most one token lives in a scope; `save` replaces it wholesale.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Read the stored token, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    fn save(&self, token: &str) -> Result<()>;

    /// Delete the stored token. Deleting a missing token is not an error.
    fn clear(&self) -> Result<()>;
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

/// File-backed key/value storage.
///
/// The file holds a JSON object; the token sits under [`TOKEN_STORAGE_KEY`]
/// and any other keys are left alone.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the storage file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(serde_json::Map::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Session(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(serde_json::Map::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::Session(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_map(&self, map: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Session(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json).map_err(|e| {
            Error::Session(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map
            .get(TOKEN_STORAGE_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(
            TOKEN_STORAGE_KEY.to_string(),
            serde_json::Value::String(token.to_string()),
        );
        self.write_map(&map)?;
        tracing::info!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut map = self.read_map()?;
        if map.remove(TOKEN_STORAGE_KEY).is_none() {
            return Ok(());
        }

        if map.is_empty() {
            std::fs::remove_file(&self.path).map_err(|e| {
                Error::Session(format!(
                    "Failed to delete {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        } else {
            self.write_map(&map)?;
        }
        tracing::info!(path = %self.path.display(), "Session token removed");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logout events
// ─────────────────────────────────────────────────────────────────────────────

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The server rejected the token with a 401.
    SessionExpired,
    /// The user signed out explicitly.
    SignedOut,
}

/// Broadcast to every listener when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutEvent {
    /// Always [`LOGOUT_EVENT`].
    pub name: &'static str,
    pub reason: LogoutReason,
}

/// Handle returned by [`SessionContext::on_logout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type LogoutListener = Arc<dyn Fn(&LogoutEvent) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// SessionContext
// ─────────────────────────────────────────────────────────────────────────────

/// Explicit session state shared by a client and its observers.
///
/// # Example
///
/// ```
/// use nexthara_client::session::{LogoutReason, SessionContext};
///
/// let session = SessionContext::in_memory();
/// session.on_logout(|event| assert_eq!(event.reason, LogoutReason::SignedOut));
///
/// session.set_token("abc").unwrap();
/// assert_eq!(session.token().unwrap().as_deref(), Some("abc"));
///
/// session.logout().unwrap();
/// assert!(!session.has_token());
/// ```
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    current_user: RwLock<Option<serde_json::Value>>,
    listeners: Mutex<Vec<(SubscriptionId, LogoutListener)>>,
    next_id: AtomicU64,
}

impl SessionContext {
    /// Create a session over the given storage scope.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self::with_store(Arc::new(store))
    }

    /// Create a session over a shared storage scope.
    pub fn with_store(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            current_user: RwLock::new(None),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a session backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Read the current token. Empty strings count as no token.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.store.load()?.filter(|t| !t.is_empty()))
    }

    /// Whether a token is stored. Says nothing about its validity.
    pub fn has_token(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Store a new token, replacing any previous one.
    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.save(&token)?;
        *self.current_user.write() = None;
        Ok(())
    }

    /// Delete the token and forget the current user, without notifying listeners.
    pub fn clear_token(&self) -> Result<()> {
        *self.current_user.write() = None;
        self.store.clear()
    }

    /// End the session at the user's request and notify listeners.
    pub fn logout(&self) -> Result<()> {
        self.clear_token()?;
        self.broadcast(LogoutReason::SignedOut);
        Ok(())
    }

    /// End the session after the server rejected it.
    ///
    /// Listeners are notified even if the storage could not be cleared.
    pub(crate) fn expire(&self) {
        if let Err(e) = self.clear_token() {
            tracing::warn!(error = %e, "Failed to clear expired session token");
        }
        self.broadcast(LogoutReason::SessionExpired);
    }

    /// The user returned by the last "who am I" call, if still valid.
    pub fn current_user(&self) -> Option<serde_json::Value> {
        self.current_user.read().clone()
    }

    pub(crate) fn set_current_user(&self, user: serde_json::Value) {
        *self.current_user.write() = Some(user);
    }

    /// Register a listener for logout events.
    pub fn on_logout<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&LogoutEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    fn broadcast(&self, reason: LogoutReason) {
        let event = LogoutEvent {
            name: LOGOUT_EVENT,
            reason,
        };

        // Snapshot so listeners may subscribe or unsubscribe re-entrantly.
        let listeners: Vec<LogoutListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        tracing::debug!(?reason, listeners = listeners.len(), "Broadcasting logout");
        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("store", &self.store)
            .field("has_token", &self.has_token())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}
