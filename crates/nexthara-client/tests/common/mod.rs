//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nexthara_client::{LogoutReason, MemoryTokenStore, NextharaClient, SessionContext};
use parking_lot::Mutex;
use wiremock::MockServer;

/// A mock backend plus a client wired to it.
pub struct TestBackend {
    /// The mock server standing in for the Nexthara API.
    pub server: MockServer,
    /// Client pointed at the mock server.
    pub client: NextharaClient,
    /// The client's session.
    pub session: Arc<SessionContext>,
    /// Every logout event seen by the session.
    pub logouts: Arc<Mutex<Vec<LogoutReason>>>,
    logout_count: Arc<AtomicUsize>,
}

impl TestBackend {
    /// Start a backend with no stored token.
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    /// Start a backend whose session already holds `token`.
    pub async fn start_with_token(token: &str) -> Self {
        Self::start_with(Some(token)).await
    }

    async fn start_with(token: Option<&str>) -> Self {
        let server = MockServer::start().await;

        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        };
        let session = Arc::new(SessionContext::new(store));

        let logouts = Arc::new(Mutex::new(Vec::new()));
        let logout_count = Arc::new(AtomicUsize::new(0));
        {
            let logouts = Arc::clone(&logouts);
            let logout_count = Arc::clone(&logout_count);
            session.on_logout(move |event| {
                logouts.lock().push(event.reason);
                logout_count.fetch_add(1, Ordering::SeqCst);
            });
        }

        let client = NextharaClient::builder()
            .base_url(server.uri())
            .session(Arc::clone(&session))
            .build()
            .expect("client builds");

        Self {
            server,
            client,
            session,
            logouts,
            logout_count,
        }
    }

    /// Number of logout broadcasts so far.
    pub fn logout_count(&self) -> usize {
        self.logout_count.load(Ordering::SeqCst)
    }

    /// The single request the server received.
    pub async fn only_request(&self) -> wiremock::Request {
        let mut requests = self
            .server
            .received_requests()
            .await
            .expect("request recording enabled");
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}
