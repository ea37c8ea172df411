//! Events API.
//!
//! Note: the public event and ticket lookups are unauthenticated and never
//! touch the session.

use serde::Serialize;
use serde_json::Value;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::error::Result;

/// Events API client.
pub struct EventsApi {
    client: NextharaClient,
}

impl EventsApi {
    pub(crate) fn new(client: NextharaClient) -> Self {
        Self { client }
    }

    /// List events visible to the signed-in user.
    pub async fn list<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<Value> {
        self.client
            .call("events.list", CallArgs::new().query(filters)?)
            .await
    }

    /// Registrations for an event.
    pub async fn registrations(&self, id: &str) -> Result<Value> {
        self.client
            .call("events.registrations", CallArgs::id(id))
            .await
    }

    /// Check a ticket holder in at an event.
    pub async fn check_in(&self, id: &str, ticket_code: &str) -> Result<Value> {
        self.client
            .call(
                "events.check_in",
                CallArgs::id(id).json(serde_json::json!({ "ticket_code": ticket_code })),
            )
            .await
    }

    /// Public landing-page data for an event.
    pub async fn public_event(&self, slug: &str) -> Result<Value> {
        self.client
            .call("events.public_event", CallArgs::new().param("slug", slug))
            .await
    }

    /// Public ticket lookup by code.
    pub async fn public_ticket(&self, code: &str) -> Result<Value> {
        self.client
            .call("events.public_ticket", CallArgs::new().param("code", code))
            .await
    }
}
