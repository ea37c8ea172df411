//! Applications API.

use serde::Serialize;
use serde_json::Value;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::error::Result;
use crate::types::StatusUpdateRequest;

/// Loan applications API client.
pub struct ApplicationsApi {
    client: NextharaClient,
}

impl ApplicationsApi {
    pub(crate) fn new(client: NextharaClient) -> Self {
        Self { client }
    }

    /// List applications matching a filter record (`status`, `page`, `limit`, ...).
    pub async fn list<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<Value> {
        self.client
            .call("applications.list", CallArgs::new().query(filters)?)
            .await
    }

    /// Pipeline counts for the dashboard.
    pub async fn stats(&self) -> Result<Value> {
        self.client.call("applications.stats", CallArgs::new()).await
    }

    /// Applications past their SLA.
    pub async fn sla_breaches(&self) -> Result<Value> {
        self.client
            .call("applications.sla_breaches", CallArgs::new())
            .await
    }

    /// Get an application by ID.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.call("applications.get", CallArgs::id(id)).await
    }

    /// Create an application.
    pub async fn create<B: Serialize + ?Sized>(&self, application: &B) -> Result<Value> {
        self.client
            .call("applications.create", CallArgs::new().body(application)?)
            .await
    }

    /// Replace an application's editable fields.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, changes: &B) -> Result<Value> {
        self.client
            .call("applications.update", CallArgs::id(id).body(changes)?)
            .await
    }

    /// Move an application to a new status.
    pub async fn update_status(
        &self,
        id: &str,
        status: &str,
        remarks: Option<&str>,
    ) -> Result<Value> {
        let request = StatusUpdateRequest {
            status: status.to_string(),
            remarks: remarks.map(str::to_string),
        };
        self.client
            .call("applications.update_status", CallArgs::id(id).body(&request)?)
            .await
    }

    /// Delete an application.
    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client.call("applications.delete", CallArgs::id(id)).await
    }

    /// Status history of an application.
    pub async fn history(&self, id: &str) -> Result<Value> {
        self.client.call("applications.history", CallArgs::id(id)).await
    }
}
