//! Leads API.

use serde::Serialize;
use serde_json::Value;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::error::Result;
use crate::upload::{DocumentMetadata, UploadFile};

/// Leads API client.
pub struct LeadsApi {
    client: NextharaClient,
}

impl LeadsApi {
    pub(crate) fn new(client: NextharaClient) -> Self {
        Self { client }
    }

    /// List leads matching a filter record.
    pub async fn list<Q: Serialize + ?Sized>(&self, filters: &Q) -> Result<Value> {
        self.client
            .call("leads.list", CallArgs::new().query(filters)?)
            .await
    }

    /// Get a lead by ID.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.client.call("leads.get", CallArgs::id(id)).await
    }

    /// Create a lead.
    pub async fn create<B: Serialize + ?Sized>(&self, lead: &B) -> Result<Value> {
        self.client
            .call("leads.create", CallArgs::new().body(lead)?)
            .await
    }

    /// Move a lead to another pipeline stage.
    pub async fn update_stage(&self, id: &str, stage: &str) -> Result<Value> {
        self.client
            .call(
                "leads.update_stage",
                CallArgs::id(id).json(serde_json::json!({ "stage": stage })),
            )
            .await
    }

    /// Turn a qualified lead into a loan application.
    pub async fn convert<B: Serialize + ?Sized>(&self, id: &str, details: &B) -> Result<Value> {
        self.client
            .call("leads.convert", CallArgs::id(id).body(details)?)
            .await
    }

    /// Delete a lead.
    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client.call("leads.delete", CallArgs::id(id)).await
    }

    /// Attach a document to a lead.
    pub async fn upload_document(
        &self,
        id: &str,
        file: UploadFile,
        metadata: &DocumentMetadata,
    ) -> Result<Value> {
        self.client
            .upload("leads.upload_document", CallArgs::id(id), file, metadata)
            .await
    }
}
