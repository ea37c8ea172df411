//! Application documents API.

use serde_json::Value;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::error::Result;
use crate::links::LinkMode;
use crate::upload::{DocumentMetadata, UploadFile};

/// Documents attached to a loan application.
pub struct DocumentsApi {
    client: NextharaClient,
}

impl DocumentsApi {
    pub(crate) fn new(client: NextharaClient) -> Self {
        Self { client }
    }

    /// List an application's documents.
    pub async fn list(&self, application_id: &str) -> Result<Value> {
        self.client
            .call("documents.list", CallArgs::id(application_id))
            .await
    }

    /// Upload a file to an application.
    pub async fn upload(
        &self,
        application_id: &str,
        file: UploadFile,
        metadata: &DocumentMetadata,
    ) -> Result<Value> {
        self.client
            .upload(
                "documents.upload",
                CallArgs::id(application_id),
                file,
                metadata,
            )
            .await
    }

    /// Mark a document as verified.
    pub async fn verify(&self, application_id: &str, doc_id: &str) -> Result<Value> {
        let args = CallArgs::id(application_id)
            .param("doc_id", doc_id)
            .json(serde_json::json!({}));
        self.client.call("documents.verify", args).await
    }

    /// Reject a document with a reason shown to the uploader.
    pub async fn reject(&self, application_id: &str, doc_id: &str, reason: &str) -> Result<Value> {
        let args = CallArgs::id(application_id)
            .param("doc_id", doc_id)
            .json(serde_json::json!({ "reason": reason }));
        self.client.call("documents.reject", args).await
    }

    /// Delete a document.
    pub async fn delete(&self, application_id: &str, doc_id: &str) -> Result<Value> {
        let args = CallArgs::id(application_id).param("doc_id", doc_id);
        self.client.call("documents.delete", args).await
    }

    /// URL for viewing or downloading a document's file.
    pub fn file_url(
        &self,
        application_id: &str,
        doc_id: &str,
        mode: LinkMode,
    ) -> Result<url::Url> {
        self.client.links().document(application_id, doc_id, mode)
    }
}
