//! Generic namespace handle.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::endpoints::{Endpoint, Namespace};
use crate::error::{Error, Result};

/// Any namespace, addressed by operation name.
pub struct NamespaceApi {
    client: NextharaClient,
    namespace: Namespace,
}

impl NamespaceApi {
    pub(crate) fn new(client: NextharaClient, namespace: Namespace) -> Self {
        Self { client, namespace }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Operations available in this namespace.
    pub fn endpoints(&self) -> impl Iterator<Item = &'static Endpoint> {
        self.namespace.endpoints()
    }

    /// Find an operation by name.
    pub fn endpoint(&self, operation: &str) -> Result<&'static Endpoint> {
        self.namespace
            .endpoints()
            .find(|e| e.name == operation)
            .ok_or_else(|| {
                Error::invalid_call(
                    format!("{}.{}", self.namespace, operation),
                    "unknown endpoint",
                )
            })
    }

    /// Invoke an operation.
    pub async fn call(&self, operation: &str, args: CallArgs) -> Result<Value> {
        self.call_as(operation, args).await
    }

    /// Invoke an operation and deserialize the response.
    pub async fn call_as<T: DeserializeOwned>(&self, operation: &str, args: CallArgs) -> Result<T> {
        let endpoint = self.endpoint(operation)?;
        self.client.execute(endpoint, args).await
    }
}
