//! Plain URLs for file views and CSV exports.
//!
//! These are handed to a browser or downloader as-is and never go through
//! the request wrapper.

use url::Url;

use crate::call::CallArgs;
use crate::client::NextharaClient;
use crate::endpoints::{self, Access};
use crate::error::{Error, Result};

/// Whether a document link opens inline or forces a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    #[default]
    View,
    Download,
}

/// Link builder.
pub struct Links {
    client: NextharaClient,
}

impl Links {
    pub(crate) fn new(client: NextharaClient) -> Self {
        Self { client }
    }

    /// URL of an application document's file.
    pub fn document(&self, application_id: &str, doc_id: &str, mode: LinkMode) -> Result<Url> {
        let args = CallArgs::id(application_id).param("doc_id", doc_id);
        let mut url = self.link("documents.file", args)?;
        if mode == LinkMode::Download {
            url.query_pairs_mut().append_pair("download", "1");
        }
        Ok(url)
    }

    /// URL of a CSV export, filtered by a query record.
    pub fn export<Q: serde::Serialize + ?Sized>(&self, key: &str, filters: &Q) -> Result<Url> {
        self.link(key, CallArgs::new().query(filters)?)
    }

    /// URL of any link endpoint.
    pub fn link(&self, key: &str, args: CallArgs) -> Result<Url> {
        let endpoint = endpoints::lookup(key)?;
        if endpoint.access != Access::Link {
            return Err(Error::invalid_call(endpoint.key(), "not a link endpoint"));
        }

        let (params, query, body) = args.into_parts();
        if body.is_some() {
            return Err(Error::invalid_call(endpoint.key(), "links carry no body"));
        }

        let mut url = endpoint.url(self.client.base_url(), &params)?;
        query.apply_to(&mut url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn links() -> Links {
        NextharaClient::builder()
            .base_url("https://crm.example.com")
            .build()
            .unwrap()
            .links()
    }

    #[test]
    fn test_document_view_and_download() {
        let view = links().document("APP-7", "12", LinkMode::View).unwrap();
        assert_eq!(
            view.as_str(),
            "https://crm.example.com/api/applications/APP-7/documents/12/file"
        );

        let download = links().document("APP-7", "12", LinkMode::Download).unwrap();
        assert_eq!(
            download.as_str(),
            "https://crm.example.com/api/applications/APP-7/documents/12/file?download=1"
        );
    }

    #[test]
    fn test_export_with_filters() {
        let url = links()
            .export("leads.export", &json!({"stage": "NEW", "from": "2026-01-01"}))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://crm.example.com/api/leads/export?stage=NEW&from=2026-01-01"
        );

        let url = links().export("crm.reports_export", &json!({})).unwrap();
        assert_eq!(url.as_str(), "https://crm.example.com/api/crm/reports/export");
    }

    #[test]
    fn test_link_rejects_fetchable_endpoint() {
        let err = links().link("leads.list", CallArgs::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidCall { .. }));
    }
}
