//! Multipart document uploads.

use std::path::Path;

use mime_guess::MimeGuess;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A file to attach to an application or lead.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type; the part goes out as `application/octet-stream` if unset.
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            mime: MimeGuess::from_path(path).first().map(|m| m.to_string()),
            file_name,
            bytes,
        })
    }

    fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

/// Optional descriptive fields sent alongside an uploaded file.
///
/// Only fields that are set and non-empty become multipart parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_category: Option<String>,
    /// Whose document it is (applicant, co-applicant, guarantor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DocumentMetadata {
    pub fn named(doc_name: impl Into<String>) -> Self {
        Self {
            doc_name: Some(doc_name.into()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.doc_category = Some(category.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The fields that will be sent, in wire order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("doc_name", &self.doc_name),
            ("doc_category", &self.doc_category),
            ("owner", &self.owner),
            ("label", &self.label),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect()
    }
}

/// Assemble the multipart form: the `file` part first, then metadata.
pub(crate) fn build_form(file: UploadFile, metadata: &DocumentMetadata) -> Result<Form> {
    let mut form = Form::new().part("file", file.into_part()?);
    for (name, value) in metadata.fields() {
        form = form.text(name, value.to_string());
    }
    Ok(form)
}
