//! Upload command - attach a document to an application or a lead.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use nexthara_client::{DocumentMetadata, UploadFile};

use super::Context;

/// Arguments for the upload command.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Application ID (or lead ID with --lead)
    pub id: String,

    /// File to upload
    pub path: PathBuf,

    /// Upload to a lead instead of an application
    #[arg(long)]
    pub lead: bool,

    /// Document name
    #[arg(long)]
    pub doc_name: Option<String>,

    /// Document category (e.g. kyc, income)
    #[arg(long)]
    pub doc_category: Option<String>,

    /// Owner of the document (e.g. applicant, co_applicant)
    #[arg(long)]
    pub owner: Option<String>,

    /// Free-form label
    #[arg(long)]
    pub label: Option<String>,
}

impl UploadArgs {
    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            doc_name: self.doc_name.clone(),
            doc_category: self.doc_category.clone(),
            owner: self.owner.clone(),
            label: self.label.clone(),
        }
    }
}

/// Run the upload command.
pub async fn run(args: UploadArgs, ctx: &Context) -> Result<()> {
    let file = UploadFile::from_path(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let metadata = args.metadata();

    let client = ctx.client()?;
    let body = if args.lead {
        client
            .leads()
            .upload_document(&args.id, file, &metadata)
            .await?
    } else {
        client.documents().upload(&args.id, file, &metadata).await?
    };

    ctx.print_value(&body)
}
