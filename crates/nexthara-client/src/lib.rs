//! HTTP client SDK for the Nexthara loan-application CRM.
//!
//! This crate provides a typed client for the Nexthara REST backend: one
//! request wrapper with bearer auth and uniform error handling, an explicit
//! session context, and a declarative table of every backend endpoint.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use nexthara_client::{
//!     CallArgs, DocumentMetadata, NextharaClient, Result, SessionContext, UploadFile,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<()> {
//! let session = Arc::new(SessionContext::in_memory());
//! session.on_logout(|event| eprintln!("{}: {:?}", event.name, event.reason));
//!
//! let client = NextharaClient::builder()
//!     .base_url("http://localhost:4000")
//!     .session(Arc::clone(&session))
//!     .build()?;
//!
//! client.auth().login("agent@example.com", "secret").await?;
//!
//! // Typed shortcut
//! let open = client.applications().list(&json!({"status": "OPEN"})).await?;
//!
//! // Any endpoint by key
//! let tasks = client
//!     .call("crm.tasks", CallArgs::new().query(&json!({"due": "today"}))?)
//!     .await?;
//!
//! // Attach a document
//! let file = UploadFile::from_path("passport.pdf").await?;
//! client
//!     .documents()
//!     .upload("APP-1", file, &DocumentMetadata::named("Passport"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Auth**: login, current user, password change
//! - **Users**: tenant user management
//! - **Applications**: CRUD, status, history, notes, SLA breaches
//! - **Documents / Co-applicants / Packs**: per-application sub-resources
//! - **Leads**: pipeline, notes, conversion, document upload
//! - **Communication**: templates, sends, logs
//! - **Agent / Bank admin / Admin**: portal-specific surfaces
//! - **Events**: management plus public event and ticket lookups
//! - **CRM**: tasks, activities, follow-ups, reports
//!
//! See [`endpoints::ENDPOINTS`] for the full table.

pub mod api;
pub mod call;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod links;
pub mod query;
pub mod session;
pub mod types;
pub mod upload;

pub use call::CallArgs;
pub use client::{ClientBuilder, NextharaClient, RequestOptions};
pub use endpoints::{Access, BodyKind, Endpoint, HttpMethod, Namespace, ENDPOINTS};
pub use error::{Error, Result};
pub use links::LinkMode;
pub use query::QueryParams;
pub use session::{
    FileTokenStore, LogoutEvent, LogoutReason, MemoryTokenStore, SessionContext, TokenStore,
    LOGOUT_EVENT, TOKEN_STORAGE_KEY,
};
pub use types::*;
pub use upload::{DocumentMetadata, UploadFile};
