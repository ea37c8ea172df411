//! Namespace handles over the endpoint table.

mod applications;
mod auth;
mod documents;
mod events;
mod leads;
mod namespace;

pub use applications::ApplicationsApi;
pub use auth::AuthApi;
pub use documents::DocumentsApi;
pub use events::EventsApi;
pub use leads::LeadsApi;
pub use namespace::NamespaceApi;
