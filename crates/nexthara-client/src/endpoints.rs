//! Declarative endpoint table.
//!
//! Every backend operation is one [`Endpoint`] row: namespace, operation
//! name, verb, path template, access mode and body kind. The client has a
//! single executor that consumes rows; the namespace handles in
//! [`crate::api`] are thin typed shortcuts over it.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// Group of operations sharing a base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Auth,
    Users,
    Applications,
    Documents,
    CoApplicants,
    Packs,
    Leads,
    Communication,
    Agent,
    BankAdmin,
    Events,
    Admin,
    Crm,
}

impl Namespace {
    pub const ALL: [Namespace; 13] = [
        Namespace::Auth,
        Namespace::Users,
        Namespace::Applications,
        Namespace::Documents,
        Namespace::CoApplicants,
        Namespace::Packs,
        Namespace::Leads,
        Namespace::Communication,
        Namespace::Agent,
        Namespace::BankAdmin,
        Namespace::Events,
        Namespace::Admin,
        Namespace::Crm,
    ];

    /// Name used in endpoint keys (`applications.list`).
    pub fn name(self) -> &'static str {
        match self {
            Namespace::Auth => "auth",
            Namespace::Users => "users",
            Namespace::Applications => "applications",
            Namespace::Documents => "documents",
            Namespace::CoApplicants => "co_applicants",
            Namespace::Packs => "packs",
            Namespace::Leads => "leads",
            Namespace::Communication => "communication",
            Namespace::Agent => "agent",
            Namespace::BankAdmin => "bank_admin",
            Namespace::Events => "events",
            Namespace::Admin => "admin",
            Namespace::Crm => "crm",
        }
    }

    /// Path every endpoint of the namespace lives under.
    pub fn base_path(self) -> &'static str {
        match self {
            Namespace::Auth => "/api/auth",
            Namespace::Users => "/api/users",
            Namespace::Applications
            | Namespace::Documents
            | Namespace::CoApplicants
            | Namespace::Packs => "/api/applications",
            Namespace::Leads => "/api/leads",
            Namespace::Communication => "/api/communication",
            Namespace::Agent => "/api/agent",
            Namespace::BankAdmin => "/api/bank-admin",
            Namespace::Events => "/api/events",
            Namespace::Admin => "/api/admin",
            Namespace::Crm => "/api/crm",
        }
    }

    /// Parse a namespace name. Accepts `bank-admin` as well as `bank_admin`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.replace('-', "_");
        Self::ALL.into_iter().find(|ns| ns.name() == name)
    }

    /// Every endpoint in this namespace, in table order.
    pub fn endpoints(self) -> impl Iterator<Item = &'static Endpoint> {
        ENDPOINTS.iter().filter(move |e| e.namespace == self)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How an endpoint is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Through the authenticated wrapper: bearer token, 401 ends the session.
    Session,
    /// Direct, unauthenticated call. A 401 leaves the session alone.
    Public,
    /// Never fetched; exposed as a plain URL (file views, CSV exports).
    Link,
}

/// What an endpoint accepts as a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    NoBody,
    /// Caller-supplied JSON, sent if given.
    Json,
    /// Always `{}`.
    EmptyObject,
    /// Multipart file upload.
    Multipart,
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub namespace: Namespace,
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path template; `{param}` segments are filled per call.
    pub path: &'static str,
    pub access: Access,
    pub body: BodyKind,
}

impl Endpoint {
    /// Key in `namespace.operation` form.
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace.name(), self.name)
    }

    /// Names of the `{param}` placeholders, in path order.
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter_map(placeholder)
    }

    /// Build the absolute URL for this endpoint under `base`.
    ///
    /// Each parameter value becomes exactly one percent-encoded path segment.
    pub fn url(&self, base: &Url, params: &[(String, String)]) -> Result<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("base URL '{}' cannot hold a path", base)))?;
            segments.pop_if_empty();

            for segment in self.path.trim_matches('/').split('/') {
                match placeholder(segment) {
                    Some(name) => {
                        let value = params
                            .iter()
                            .find(|(k, _)| k == name)
                            .map(|(_, v)| v.as_str())
                            .ok_or_else(|| {
                                Error::invalid_call(
                                    self.key(),
                                    format!("missing path parameter '{}'", name),
                                )
                            })?;
                        if value.is_empty() || value == "." || value == ".." {
                            return Err(Error::invalid_call(
                                self.key(),
                                format!("path parameter '{}' is not a valid segment", name),
                            ));
                        }
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        Ok(url)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

/// Look up an endpoint by `namespace.operation` key.
pub fn find(key: &str) -> Option<&'static Endpoint> {
    let (ns, name) = key.split_once('.')?;
    let ns = Namespace::from_name(ns)?;
    ns.endpoints().find(|e| e.name == name)
}

/// Look up an endpoint, failing with [`Error::InvalidCall`] if unknown.
pub fn lookup(key: &str) -> Result<&'static Endpoint> {
    find(key).ok_or_else(|| Error::invalid_call(key, "unknown endpoint"))
}

const fn ep(
    namespace: Namespace,
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
    access: Access,
    body: BodyKind,
) -> Endpoint {
    Endpoint {
        namespace,
        name,
        method,
        path,
        access,
        body,
    }
}

pub use table::ENDPOINTS;

mod table {
    use super::Access::*;
    use super::BodyKind::*;
    use super::HttpMethod::*;
    use super::Namespace::*;
    use super::{ep, Endpoint};

    /// The full backend surface.
    pub static ENDPOINTS: &[Endpoint] = &[
        // auth
        ep(Auth, "login", Post, "/api/auth/login", Public, Json),
        ep(Auth, "me", Get, "/api/auth/me", Session, NoBody),
        ep(Auth, "change_password", Post, "/api/auth/change-password", Session, Json),
        // users
        ep(Users, "list", Get, "/api/users", Session, NoBody),
        ep(Users, "get", Get, "/api/users/{id}", Session, NoBody),
        ep(Users, "create", Post, "/api/users", Session, Json),
        ep(Users, "update", Put, "/api/users/{id}", Session, Json),
        ep(Users, "delete", Delete, "/api/users/{id}", Session, NoBody),
        // applications
        ep(Applications, "list", Get, "/api/applications", Session, NoBody),
        ep(Applications, "stats", Get, "/api/applications/stats", Session, NoBody),
        ep(Applications, "sla_breaches", Get, "/api/applications/sla-breaches", Session, NoBody),
        ep(Applications, "get", Get, "/api/applications/{id}", Session, NoBody),
        ep(Applications, "create", Post, "/api/applications", Session, Json),
        ep(Applications, "update", Put, "/api/applications/{id}", Session, Json),
        ep(Applications, "update_status", Patch, "/api/applications/{id}/status", Session, Json),
        ep(Applications, "delete", Delete, "/api/applications/{id}", Session, NoBody),
        ep(Applications, "history", Get, "/api/applications/{id}/history", Session, NoBody),
        ep(Applications, "notes", Get, "/api/applications/{id}/notes", Session, NoBody),
        ep(Applications, "add_note", Post, "/api/applications/{id}/notes", Session, Json),
        ep(Applications, "assign", Post, "/api/applications/{id}/assign", Session, Json),
        ep(Applications, "export", Get, "/api/applications/export", Link, NoBody),
        // documents
        ep(Documents, "list", Get, "/api/applications/{id}/documents", Session, NoBody),
        ep(Documents, "upload", Post, "/api/applications/{id}/documents", Session, Multipart),
        ep(Documents, "update", Patch, "/api/applications/{id}/documents/{doc_id}", Session, Json),
        ep(Documents, "verify", Post, "/api/applications/{id}/documents/{doc_id}/verify", Session, Json),
        ep(Documents, "reject", Post, "/api/applications/{id}/documents/{doc_id}/reject", Session, Json),
        ep(Documents, "delete", Delete, "/api/applications/{id}/documents/{doc_id}", Session, NoBody),
        ep(Documents, "checklist", Get, "/api/applications/{id}/documents/checklist", Session, NoBody),
        ep(Documents, "file", Get, "/api/applications/{id}/documents/{doc_id}/file", Link, NoBody),
        // co-applicants
        ep(CoApplicants, "list", Get, "/api/applications/{id}/co-applicants", Session, NoBody),
        ep(CoApplicants, "create", Post, "/api/applications/{id}/co-applicants", Session, Json),
        ep(CoApplicants, "update", Put, "/api/applications/{id}/co-applicants/{co_applicant_id}", Session, Json),
        ep(CoApplicants, "delete", Delete, "/api/applications/{id}/co-applicants/{co_applicant_id}", Session, NoBody),
        // packs
        ep(Packs, "list", Get, "/api/applications/{id}/packs", Session, NoBody),
        ep(Packs, "generate", Post, "/api/applications/{id}/packs", Session, Json),
        ep(Packs, "get", Get, "/api/applications/{id}/packs/{pack_id}", Session, NoBody),
        ep(Packs, "send", Post, "/api/applications/{id}/packs/{pack_id}/send", Session, Json),
        // leads
        ep(Leads, "list", Get, "/api/leads", Session, NoBody),
        ep(Leads, "stats", Get, "/api/leads/stats", Session, NoBody),
        ep(Leads, "get", Get, "/api/leads/{id}", Session, NoBody),
        ep(Leads, "create", Post, "/api/leads", Session, Json),
        ep(Leads, "update", Put, "/api/leads/{id}", Session, Json),
        ep(Leads, "update_stage", Patch, "/api/leads/{id}/stage", Session, Json),
        ep(Leads, "delete", Delete, "/api/leads/{id}", Session, NoBody),
        ep(Leads, "assign", Post, "/api/leads/{id}/assign", Session, Json),
        ep(Leads, "convert", Post, "/api/leads/{id}/convert", Session, Json),
        ep(Leads, "notes", Get, "/api/leads/{id}/notes", Session, NoBody),
        ep(Leads, "add_note", Post, "/api/leads/{id}/notes", Session, Json),
        ep(Leads, "upload_document", Post, "/api/leads/{id}/documents", Session, Multipart),
        ep(Leads, "bulk_import", Post, "/api/leads/import", Session, Json),
        ep(Leads, "export", Get, "/api/leads/export", Link, NoBody),
        // communication
        ep(Communication, "templates", Get, "/api/communication/templates", Session, NoBody),
        ep(Communication, "create_template", Post, "/api/communication/templates", Session, Json),
        ep(Communication, "update_template", Put, "/api/communication/templates/{id}", Session, Json),
        ep(Communication, "delete_template", Delete, "/api/communication/templates/{id}", Session, NoBody),
        ep(Communication, "send", Post, "/api/communication/send", Session, Json),
        ep(Communication, "logs", Get, "/api/communication/logs", Session, NoBody),
        ep(Communication, "thread", Get, "/api/communication/threads/{id}", Session, NoBody),
        // agent portal
        ep(Agent, "dashboard", Get, "/api/agent/dashboard", Session, NoBody),
        ep(Agent, "applications", Get, "/api/agent/applications", Session, NoBody),
        ep(Agent, "leads", Get, "/api/agent/leads", Session, NoBody),
        ep(Agent, "commissions", Get, "/api/agent/commissions", Session, NoBody),
        ep(Agent, "commission_summary", Get, "/api/agent/commissions/summary", Session, NoBody),
        ep(Agent, "payouts", Get, "/api/agent/payouts", Session, NoBody),
        ep(Agent, "request_payout", Post, "/api/agent/payouts", Session, Json),
        ep(Agent, "profile", Get, "/api/agent/profile", Session, NoBody),
        ep(Agent, "update_profile", Put, "/api/agent/profile", Session, Json),
        ep(Agent, "team", Get, "/api/agent/team", Session, NoBody),
        ep(Agent, "add_team_member", Post, "/api/agent/team", Session, Json),
        // bank-admin portal
        ep(BankAdmin, "dashboard", Get, "/api/bank-admin/dashboard", Session, NoBody),
        ep(BankAdmin, "applications", Get, "/api/bank-admin/applications", Session, NoBody),
        ep(BankAdmin, "application", Get, "/api/bank-admin/applications/{id}", Session, NoBody),
        ep(BankAdmin, "decide", Post, "/api/bank-admin/applications/{id}/decision", Session, Json),
        ep(BankAdmin, "request_documents", Post, "/api/bank-admin/applications/{id}/document-requests", Session, Json),
        ep(BankAdmin, "sla", Get, "/api/bank-admin/sla", Session, NoBody),
        ep(BankAdmin, "products", Get, "/api/bank-admin/products", Session, NoBody),
        ep(BankAdmin, "create_product", Post, "/api/bank-admin/products", Session, Json),
        ep(BankAdmin, "update_product", Put, "/api/bank-admin/products/{id}", Session, Json),
        ep(BankAdmin, "toggle_product", Post, "/api/bank-admin/products/{id}/toggle", Session, EmptyObject),
        ep(BankAdmin, "team", Get, "/api/bank-admin/team", Session, NoBody),
        ep(BankAdmin, "invite", Post, "/api/bank-admin/team", Session, Json),
        // events
        ep(Events, "list", Get, "/api/events", Session, NoBody),
        ep(Events, "get", Get, "/api/events/{id}", Session, NoBody),
        ep(Events, "create", Post, "/api/events", Session, Json),
        ep(Events, "update", Put, "/api/events/{id}", Session, Json),
        ep(Events, "delete", Delete, "/api/events/{id}", Session, NoBody),
        ep(Events, "registrations", Get, "/api/events/{id}/registrations", Session, NoBody),
        ep(Events, "check_in", Post, "/api/events/{id}/check-in", Session, Json),
        ep(Events, "public_event", Get, "/api/events/public/{slug}", Public, NoBody),
        ep(Events, "public_ticket", Get, "/api/events/tickets/{code}", Public, NoBody),
        ep(Events, "registrations_export", Get, "/api/events/{id}/registrations/export", Link, NoBody),
        // super-admin portal
        ep(Admin, "stats", Get, "/api/admin/stats", Session, NoBody),
        ep(Admin, "tenants", Get, "/api/admin/tenants", Session, NoBody),
        ep(Admin, "create_tenant", Post, "/api/admin/tenants", Session, Json),
        ep(Admin, "update_tenant", Put, "/api/admin/tenants/{id}", Session, Json),
        ep(Admin, "toggle_tenant", Post, "/api/admin/tenants/{id}/toggle", Session, EmptyObject),
        ep(Admin, "banks", Get, "/api/admin/banks", Session, NoBody),
        ep(Admin, "create_bank", Post, "/api/admin/banks", Session, Json),
        ep(Admin, "update_bank", Put, "/api/admin/banks/{id}", Session, Json),
        ep(Admin, "toggle_bank", Post, "/api/admin/banks/{id}/toggle", Session, EmptyObject),
        ep(Admin, "commission_rules", Get, "/api/admin/commission-rules", Session, NoBody),
        ep(Admin, "update_commission_rule", Put, "/api/admin/commission-rules/{id}", Session, Json),
        ep(Admin, "audit_logs", Get, "/api/admin/audit-logs", Session, NoBody),
        ep(Admin, "settings", Get, "/api/admin/settings", Session, NoBody),
        ep(Admin, "update_settings", Put, "/api/admin/settings", Session, Json),
        // crm
        ep(Crm, "pipeline", Get, "/api/crm/pipeline", Session, NoBody),
        ep(Crm, "tasks", Get, "/api/crm/tasks", Session, NoBody),
        ep(Crm, "create_task", Post, "/api/crm/tasks", Session, Json),
        ep(Crm, "update_task", Patch, "/api/crm/tasks/{id}", Session, Json),
        ep(Crm, "complete_task", Post, "/api/crm/tasks/{id}/complete", Session, EmptyObject),
        ep(Crm, "delete_task", Delete, "/api/crm/tasks/{id}", Session, NoBody),
        ep(Crm, "activities", Get, "/api/crm/activities", Session, NoBody),
        ep(Crm, "log_activity", Post, "/api/crm/activities", Session, Json),
        ep(Crm, "follow_ups", Get, "/api/crm/follow-ups", Session, NoBody),
        ep(Crm, "reports", Get, "/api/crm/reports", Session, NoBody),
        ep(Crm, "reports_export", Get, "/api/crm/reports/export", Link, NoBody),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn base() -> Url {
        Url::parse("http://localhost:4000/").unwrap()
    }

    #[test]
    fn test_keys_are_unique() {
        let mut seen = HashSet::new();
        for endpoint in ENDPOINTS {
            assert!(seen.insert(endpoint.key()), "duplicate {}", endpoint.key());
        }
    }

    #[test]
    fn test_table_shape() {
        for endpoint in ENDPOINTS {
            if endpoint.method == HttpMethod::Get {
                assert_eq!(endpoint.body, BodyKind::NoBody, "{}", endpoint.key());
            }
            if endpoint.body == BodyKind::Multipart {
                assert_eq!(endpoint.method, HttpMethod::Post, "{}", endpoint.key());
                assert_eq!(endpoint.access, Access::Session, "{}", endpoint.key());
            }
            if endpoint.access == Access::Link {
                assert_eq!(endpoint.method, HttpMethod::Get, "{}", endpoint.key());
            }
        }
    }

    #[test]
    fn test_every_namespace_has_endpoints() {
        for ns in Namespace::ALL {
            assert!(ns.endpoints().next().is_some(), "{} is empty", ns);
        }
    }

    #[test]
    fn test_public_endpoints() {
        let public: Vec<String> = ENDPOINTS
            .iter()
            .filter(|e| e.access == Access::Public)
            .map(Endpoint::key)
            .collect();
        assert_eq!(
            public,
            vec!["auth.login", "events.public_event", "events.public_ticket"]
        );
    }

    #[test]
    fn test_find() {
        let endpoint = find("applications.list").unwrap();
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert_eq!(endpoint.path, "/api/applications");

        assert_eq!(find("bank-admin.sla").unwrap().path, "/api/bank-admin/sla");
        assert!(find("applications.nope").is_none());
        assert!(find("nope.list").is_none());
        assert!(find("applications").is_none());
        assert!(matches!(lookup("x.y"), Err(Error::InvalidCall { .. })));
    }

    #[test]
    fn test_namespace_from_name() {
        assert_eq!(Namespace::from_name("crm"), Some(Namespace::Crm));
        assert_eq!(Namespace::from_name("co-applicants"), Some(Namespace::CoApplicants));
        assert_eq!(Namespace::from_name("bank_admin"), Some(Namespace::BankAdmin));
        assert_eq!(Namespace::from_name("billing"), None);
    }

    #[test]
    fn test_url_interpolation() {
        let endpoint = find("documents.update").unwrap();
        assert_eq!(
            endpoint.path_params().collect::<Vec<_>>(),
            vec!["id", "doc_id"]
        );

        let url = endpoint
            .url(
                &base(),
                &[
                    ("doc_id".to_string(), "9".to_string()),
                    ("id".to_string(), "APP-1".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/api/applications/APP-1/documents/9"
        );
    }

    #[test]
    fn test_url_under_base_prefix() {
        let base = Url::parse("https://crm.example.com/portal/").unwrap();
        let url = find("leads.list").unwrap().url(&base, &[]).unwrap();
        assert_eq!(url.as_str(), "https://crm.example.com/portal/api/leads");
    }

    #[test]
    fn test_url_missing_param() {
        let err = find("users.get").unwrap().url(&base(), &[]).unwrap_err();
        match err {
            Error::InvalidCall { endpoint, reason } => {
                assert_eq!(endpoint, "users.get");
                assert!(reason.contains("'id'"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = find("users.get")
            .unwrap()
            .url(&base(), &[("id".to_string(), String::new())])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCall { .. }));

        let err = find("users.get")
            .unwrap()
            .url(&base(), &[("id".to_string(), "..".to_string())])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCall { .. }));
    }

    #[test]
    fn test_url_encodes_param_as_one_segment() {
        let url = find("events.public_event")
            .unwrap()
            .url(&base(), &[("slug".to_string(), "a/b c?".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/api/events/public/a%2Fb%20c%3F"
        );
    }
}

/// Property-based tests over the whole table.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn param_value() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Za-z0-9_-]{1,12}",
            "[ -~]{1,16}",
            "[a-z]{1,4}/[a-z]{1,4}",
        ]
        .prop_filter("dot segments are rejected", |s| s != "." && s != "..")
    }

    proptest! {
        /// Property: any parameter values render a URL under the namespace base path,
        /// with one path segment per template segment.
        #[test]
        fn every_endpoint_renders_under_its_base(
            index in 0..ENDPOINTS.len(),
            values in prop::collection::vec(param_value(), 3),
        ) {
            let endpoint = &ENDPOINTS[index];
            let params: Vec<(String, String)> = endpoint
                .path_params()
                .zip(values.iter().cycle())
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();

            let base = Url::parse("http://localhost:4000/").unwrap();
            let url = endpoint.url(&base, &params).unwrap();

            prop_assert!(url.path().starts_with(endpoint.namespace.base_path()));
            prop_assert!(url.query().is_none());

            let template_segments = endpoint.path.trim_matches('/').split('/').count();
            let rendered: Vec<&str> = url.path_segments().unwrap().collect();
            prop_assert_eq!(rendered.len(), template_segments);

            for (segment, template) in rendered.iter().zip(endpoint.path.trim_matches('/').split('/')) {
                if template.starts_with('{') {
                    prop_assert!(!segment.contains('/'));
                } else {
                    prop_assert_eq!(*segment, template);
                }
            }
        }
    }
}
