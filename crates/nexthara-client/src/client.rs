//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::{
    AuthApi, ApplicationsApi, DocumentsApi, EventsApi, LeadsApi, NamespaceApi,
};
use crate::call::CallArgs;
use crate::endpoints::{self, Access, BodyKind, Endpoint, Namespace};
use crate::error::{
    Error, ErrorResponse, Result, REQUEST_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
use crate::links::Links;
use crate::session::SessionContext;
use crate::upload::{self, DocumentMetadata, UploadFile};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Nexthara API client.
///
/// Every authenticated call reads the token from the injected
/// [`SessionContext`]; a 401 clears it and notifies the session's listeners.
///
/// # Example
///
/// ```no_run
/// use nexthara_client::{CallArgs, NextharaClient};
/// use serde_json::json;
///
/// # async fn example() -> nexthara_client::Result<()> {
/// let client = NextharaClient::builder()
///     .base_url("http://localhost:4000")
///     .build()?;
///
/// client.auth().login("agent@example.com", "secret").await?;
/// let open = client.applications().list(&json!({"status": "OPEN"})).await?;
/// let lead = client.call("leads.get", CallArgs::id(17)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NextharaClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Origin (plus optional prefix) all API paths hang off.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Token storage and logout listeners.
    pub(crate) session: Arc<SessionContext>,
}

/// Options for a raw call through [`NextharaClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP verb. Defaults to GET.
    pub method: Method,
    /// Extra headers, applied over the defaults.
    pub headers: HeaderMap,
    /// Pre-serialized JSON body.
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Add or replace a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a pre-serialized body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize a value as the JSON body.
    pub fn json<B: serde::Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }
}

impl NextharaClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings pointing to a local backend.
    pub fn localhost() -> Result<Self> {
        Self::builder().base_url("http://localhost:4000").build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.inner.session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the applications API.
    pub fn applications(&self) -> ApplicationsApi {
        ApplicationsApi::new(self.clone())
    }

    /// Access the application documents API.
    pub fn documents(&self) -> DocumentsApi {
        DocumentsApi::new(self.clone())
    }

    /// Access the leads API.
    pub fn leads(&self) -> LeadsApi {
        LeadsApi::new(self.clone())
    }

    /// Access the events API.
    pub fn events(&self) -> EventsApi {
        EventsApi::new(self.clone())
    }

    /// Access any namespace through its endpoint table rows.
    pub fn namespace(&self, namespace: Namespace) -> NamespaceApi {
        NamespaceApi::new(self.clone(), namespace)
    }

    /// Build file and export URLs.
    pub fn links(&self) -> Links {
        Links::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request wrapper
    // ─────────────────────────────────────────────────────────────────────────

    /// Perform one authenticated call against an absolute API path.
    ///
    /// Sets `Content-Type: application/json`, attaches the bearer token when
    /// one is stored, and normalizes failures. A 401 ends the session.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self.path_url(path)?;
        self.send_authenticated(url, options).await
    }

    /// Invoke an endpoint by `namespace.operation` key.
    pub async fn call(&self, key: &str, args: CallArgs) -> Result<Value> {
        self.execute(endpoints::lookup(key)?, args).await
    }

    /// Invoke an endpoint by key and deserialize the response.
    pub async fn call_as<T: DeserializeOwned>(&self, key: &str, args: CallArgs) -> Result<T> {
        self.execute(endpoints::lookup(key)?, args).await
    }

    /// Invoke an endpoint table row.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        args: CallArgs,
    ) -> Result<T> {
        if endpoint.access == Access::Link {
            return Err(Error::invalid_call(
                endpoint.key(),
                "link endpoints are not fetched; build a URL with links()",
            ));
        }

        let (params, query, body) = args.into_parts();
        let body = match (endpoint.body, body) {
            (BodyKind::Multipart, _) => {
                return Err(Error::invalid_call(
                    endpoint.key(),
                    "multipart endpoints are called through upload()",
                ));
            }
            (BodyKind::NoBody | BodyKind::EmptyObject, Some(_)) => {
                return Err(Error::invalid_call(endpoint.key(), "endpoint takes no body"));
            }
            (BodyKind::NoBody, None) => None,
            (BodyKind::EmptyObject, None) => Some("{}".to_string()),
            (BodyKind::Json, body) => body.map(|b| serde_json::to_string(&b)).transpose()?,
        };

        let mut url = endpoint.url(&self.inner.base_url, &params)?;
        query.apply_to(&mut url);

        let options = RequestOptions {
            method: endpoint.method.into(),
            headers: HeaderMap::new(),
            body,
        };

        match endpoint.access {
            Access::Public => self.send_public(url, options).await,
            _ => self.send_authenticated(url, options).await,
        }
    }

    /// Upload a file to a multipart endpoint.
    ///
    /// `args` supplies the path parameters (the collection identifier).
    pub async fn upload<T: DeserializeOwned>(
        &self,
        key: &str,
        args: CallArgs,
        file: UploadFile,
        metadata: &DocumentMetadata,
    ) -> Result<T> {
        let endpoint = endpoints::lookup(key)?;
        if endpoint.body != BodyKind::Multipart {
            return Err(Error::invalid_call(
                endpoint.key(),
                "endpoint does not accept uploads",
            ));
        }

        let (params, query, body) = args.into_parts();
        if body.is_some() {
            return Err(Error::invalid_call(
                endpoint.key(),
                "uploads carry metadata, not a JSON body",
            ));
        }

        let mut url = endpoint.url(&self.inner.base_url, &params)?;
        query.apply_to(&mut url);

        let form = upload::build_form(file, metadata)?;
        let method: Method = endpoint.method.into();

        // No Content-Type here: the multipart boundary is set by reqwest.
        let mut request = self
            .inner
            .http
            .request(method.clone(), url.clone())
            .timeout(self.inner.timeout)
            .multipart(form);
        if let Some(value) = self.bearer()? {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        self.handle_response(&method, &url, response, UPLOAD_FAILED_MESSAGE, true)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve an absolute API path against the base URL.
    pub(crate) fn path_url(&self, path: &str) -> Result<Url> {
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(Error::from)?;

        if url.origin() != self.inner.base_url.origin() {
            return Err(Error::Config(format!(
                "path '{}' leaves the configured origin",
                path
            )));
        }
        Ok(url)
    }

    /// Authorization header value for the stored token, if any.
    fn bearer(&self) -> Result<Option<HeaderValue>> {
        match self.inner.session.token()? {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| Error::Session("stored token is not a valid header value".to_string()))?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn send_authenticated<T: DeserializeOwned>(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> Result<T> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(value) = self.bearer()? {
            headers.insert(AUTHORIZATION, value);
        }
        headers.extend(options.headers);

        let mut request = self
            .inner
            .http
            .request(options.method.clone(), url.clone())
            .headers(headers)
            .timeout(self.inner.timeout);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        self.handle_response(&options.method, &url, response, REQUEST_FAILED_MESSAGE, true)
            .await
    }

    /// Unauthenticated call: no token, and a 401 leaves the session alone.
    async fn send_public<T: DeserializeOwned>(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> Result<T> {
        let mut request = self
            .inner
            .http
            .request(options.method.clone(), url.clone())
            .timeout(self.inner.timeout);
        if let Some(body) = options.body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }
        request = request.headers(options.headers);

        let response = request.send().await?;
        self.handle_response(&options.method, &url, response, REQUEST_FAILED_MESSAGE, false)
            .await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &Url,
        response: reqwest::Response,
        fallback: &str,
        session_guarded: bool,
    ) -> Result<T> {
        let status = response.status();
        tracing::debug!(%method, path = %url.path(), status = status.as_u16(), "API response");

        if status == StatusCode::UNAUTHORIZED && session_guarded {
            tracing::warn!(%method, path = %url.path(), "Session rejected, logging out");
            self.inner.session.expire();
            return Err(Error::unauthorized());
        }

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message =
                ErrorResponse::message_from(&body).unwrap_or_else(|| fallback.to_string());
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

impl std::fmt::Debug for NextharaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextharaClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .field("session", &self.inner.session)
            .finish()
    }
}

/// Builder for creating a NextharaClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    session: Option<Arc<SessionContext>>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            session: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the backend.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use an existing session. Defaults to a fresh in-memory session.
    pub fn session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    /// Store this token in the session when the client is built.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NextharaClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("'{}' cannot be a base URL", base_url)));
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let session = self
            .session
            .unwrap_or_else(|| Arc::new(SessionContext::in_memory()));
        if let Some(token) = &self.auth_token {
            session.set_token(token.clone())?;
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("nexthara-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(NextharaClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                session,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
