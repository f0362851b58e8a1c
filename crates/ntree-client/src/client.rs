//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use url::Url;

use crate::api::{FilesApi, NotesApi, TagsApi};
use crate::config::ClientConfig;
use crate::credentials::{SOURCE_ID_HEADER, StaticTicket, UploadCredentials};
use crate::envelope::{Action, Envelope};
use crate::error::{Error, Result};

/// NTree notes API client.
///
/// Every operation is one POST: an [`Envelope`] to the API endpoint, or a
/// multipart form to the upload endpoint. Calls are independent and may run
/// concurrently; a call is only sent once its future is polled, and dropping
/// the future aborts the request.
///
/// # Example
///
/// ```no_run
/// use ntree_client::NTreeClient;
///
/// # async fn example() -> ntree_client::Result<()> {
/// let client = NTreeClient::builder().build()?;
///
/// let notes = client.notes().search("groceries", ["home"]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NTreeClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client. Holds the session cookie store.
    pub(crate) http: reqwest::Client,
    /// Envelope endpoint.
    pub(crate) api_url: Url,
    /// Multipart upload endpoint.
    pub(crate) upload_url: Url,
    /// Prefix for relative image paths, without trailing slash.
    pub(crate) image_host: String,
    /// Namespace sent in every envelope.
    pub(crate) namespace: String,
    /// Parent object for new notes.
    pub(crate) notes_root: Option<String>,
    /// Request timeout; `None` leaves it to the transport.
    pub(crate) timeout: Option<Duration>,
    /// Upload ticket source.
    pub(crate) credentials: Option<Arc<dyn UploadCredentials>>,
}

impl NTreeClient {
    /// Get access to the inner client state (for API implementations).
    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }
}

impl NTreeClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a loaded configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Get the API endpoint.
    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    /// Get the upload endpoint.
    pub fn upload_url(&self) -> &Url {
        &self.inner.upload_url
    }

    /// Get the namespace sent with every envelope.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the notes API.
    pub fn notes(&self) -> NotesApi {
        NotesApi::new(self.clone())
    }

    /// Access the tags API.
    pub fn tags(&self) -> TagsApi {
        TagsApi::new(self.clone())
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Start an envelope in this client's namespace.
    pub(crate) fn envelope(&self, action: Action) -> Envelope {
        Envelope::new(self.inner.namespace.clone(), action)
    }

    /// Resolve a relative image path against the image host.
    ///
    /// Empty paths stay empty.
    pub(crate) fn image_url(&self, path: &str) -> String {
        if path.is_empty() {
            String::new()
        } else {
            format!("{}/{}", self.inner.image_host, path)
        }
    }

    /// POST an envelope to the API endpoint.
    pub(crate) async fn send<T: serde::de::DeserializeOwned>(
        &self,
        envelope: &Envelope,
    ) -> Result<T> {
        tracing::debug!(
            namespace = %envelope.namespace,
            action = %envelope.action_id,
            url = %self.inner.api_url,
            "Sending envelope"
        );

        let mut request = self.inner.http.post(self.inner.api_url.clone()).json(envelope);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// POST a multipart form to the upload endpoint.
    pub(crate) async fn upload<T: serde::de::DeserializeOwned>(&self, form: Form) -> Result<T> {
        let credentials = self.inner.credentials.as_ref().ok_or_else(|| {
            Error::Credential("no upload credential provider configured".to_string())
        })?;

        let ticket = match credentials.upload_ticket().await {
            Ok(ticket) => ticket,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to obtain upload ticket");
                return Err(e);
            }
        };
        let ticket = HeaderValue::from_str(&ticket)
            .map_err(|_| Error::Credential("upload ticket is not a valid header value".into()))?;

        tracing::debug!(url = %self.inner.upload_url, "Uploading file");

        let mut request = self
            .inner
            .http
            .post(self.inner.upload_url.clone())
            .header(SOURCE_ID_HEADER, ticket)
            .multipart(form);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();

        tracing::warn!(status, url = %url, "Request failed");

        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        match status {
            401 => Error::Auth(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }
}

/// Builder for creating an NTreeClient.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    timeout: Option<Duration>,
    credentials: Option<Arc<dyn UploadCredentials>>,
    cookie_jar: Option<Arc<Jar>>,
}

impl ClientBuilder {
    /// Create a new builder with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings with a loaded configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the API endpoint.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the upload endpoint.
    pub fn upload_url(mut self, url: impl Into<String>) -> Self {
        self.config.upload_url = url.into();
        self
    }

    /// Set the host relative image paths resolve against.
    pub fn image_host(mut self, host: impl Into<String>) -> Self {
        self.config.image_host = host.into();
        self
    }

    /// Set the envelope namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Set or clear the parent object for new notes.
    pub fn notes_root(mut self, root: Option<String>) -> Self {
        self.config.notes_root = root;
        self
    }

    /// Set the request timeout. Takes precedence over `timeout-secs`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Set the upload ticket provider.
    pub fn credentials(mut self, credentials: impl UploadCredentials + 'static) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    /// Use a fixed upload ticket.
    pub fn upload_ticket(self, ticket: impl Into<String>) -> Self {
        self.credentials(StaticTicket::new(ticket))
    }

    /// Share a cookie jar with the session login flow.
    ///
    /// Without one the client keeps its own cookie store.
    pub fn cookie_jar(mut self, jar: Arc<Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NTreeClient> {
        let config = self.config;

        let api_url = Url::parse(&config.api_url)?;
        let upload_url = Url::parse(&config.upload_url)?;

        if config.namespace.is_empty() {
            return Err(Error::Config("namespace must not be empty".to_string()));
        }

        let timeout = self.timeout.or_else(|| config.timeout());
        let image_host = config.image_host.trim_end_matches('/').to_string();
        let notes_root = config.notes_root.filter(|root| !root.is_empty());

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Build HTTP client
        let user_agent = config
            .user_agent
            .unwrap_or_else(|| format!("ntree-client/{}", env!("CARGO_PKG_VERSION")));

        let builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent);
        let builder = match self.cookie_jar {
            Some(jar) => builder.cookie_provider(jar),
            None => builder.cookie_store(true),
        };
        let http = builder.build()?;

        Ok(NTreeClient {
            inner: Arc::new(ClientInner {
                http,
                api_url,
                upload_url,
                image_host,
                namespace: config.namespace,
                notes_root,
                timeout,
                credentials: self.credentials,
            }),
        })
    }
}
