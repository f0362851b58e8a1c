//! Common test utilities for integration tests.

#![allow(dead_code)]

use serde_json::Value;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use ntree_client::{ClientBuilder, NTreeClient};

/// Path of the envelope endpoint on the mock server.
pub const API_PATH: &str = "/proxy/NTreeNotesServer/api";

/// Path of the upload endpoint on the mock server.
pub const UPLOAD_PATH: &str = "/upload";

/// A mock NTree server with a client pointed at it.
pub struct TestApi {
    /// The mock server. Expectations are verified when it is dropped.
    pub server: MockServer,
    /// Client configured for this server.
    pub client: NTreeClient,
}

impl TestApi {
    /// Start a mock server with a default client.
    pub async fn start() -> Self {
        Self::start_with(|builder| builder).await
    }

    /// Start a mock server, customizing the client builder.
    pub async fn start_with(configure: impl FnOnce(ClientBuilder) -> ClientBuilder) -> Self {
        let server = MockServer::start().await;
        let builder = NTreeClient::builder()
            .api_url(format!("{}{}", server.uri(), API_PATH))
            .upload_url(format!("{}{}", server.uri(), UPLOAD_PATH));
        let client = configure(builder)
            .build()
            .expect("client should build against mock server");

        Self { server, client }
    }

    /// Expect exactly one envelope equal to `envelope`, answering with
    /// `response`.
    pub async fn expect_envelope(&self, envelope: Value, response: Value) {
        envelope_mock(envelope)
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// All JSON bodies received on the envelope endpoint, in order.
    pub async fn received_envelopes(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == API_PATH)
            .map(|request| serde_json::from_slice(&request.body).expect("envelope is JSON"))
            .collect()
    }
}

/// Matcher for a POST of exactly `envelope` to the API endpoint.
pub fn envelope_mock(envelope: Value) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_json(envelope))
}
