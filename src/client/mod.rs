//! HTTP client for the policy decision endpoint.

use crate::constants::{DEFAULT_TIMEOUT, TYPE_APPLICATION_JSON};
use crate::error::Error;
use crate::input::PolicyInput;
use log::{debug, error};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Certificate, Client as HttpClient, Identity, StatusCode};
use std::time::Duration;
use url::Url;

mod config;
mod outcome;

pub use config::PolicyClientConfig;
pub use outcome::{DecisionResult, Outcome, PolicyResponse};

/// Builder for [`PolicyClient`].
///
/// One timeout bounds connection setup and every socket read. Redirects
/// are not followed unless enabled.
pub struct PolicyClientBuilder {
    timeout: Duration,
    follow_redirects: bool,
    user_agent: Option<String>,
    identity: Option<Identity>,
    ca_certs: Vec<Certificate>,
}

impl Default for PolicyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyClientBuilder {
    /// Creates a builder with the default timeout and redirects disabled.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            follow_redirects: false,
            user_agent: None,
            identity: None,
            ca_certs: Vec::new(),
        }
    }

    /// Creates a builder from deserialized client settings.
    pub fn from_config(config: &PolicyClientConfig) -> Self {
        let mut builder = Self::new()
            .timeout(config.timeout())
            .follow_redirects(config.follow_redirects);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder
    }

    /// Sets the bound for connecting and for each socket read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Control whether HTTP redirects should be followed.
    pub fn follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.follow_redirects = follow_redirects;
        self
    }

    /// Sets the `User-Agent` header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Configure mTLS identity from a combined PEM (cert + key).
    pub fn mtls_identity_from_pem(mut self, identity_pem: &[u8]) -> Result<Self, Error> {
        self.identity = Some(Identity::from_pem(identity_pem)?);
        Ok(self)
    }

    /// Add a CA certificate PEM for TLS validation.
    pub fn add_ca_cert_pem(mut self, ca_pem: &[u8]) -> Result<Self, Error> {
        self.ca_certs.push(Certificate::from_pem(ca_pem)?);
        Ok(self)
    }

    /// Build the client.
    pub fn build(self) -> Result<PolicyClient, Error> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        // reqwest opens a new connection instead of queueing for a pooled
        // one, so the connect bound also covers pool acquisition.
        let mut builder = HttpClient::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout);
        if !self.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(identity) = self.identity {
            builder = builder.identity(identity);
        }
        for cert in self.ca_certs {
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build()?;
        Ok(PolicyClient {
            http,
            timeout: self.timeout,
        })
    }
}

/// Client for an OPA-style decision endpoint.
///
/// Cloning is cheap and clones share one connection pool, so a single
/// instance serves every in-flight session.
#[derive(Debug, Clone)]
pub struct PolicyClient {
    http: HttpClient,
    timeout: Duration,
}

impl PolicyClient {
    /// Returns a builder for a policy client.
    pub fn builder() -> PolicyClientBuilder {
        PolicyClientBuilder::new()
    }

    /// Configured connect and read timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POSTs `input` to `endpoint_url` and classifies the result.
    ///
    /// Never fails: every error is logged with the endpoint and folded into
    /// [`Outcome::Fail`] or [`Outcome::Timeout`] with an empty result.
    pub async fn invoke(&self, endpoint_url: &str, input: &PolicyInput) -> PolicyResponse {
        match self.try_invoke(endpoint_url, input).await {
            Ok(result) => {
                debug!("policy decision received from {}", endpoint_url);
                PolicyResponse::success(result)
            }
            Err(failure) => {
                failure.log(endpoint_url);
                PolicyResponse::empty(failure.outcome())
            }
        }
    }

    async fn try_invoke(
        &self,
        endpoint_url: &str,
        input: &PolicyInput,
    ) -> Result<DecisionResult, InvokeFailure> {
        let url = Url::parse(endpoint_url).map_err(InvokeFailure::InvalidUrl)?;
        let body = serde_json::to_vec(input).map_err(InvokeFailure::Serialize)?;
        let resp = self
            .http
            .post(url)
            .header(ACCEPT, TYPE_APPLICATION_JSON)
            .header(CONTENT_TYPE, TYPE_APPLICATION_JSON)
            .body(body)
            .send()
            .await
            .map_err(InvokeFailure::from_transport)?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(InvokeFailure::Status(status));
        }
        let bytes = resp.bytes().await.map_err(InvokeFailure::from_transport)?;
        serde_json::from_slice::<DecisionResult>(&bytes).map_err(InvokeFailure::Parse)
    }
}

#[derive(Debug)]
enum InvokeFailure {
    InvalidUrl(url::ParseError),
    Serialize(serde_json::Error),
    ConnectTimeout(reqwest::Error),
    ReadTimeout(reqwest::Error),
    Transport(reqwest::Error),
    Status(StatusCode),
    Parse(serde_json::Error),
}

impl InvokeFailure {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            if e.is_connect() {
                InvokeFailure::ConnectTimeout(e)
            } else {
                InvokeFailure::ReadTimeout(e)
            }
        } else {
            InvokeFailure::Transport(e)
        }
    }

    fn outcome(&self) -> Outcome {
        match self {
            InvokeFailure::ConnectTimeout(_) | InvokeFailure::ReadTimeout(_) => Outcome::Timeout,
            InvokeFailure::InvalidUrl(_)
            | InvokeFailure::Serialize(_)
            | InvokeFailure::Transport(_)
            | InvokeFailure::Status(_)
            | InvokeFailure::Parse(_) => Outcome::Fail,
        }
    }

    fn log(&self, endpoint_url: &str) {
        match self {
            InvokeFailure::InvalidUrl(e) => {
                error!("invalid policy endpoint url {}: {}", endpoint_url, e)
            }
            InvokeFailure::Serialize(e) => {
                error!("error while serializing input for {}: {}", endpoint_url, e)
            }
            InvokeFailure::ConnectTimeout(e) => {
                error!("error while waiting to connect to {}: {}", endpoint_url, e)
            }
            InvokeFailure::ReadTimeout(e) => {
                error!("error while waiting for data from {}: {}", endpoint_url, e)
            }
            InvokeFailure::Transport(e) => {
                error!("error while calling endpoint {}: {}", endpoint_url, e)
            }
            InvokeFailure::Status(status) => {
                error!("endpoint {} responded with status {}", endpoint_url, status)
            }
            InvokeFailure::Parse(e) => {
                error!("error while parsing response from {}: {}", endpoint_url, e)
            }
        }
    }
}
