#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid endpoint url: {0}")]
    InvalidEndpointUrl(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("claim metadata error for tenant {tenant_domain}: {message}")]
    ClaimMetadata {
        tenant_domain: String,
        message: String,
    },
}

impl Error {
    pub fn claim_metadata(tenant_domain: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ClaimMetadata {
            tenant_domain: tenant_domain.into(),
            message: message.into(),
        }
    }
}
