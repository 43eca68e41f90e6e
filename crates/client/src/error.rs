#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request to '{path}' failed: {source}")]
    Http {
        path: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} for '{path}'")]
    Status { path: String, status: u16 },

    #[error("Endpoint unreachable for '{path}'")]
    Unreachable { path: String },

    #[error("Companion script command id is not configured")]
    ScriptNotConfigured,

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Invalid mock fixture: {0}")]
    MockFixture(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True for failures of the transport itself, as opposed to local configuration.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http { .. } | ClientError::Status { .. } | ClientError::Unreachable { .. }
        )
    }
}
