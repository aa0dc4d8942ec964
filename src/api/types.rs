use serde::Serialize;

/// Response envelope: `status` is 1 on success and 0 on failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            status: 1,
            data: Some(data),
            meta: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            data: None,
            meta: None,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. after a delete.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: 1,
            data: None,
            meta: None,
            message: None,
        }
    }
}

/// Body of the registration and login responses.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: u8,
    pub token: String,
}

impl TokenResponse {
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self { status: 1, token }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: u8,
    pub version: &'static str,
    pub uptime_seconds: u64,
}
