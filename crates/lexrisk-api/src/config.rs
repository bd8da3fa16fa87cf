use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.example.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const RISK_ANALYSIS_PATH: &str = "/api/v1/risk-analysis";
/// Where a 401 sends the user. No login view exists yet.
pub const LOGIN_PATH: &str = "/login";

/// Connection settings for the analysis API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// No trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    /// `base_url` should be like `https://api.example.com`; a trailing slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute URLs pass through; anything else is joined onto the base URL.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            self.endpoint(url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}
