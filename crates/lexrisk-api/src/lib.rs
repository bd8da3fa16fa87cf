//! API layer: the risk-analysis client, its error taxonomy, the session context
//! that carries the bearer token, and memoized remote option lists.

pub mod config;
pub mod error;
pub mod session;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod options;

pub use config::ApiConfig;
pub use error::{ApiError, ApiErrorKind};
pub use session::{SessionError, SessionStore, Theme};

#[cfg(feature = "http")]
pub use http::ApiClient;
#[cfg(feature = "http")]
pub use options::{CachePolicy, OptionCache};

use async_trait::async_trait;
use lexrisk_core::{RawAnalysis, RiskAnalysisRequest};

/// Anything that can run a risk analysis.
///
/// [`ApiClient`] is the production implementation; the wizard is generic
/// over this so it can be driven without a network.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn submit_analysis(&self, request: &RiskAnalysisRequest) -> Result<RawAnalysis, ApiError>;
}
