//! HTTP client for the risk-analysis API.

use async_trait::async_trait;
use lexrisk_core::select::{OptionSource, SelectOption, options_from_json};
use lexrisk_core::{RawAnalysis, RiskAnalysisRequest};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::RISK_ANALYSIS_PATH;
use crate::options::OptionCache;
use crate::{AnalysisService, ApiConfig, ApiError, SessionStore};

/// Error body shape returned by the API on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the analysis API.
///
/// Every request carries the session's bearer token when one is stored. A 401
/// clears the session and surfaces [`ApiError::Unauthorized`].
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::RequestSetup(e.to_string()))?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("API returned 401; clearing session");
            if let Err(e) = self.session.logout() {
                warn!(error = %e, "failed to clear session after 401");
            }
            return Err(ApiError::unauthorized());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }

    /// Submit a company profile for risk analysis.
    pub async fn run_analysis(&self, request: &RiskAnalysisRequest) -> Result<RawAnalysis, ApiError> {
        let url = self.config.endpoint(RISK_ANALYSIS_PATH);

        info!(url = %url, company = %request.company_name, "requesting risk analysis");
        let req = self.authorize(self.client.post(&url).json(request));
        let resp = self.check(req.send().await?).await?;

        let raw: RawAnalysis = resp.json().await?;
        info!(
            confidence = raw.confidence_score.unwrap_or_default(),
            risks = raw.risks.as_ref().map_or(0, Vec::len),
            "risk analysis complete"
        );
        Ok(raw)
    }

    /// GET an arbitrary JSON document, resolving relative URLs against the base URL.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.config.resolve(url);
        info!(url = %url, "fetching");
        let req = self.authorize(self.client.get(&url));
        let resp = self.check(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Options for a select input. Remote documents go through `cache`, keyed
    /// by resolved URL; the key mapping is applied per call.
    pub async fn fetch_options(
        &self,
        cache: &OptionCache,
        source: &OptionSource,
    ) -> Result<Vec<SelectOption>, ApiError> {
        match source {
            OptionSource::Static(options) => Ok(options.clone()),
            OptionSource::Remote {
                url,
                data_key,
                label_key,
                value_key,
            } => {
                let key = self.config.resolve(url);
                let body = cache.get_or_fetch(&key, self.get_json(&key)).await?;
                Ok(options_from_json(&body, data_key.as_deref(), label_key, value_key))
            }
        }
    }
}

#[async_trait]
impl AnalysisService for ApiClient {
    async fn submit_analysis(&self, request: &RiskAnalysisRequest) -> Result<RawAnalysis, ApiError> {
        self.run_analysis(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiErrorKind;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A captured request: lower-cased head and raw body.
    struct Captured {
        head: String,
        body: String,
    }

    async fn read_request(sock: &mut tokio::net::TcpStream) -> Captured {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + len {
                    return Captured {
                        head,
                        body: String::from_utf8_lossy(&buf[pos + 4..pos + 4 + len]).into_owned(),
                    };
                }
            }
        }
        Captured {
            head: String::from_utf8_lossy(&buf).to_lowercase(),
            body: String::new(),
        }
    }

    /// Serve exactly one canned response, then stop listening.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut sock).await;
            let resp = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            captured
        });
        (format!("http://{addr}"), handle)
    }

    fn client(base_url: &str, session: SessionStore) -> ApiClient {
        ApiClient::new(
            ApiConfig::new(base_url).with_timeout(Duration::from_secs(5)),
            session,
        )
        .unwrap()
    }

    fn request() -> RiskAnalysisRequest {
        RiskAnalysisRequest {
            company_name: "Acme".into(),
            company_email: "a@b.com".into(),
            company_phone: "555-1234".into(),
            practice_area: "IP".into(),
        }
    }

    #[tokio::test]
    async fn posts_wire_body_with_bearer_token() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"confidence_score": 87.6, "risks": ["r1"], "recommended_attorney": {"name": "A B", "role": "Counsel"}, "references": [{"label": "doc1"}]}"#,
        )
        .await;
        let session = SessionStore::in_memory();
        session.login("tok-1", None).unwrap();

        let raw = client(&base, session).run_analysis(&request()).await.unwrap();
        assert_eq!(raw.confidence_score, Some(87.6));
        assert_eq!(raw.risks.as_deref(), Some(&["r1".to_string()][..]));

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("post /api/v1/risk-analysis http/1.1"));
        assert!(captured.head.contains("authorization: bearer tok-1"));
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "companyName": "Acme",
                "companyemail": "a@b.com",
                "companyphonenumber": "555-1234",
                "practicearea": "IP"
            })
        );
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let (base, server) = serve_once("200 OK", "{}").await;
        let raw = client(&base, SessionStore::in_memory())
            .run_analysis(&request())
            .await
            .unwrap();
        assert_eq!(raw, RawAnalysis::default());
        assert!(!server.await.unwrap().head.contains("authorization:"));
    }

    #[tokio::test]
    async fn server_error_carries_message() {
        let (base, _server) =
            serve_once("500 Internal Server Error", r#"{"message": "Model unavailable"}"#).await;
        let err = client(&base, SessionStore::in_memory())
            .run_analysis(&request())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: Some("Model unavailable".into())
            }
        );
        assert_eq!(err.kind(), ApiErrorKind::Server);
        assert_eq!(err.user_message(), "Model unavailable");
    }

    #[tokio::test]
    async fn server_error_without_message_uses_fallback() {
        let (base, _server) = serve_once("502 Bad Gateway", "upstream down").await;
        let err = client(&base, SessionStore::in_memory())
            .run_analysis(&request())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Server error occurred during analysis");
    }

    #[tokio::test]
    async fn unauthorized_clears_session() {
        let (base, _server) = serve_once("401 Unauthorized", "{}").await;
        let session = SessionStore::in_memory();
        session.login("expired", Some(&serde_json::json!({"name": "John"}))).unwrap();

        let err = client(&base, session.clone())
            .run_analysis(&request())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Unauthorized { redirect: "/login".into() });
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"), SessionStore::in_memory())
            .run_analysis(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Network);
        assert_eq!(
            err.user_message(),
            "No response from server. Please check your connection."
        );
    }

    #[tokio::test]
    async fn timeout_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(sock);
        });

        let api = ApiClient::new(
            ApiConfig::new(format!("http://{addr}")).with_timeout(Duration::from_millis(200)),
            SessionStore::in_memory(),
        )
        .unwrap();
        let err = api.run_analysis(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Network);
    }

    #[tokio::test]
    async fn malformed_base_url_is_setup_error() {
        let err = client("not a url", SessionStore::in_memory())
            .run_analysis(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::RequestSetup);
    }

    #[tokio::test]
    async fn remote_options_are_fetched_once() {
        let (base, server) =
            serve_once("200 OK", r#"{"data": [{"label": "Tax Law", "value": "tax"}]}"#).await;
        let api = client(&base, SessionStore::in_memory());
        let cache = OptionCache::default();
        let source = OptionSource::remote("/practice-areas").with_data_key("data");

        let first = api.fetch_options(&cache, &source).await.unwrap();
        assert_eq!(first, vec![SelectOption::new("Tax Law", "tax")]);
        assert!(server.await.unwrap().head.starts_with("get /practice-areas "));

        // The stub server is gone; a second fetch would fail.
        let second = api.fetch_options(&cache, &source).await.unwrap();
        assert_eq!(first, second);
        assert!(cache.contains(&format!("{base}/practice-areas")).await);
    }

    #[tokio::test]
    async fn selects_sharing_a_url_keep_their_own_keys() {
        let (base, _server) = serve_once(
            "200 OK",
            r#"[{"name": "Tax Law", "id": 7, "code": "TAX"}]"#,
        )
        .await;
        let api = client(&base, SessionStore::in_memory());
        let cache = OptionCache::default();
        let remote = |value_key: &str| OptionSource::Remote {
            url: "/areas".into(),
            data_key: None,
            label_key: "name".into(),
            value_key: value_key.into(),
        };

        let by_id = api.fetch_options(&cache, &remote("id")).await.unwrap();
        let by_code = api.fetch_options(&cache, &remote("code")).await.unwrap();
        assert_eq!(by_id, vec![SelectOption::new("Tax Law", "7")]);
        assert_eq!(by_code, vec![SelectOption::new("Tax Law", "TAX")]);
    }

    #[tokio::test]
    async fn static_options_skip_the_network() {
        let api = client("http://127.0.0.1:9", SessionStore::in_memory());
        let opts = vec![SelectOption::new("IP", "IP")];
        let got = api
            .fetch_options(&OptionCache::default(), &OptionSource::Static(opts.clone()))
            .await
            .unwrap();
        assert_eq!(got, opts);
    }
}
