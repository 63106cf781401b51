//! HTTP client for the UGC posts endpoint.

use std::time::Duration;

use serde_json::json;

use pilot_core::publish::{PublishError, PublishReceipt, PublishRequest, Publisher};

/// Response header carrying the created post's URN.
const RESTLI_ID_HEADER: &str = "x-restli-id";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Adapter configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LinkedInConfig {
    /// API origin (default: `https://api.linkedin.com`). Overridable so
    /// tests can point the client at a local mock server.
    pub api_base: String,
    /// OAuth bearer token. Token acquisition/refresh is handled by the
    /// external auth provider; this crate only consumes the result.
    pub access_token: String,
    /// Per-request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl LinkedInConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `LINKEDIN_API_BASE`     | `https://api.linkedin.com` |
    /// | `LINKEDIN_ACCESS_TOKEN` | (required)                 |
    /// | `LINKEDIN_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let api_base = std::env::var("LINKEDIN_API_BASE")
            .unwrap_or_else(|_| "https://api.linkedin.com".into());

        let access_token =
            std::env::var("LINKEDIN_ACCESS_TOKEN").expect("LINKEDIN_ACCESS_TOKEN must be set");

        let timeout_secs: u64 = std::env::var("LINKEDIN_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LINKEDIN_TIMEOUT_SECS must be a valid u64");

        Self {
            api_base,
            access_token,
            timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Publishes posts through the UGC API.
pub struct LinkedInClient {
    client: reqwest::Client,
    config: LinkedInConfig,
}

impl LinkedInClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: LinkedInConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Assemble the UGC post body.
    ///
    /// An image URL switches the share to the IMAGE media category with the
    /// URL attached; the platform fetches the asset itself.
    fn build_body(request: &PublishRequest) -> serde_json::Value {
        let share_content = match &request.image_url {
            Some(url) => json!({
                "shareCommentary": { "text": request.content },
                "shareMediaCategory": "IMAGE",
                "media": [{
                    "status": "READY",
                    "originalUrl": url,
                }],
            }),
            None => json!({
                "shareCommentary": { "text": request.content },
                "shareMediaCategory": "NONE",
            }),
        };

        json!({
            "author": request.author_id,
            "lifecycleState": "PUBLISHED",
            "specificContent": { "com.linkedin.ugc.ShareContent": share_content },
            "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" },
        })
    }

    /// Public feed URL for a created post URN.
    fn feed_url(urn: &str) -> String {
        format!("https://www.linkedin.com/feed/update/{urn}")
    }
}

#[async_trait::async_trait]
impl Publisher for LinkedInClient {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        let url = format!("{}/v2/ugcPosts", self.config.api_base);
        let body = Self::build_body(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .header("X-Client-Request-Id", request.client_request_id.to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PublishError::Timeout {
                        secs: self.config.timeout_secs,
                    }
                } else {
                    PublishError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let urn = response
                .headers()
                .get(RESTLI_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or_else(|| PublishError::Rejected {
                    reason: format!("response missing {RESTLI_ID_HEADER} header"),
                })?;

            tracing::debug!(urn = %urn, "Publish accepted");

            return Ok(PublishReceipt {
                platform_url: Self::feed_url(&urn),
                platform_post_id: urn,
            });
        }

        // 429 and 5xx are transient; other 4xx means the request itself is
        // bad and retrying it verbatim cannot succeed.
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(PublishError::Http {
                status: status.as_u16(),
            });
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".into());
        Err(PublishError::Rejected {
            reason: format!("HTTP {}: {detail}", status.as_u16()),
        })
    }
}
