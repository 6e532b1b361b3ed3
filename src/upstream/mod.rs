//! Core stats API client.
//!
//! The hub does not own any statistics; everything comes from the core
//! service over HTTP. [`StatsApi`] is the seam the rest of the crate talks
//! through, so routes and the poller can be tested against a stub.

pub mod cache;

pub use cache::ResponseCache;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::{AppConfig, UpstreamConfig};
use crate::models::{
    BotReport, Challenge, ChallengeHistoryEntry, LeaderboardEntry, PlayerProfile, PlayerRound,
    PlayerSearchHit, ReportStatus, ReportVerdict, RoundSummary, ServerInfo, ServerPlayerTotals,
    WeeklyDigest, Window,
};

/// Errors talking to the core service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Upstream rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Whether the upstream said the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            UpstreamError::Rejected { code, .. } => code == "not_found",
            UpstreamError::HttpStatus { status, .. } => *status == 404,
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    data: Option<T>,
    error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    code: String,
    message: String,
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, UpstreamError> {
    if envelope.ok {
        envelope.data.ok_or_else(|| UpstreamError::Rejected {
            code: "malformed".to_string(),
            message: "ok response with no data".to_string(),
        })
    } else {
        let err = envelope.error.unwrap_or(EnvelopeError {
            code: "unknown".to_string(),
            message: "upstream returned ok: false with no error".to_string(),
        });
        Err(UpstreamError::Rejected {
            code: err.code,
            message: err.message,
        })
    }
}

/// Everything the hub asks the core service for.
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerSearchHit>, UpstreamError>;
    async fn player_profile(&self, name: &str) -> Result<PlayerProfile, UpstreamError>;
    async fn player_rounds(&self, name: &str) -> Result<Vec<PlayerRound>, UpstreamError>;

    async fn servers(&self) -> Result<Vec<ServerInfo>, UpstreamError>;
    async fn server_rounds(&self, server_id: u64) -> Result<Vec<RoundSummary>, UpstreamError>;
    async fn server_players(&self, server_id: u64)
        -> Result<Vec<ServerPlayerTotals>, UpstreamError>;

    /// Fetch a leaderboard window. `offset` steps back in whole windows:
    /// 0 is the current week/month, 1 the one before it. Ignored for the
    /// all-time board.
    async fn leaderboard(
        &self,
        window: Window,
        offset: u32,
    ) -> Result<Vec<LeaderboardEntry>, UpstreamError>;

    async fn challenges(&self) -> Result<Vec<Challenge>, UpstreamError>;
    async fn challenge_history(
        &self,
        limit: u32,
    ) -> Result<Vec<ChallengeHistoryEntry>, UpstreamError>;

    async fn bot_reports(
        &self,
        status: Option<ReportStatus>,
    ) -> Result<Vec<BotReport>, UpstreamError>;
    async fn review_bot_report(
        &self,
        report_id: u64,
        verdict: ReportVerdict,
        reviewer: &str,
    ) -> Result<BotReport, UpstreamError>;

    async fn digest_weeks(&self) -> Result<Vec<String>, UpstreamError>;
    async fn digest(&self, week: &str) -> Result<WeeklyDigest, UpstreamError>;
}

/// reqwest-backed [`StatsApi`] implementation with a disk response cache.
pub struct CoreClient {
    client: Client,
    base_url: Url,
    cache: ResponseCache,
}

impl CoreClient {
    pub fn new(config: &UpstreamConfig, data_dir: &std::path::Path) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("bfhub")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        let cache = ResponseCache::new(
            data_dir.join("upstream"),
            Duration::from_secs(config.cache_ttl_seconds),
        );

        Ok(Self {
            client,
            base_url,
            cache,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        Self::new(&config.upstream, &config.data_dir)
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, UpstreamError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET with cache. Fresh cache hits skip the network; on network failure
    /// a stale cached body is better than nothing. Only a successful fetch
    /// is written back, so serving a stale body never renews its TTL and the
    /// next request still tries the network.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = self.endpoint(path, query)?;
        let url_str = url.to_string();

        if let Some(body) = self.cache.get(&url_str).await {
            let envelope: Envelope<T> = serde_json::from_str(&body)?;
            return unwrap_envelope(envelope);
        }

        debug!(url = %url_str, "fetching from upstream");
        match self.fetch_body(url).await {
            Ok(body) => {
                let envelope: Envelope<T> = serde_json::from_str(&body)?;
                let data = unwrap_envelope(envelope)?;
                self.cache.put(&url_str, &body).await;
                Ok(data)
            }
            Err(e) => {
                if let Some(stale) = self.cache.get_stale(&url_str).await {
                    warn!(url = %url_str, error = %e, "upstream unreachable, serving stale cache");
                    let envelope: Envelope<T> = serde_json::from_str(&stale)?;
                    unwrap_envelope(envelope)
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn fetch_body(&self, url: Url) -> Result<String, UpstreamError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response.text().await?)
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        let url = self.endpoint(path, &[])?;
        debug!(url = %url, "posting to upstream");

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        unwrap_envelope(envelope)
    }
}

#[async_trait]
impl StatsApi for CoreClient {
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerSearchHit>, UpstreamError> {
        self.get_json("api/v1/players/search", &[("name", name.to_string())])
            .await
    }

    async fn player_profile(&self, name: &str) -> Result<PlayerProfile, UpstreamError> {
        self.get_json(
            "api/v1/players/search/profile",
            &[("name", name.to_string())],
        )
        .await
    }

    async fn player_rounds(&self, name: &str) -> Result<Vec<PlayerRound>, UpstreamError> {
        self.get_json(
            "api/v1/players/search/rounds",
            &[("name", name.to_string())],
        )
        .await
    }

    async fn servers(&self) -> Result<Vec<ServerInfo>, UpstreamError> {
        self.get_json("api/v1/servers", &[]).await
    }

    async fn server_rounds(&self, server_id: u64) -> Result<Vec<RoundSummary>, UpstreamError> {
        self.get_json(
            "api/v1/servers/search/rounds",
            &[("server_id", server_id.to_string())],
        )
        .await
    }

    async fn server_players(
        &self,
        server_id: u64,
    ) -> Result<Vec<ServerPlayerTotals>, UpstreamError> {
        self.get_json(
            "api/v1/servers/search/players",
            &[("server_id", server_id.to_string())],
        )
        .await
    }

    async fn leaderboard(
        &self,
        window: Window,
        offset: u32,
    ) -> Result<Vec<LeaderboardEntry>, UpstreamError> {
        let path = match window {
            Window::AllTime => "api/v1/leaderboard",
            Window::Weekly => "api/v1/leaderboard/weekly",
            Window::Monthly => "api/v1/leaderboard/monthly",
        };
        let query = if window == Window::AllTime || offset == 0 {
            vec![]
        } else {
            vec![("offset", offset.to_string())]
        };
        self.get_json(path, &query).await
    }

    async fn challenges(&self) -> Result<Vec<Challenge>, UpstreamError> {
        self.get_json("api/v1/challenges", &[]).await
    }

    async fn challenge_history(
        &self,
        limit: u32,
    ) -> Result<Vec<ChallengeHistoryEntry>, UpstreamError> {
        self.get_json("api/v1/challenges/history", &[("limit", limit.to_string())])
            .await
    }

    async fn bot_reports(
        &self,
        status: Option<ReportStatus>,
    ) -> Result<Vec<BotReport>, UpstreamError> {
        let query = match status {
            Some(s) => vec![("status", s.as_str().to_string())],
            None => vec![],
        };
        self.get_json("api/v1/reports", &query).await
    }

    async fn review_bot_report(
        &self,
        report_id: u64,
        verdict: ReportVerdict,
        reviewer: &str,
    ) -> Result<BotReport, UpstreamError> {
        #[derive(serde::Serialize)]
        struct ReviewBody<'a> {
            verdict: ReportVerdict,
            reviewer: &'a str,
        }
        self.post_json(
            &format!("api/v1/reports/{report_id}/review"),
            &ReviewBody { verdict, reviewer },
        )
        .await
    }

    async fn digest_weeks(&self) -> Result<Vec<String>, UpstreamError> {
        self.get_json("api/v1/news/digests", &[]).await
    }

    async fn digest(&self, week: &str) -> Result<WeeklyDigest, UpstreamError> {
        self.get_json(&format!("api/v1/news/digests/{week}"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use tempfile::TempDir;

    fn test_config(base_url: String) -> UpstreamConfig {
        UpstreamConfig {
            base_url,
            timeout_seconds: 5,
            user_agent: "bfhub-test".to_string(),
            cache_ttl_seconds: 300,
        }
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_servers_and_cache_reuse() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let hits = Arc::new(AtomicU32::new(0));
        let hits_in_route = hits.clone();

        let router = Router::new().route(
            "/api/v1/servers",
            get(move || {
                let hits = hits_in_route.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "ok": true,
                        "data": [{
                            "server_id": 1,
                            "name": "Test Server",
                            "address": "127.0.0.1:14567",
                            "current_map": "Berlin",
                            "gamemode": "Conquest",
                            "current_players": 10,
                            "max_players": 32,
                            "current_state": "ACTIVE",
                            "ranked": true,
                            "last_seen": "2026-08-20T19:00:00Z"
                        }]
                    }))
                }
            }),
        );
        let base = spawn_stub(router).await;

        let tmp = TempDir::new().unwrap();
        let client = CoreClient::new(&test_config(base), tmp.path()).unwrap();

        let servers = client.servers().await.unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "Test Server");

        // second call is served from cache
        let again = client.servers().await.unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_fallback_does_not_renew_cache() {
        use axum::http::StatusCode;
        use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
        use std::sync::Arc;

        let hits = Arc::new(AtomicU32::new(0));
        let fail = Arc::new(AtomicBool::new(false));
        let hits_in_route = hits.clone();
        let fail_in_route = fail.clone();

        let router = Router::new().route(
            "/api/v1/challenges",
            get(move || {
                let hits = hits_in_route.clone();
                let fail = fail_in_route.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if fail.load(Ordering::SeqCst) {
                        return Err(StatusCode::BAD_GATEWAY);
                    }
                    Ok(Json(serde_json::json!({ "ok": true, "data": [] })))
                }
            }),
        );
        let base = spawn_stub(router).await;

        let tmp = TempDir::new().unwrap();
        let mut config = test_config(base);
        config.cache_ttl_seconds = 0;
        let client = CoreClient::new(&config, tmp.path()).unwrap();

        client.challenges().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // let the cached body expire, then break the upstream
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        fail.store(true, Ordering::SeqCst);

        // stale body served, nothing re-stamped
        client.challenges().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        // upstream recovers: the very next request must hit the network
        fail.store(false, Ordering::SeqCst);
        client.challenges().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_ok_false_maps_to_rejected() {
        let router = Router::new().route(
            "/api/v1/players/search/profile",
            get(|| async {
                Json(serde_json::json!({
                    "ok": false,
                    "error": { "code": "not_found", "message": "no such player" }
                }))
            }),
        );
        let base = spawn_stub(router).await;

        let tmp = TempDir::new().unwrap();
        let client = CoreClient::new(&test_config(base), tmp.path()).unwrap();

        let err = client.player_profile("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let router = Router::new();
        let base = spawn_stub(router).await;

        let tmp = TempDir::new().unwrap();
        let client = CoreClient::new(&test_config(base), tmp.path()).unwrap();

        let err = client.challenges().await.unwrap_err();
        match err {
            UpstreamError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let tmp = TempDir::new().unwrap();
        let result = CoreClient::new(&test_config("not a url".to_string()), tmp.path());
        assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));
    }
}
