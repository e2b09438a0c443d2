//! Deezer public API client (chart, search, track lookup)

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::{Result, SourceError};
use crate::model::Track;
use crate::{log_fetch_request, log_fetch_result};

pub const DEFAULT_API_URL: &str = "https://api.deezer.com/";

#[derive(Deserialize)]
struct ChartResponse {
    tracks: TrackList,
}

#[derive(Deserialize)]
struct TrackList {
    data: Vec<Track>,
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<Track>,
}

/// Error object returned by the API with a 200 status
#[derive(Deserialize, Debug)]
struct ApiError {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

/// Catalog client
#[derive(Clone)]
pub struct DeezerClient {
    http: Client,
    base_url: String,
}

impl DeezerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(SourceError::Unknown(format!(
                "API URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("musicplayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chart(&self) -> Result<Vec<Track>> {
        log_fetch_request!("chart");
        let result = self
            .get_json::<ChartResponse>("chart", &[])
            .await
            .map(|r| r.tracks.data);
        log_fetch_result!("chart", result);
        result
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Track>> {
        log_fetch_request!("search", query);
        let result = self
            .get_json::<SearchResponse>("search", &[("q", query)])
            .await
            .map(|r| r.data);
        log_fetch_result!("search", result);
        result
    }

    pub async fn track(&self, id: u64) -> Result<Track> {
        log_fetch_request!("track", id);
        let result = self.get_json::<Track>(&format!("track/{}", id), &[]).await;
        log_fetch_result!("track", result);
        result
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        if let Some(error) = body.get("error") {
            let error: ApiError = serde_json::from_value(error.clone())?;
            tracing::warn!(url = %url, kind = %error.kind, code = ?error.code, "API returned an error payload");
            return Err(SourceError::Network(if error.message.is_empty() {
                error.kind
            } else {
                error.message
            }));
        }

        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        let result = DeezerClient::new("ftp://api.example", Duration::from_secs(1));
        assert!(matches!(result, Err(SourceError::Unknown(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = DeezerClient::new(DEFAULT_API_URL, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://api.deezer.com");
    }

    #[test]
    fn chart_shape_nests_tracks() {
        let json = r#"{"tracks": {"data": [{"id": 1, "title": "One"}], "total": 1},
                       "albums": {"data": []}}"#;
        let chart: ChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(chart.tracks.data.len(), 1);
        assert_eq!(chart.tracks.data[0].title, "One");
    }
}
