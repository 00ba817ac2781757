use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    recommendation::{RecommendationClient, RecommendationRequest},
    types::{AudioFeatures, AudioFeaturesResponse, RecommendationsResponse, Track},
    warning,
};

/// Maximum number of ids accepted by the audio-features endpoint per call.
pub const AUDIO_FEATURES_BATCH: usize = 100;

/// Longest `Retry-After` delay that is waited out before giving up.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Thin client for the Spotify Web API authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Creates a client from the configured API url and access token. An explicit
    /// `token` takes precedence over `SPOTIFY_ACCESS_TOKEN`.
    pub fn from_env(token: Option<String>) -> Result<Self, String> {
        let token = match token {
            Some(t) => t,
            None => config::spotify_access_token()?,
        };
        Ok(Self::new(config::spotify_apiurl(), token))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{uri}{path}", uri = self.api_url, path = path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends the request produced by `build`.
    ///
    /// A `429 Too Many Requests` is retried only when `Retry-After` parses to at
    /// most [`MAX_RETRY_AFTER_SECS`]; otherwise it is returned as an error. A
    /// `502 Bad Gateway` is retried after 10 seconds when `retry_bad_gateway` is
    /// set, which callers only do for requests that are safe to repeat.
    pub(crate) async fn send<F>(
        &self,
        build: F,
        retry_bad_gateway: bool,
    ) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> RequestBuilder,
    {
        loop {
            let response = build().bearer_auth(&self.token).send().await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                match retry_after {
                    Some(secs) if secs <= MAX_RETRY_AFTER_SECS => {
                        sleep(Duration::from_secs(secs)).await;
                        continue;
                    }
                    Some(secs) => warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again later.",
                        secs
                    ),
                    None => warning!("Rate limited by Spotify without a usable Retry-After."),
                }
            }

            match response.error_for_status() {
                Ok(valid_response) => return Ok(valid_response),
                Err(err) => {
                    if retry_bad_gateway && err.status() == Some(StatusCode::BAD_GATEWAY) {
                        sleep(Duration::from_secs(10)).await;
                        continue; // retry
                    }
                    return Err(err);
                }
            }
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, reqwest::Error> {
        let url = self.url(path);
        let response = self.send(|| self.http.get(&url).query(query), true).await?;
        response.json::<T>().await
    }
}

impl RecommendationClient for SpotifyClient {
    type Error = reqwest::Error;

    async fn get_audio_features_for_tracks(
        &self,
        ids: &[String],
    ) -> Result<Vec<AudioFeatures>, Self::Error> {
        let mut features = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(AUDIO_FEATURES_BATCH) {
            let query = vec![("ids".to_string(), chunk.join(","))];
            let res: AudioFeaturesResponse = self.get_json("/audio-features", &query).await?;
            // unknown ids come back as null
            features.extend(res.audio_features.into_iter().flatten());
        }

        Ok(features)
    }

    async fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Track>, Self::Error> {
        let res: RecommendationsResponse = self
            .get_json("/recommendations", &request.query_pairs())
            .await?;
        Ok(res.tracks)
    }
}
