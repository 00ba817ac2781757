use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use moodmix::recommendation::{RecommendationClient, RecommendationRequest};
use moodmix::spotify::SpotifyClient;
use moodmix::types::{
    AudioFeaturesResponse, RecommendationsResponse, SearchResponse, TargetFeatures,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::timeout,
};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    // reqwest encodes the commas of joined id lists
    fn query(&self) -> Vec<(String, String)> {
        match self.target.split_once('?') {
            Some((_, query)) => query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.replace("%2C", ",")))
                .collect(),
            None => Vec::new(),
        }
    }

    fn query_value(&self, key: &str) -> Option<String> {
        self.query()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

struct StubResponse {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl StubResponse {
    fn json(status: u16, body: Value) -> Self {
        StubResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end..].to_vec();
    while body.len() < length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Serves one request per connection on a local port and records every request.
/// `respond` gets the zero-based request index and the request itself.
async fn stub_server<F>(respond: F) -> (String, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(usize, &RecordedRequest) -> StubResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let Some(request) = read_request(&mut stream).await else {
                continue;
            };
            let index = {
                let mut recorded = recorded.lock().unwrap();
                recorded.push(request.clone());
                recorded.len() - 1
            };

            let response = respond(index, &request);
            let mut head = format!(
                "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
                response.status,
                response.body.len()
            );
            for (name, value) in &response.headers {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
            head.push_str("\r\n");

            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(response.body.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{}", addr), requests)
}

fn features_json(id: &str) -> Value {
    json!({
        "id": id,
        "danceability": 0.5,
        "energy": 0.6,
        "valence": 0.7,
        "tempo": 120.0,
        "acousticness": 0.1,
        "instrumentalness": 0.0,
        "liveness": 0.1,
        "speechiness": 0.05
    })
}

fn audio_features_body(request: &RecordedRequest, missing: &str) -> Value {
    let ids = request.query_value("ids").unwrap_or_default();
    let entries: Vec<Value> = ids
        .split(',')
        .map(|id| {
            if id == missing {
                Value::Null
            } else {
                features_json(id)
            }
        })
        .collect();
    json!({ "audio_features": entries })
}

fn request_count(requests: &Arc<Mutex<Vec<RecordedRequest>>>) -> usize {
    requests.lock().unwrap().len()
}

#[test]
fn test_client_url_trims_trailing_slash() {
    let client = SpotifyClient::new("https://api.spotify.com/v1/", "token");
    assert_eq!(
        client.url("/recommendations"),
        "https://api.spotify.com/v1/recommendations"
    );
}

#[test]
fn test_audio_features_response_skips_unknown_fields_and_nulls() {
    let json = r#"{
        "audio_features": [
            {
                "id": "4uLU6hMCjMI75M1A2tKUQC",
                "danceability": 0.72,
                "energy": 0.61,
                "key": 7,
                "loudness": -5.3,
                "mode": 1,
                "speechiness": 0.04,
                "acousticness": 0.12,
                "instrumentalness": 0.0,
                "liveness": 0.09,
                "valence": 0.55,
                "tempo": 118.2,
                "duration_ms": 213573,
                "time_signature": 4
            },
            null
        ]
    }"#;

    let res: AudioFeaturesResponse = serde_json::from_str(json).unwrap();
    assert_eq!(res.audio_features.len(), 2);

    let features: Vec<_> = res.audio_features.into_iter().flatten().collect();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].id, "4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(features[0].tempo, 118.2);
}

#[test]
fn test_recommendations_response() {
    let json = r#"{
        "seeds": [],
        "tracks": [
            {
                "id": "r1",
                "name": "Song",
                "uri": "spotify:track:r1",
                "artists": [{ "id": "a1", "name": "Artist", "type": "artist" }],
                "album": { "id": "al1", "name": "Album", "release_date": "1994-02-01" },
                "duration_ms": 200000,
                "popularity": 61,
                "preview_url": null
            }
        ]
    }"#;

    let res: RecommendationsResponse = serde_json::from_str(json).unwrap();
    assert_eq!(res.tracks.len(), 1);
    assert_eq!(res.tracks[0].artists[0].name, "Artist");
    assert_eq!(res.tracks[0].album.release_date, "1994-02-01");
    assert_eq!(res.tracks[0].preview_url, None);
}

#[test]
fn test_search_response_without_results() {
    let json = r#"{ "tracks": { "items": [], "total": 0 } }"#;

    let res: SearchResponse = serde_json::from_str(json).unwrap();
    assert!(res.tracks.items.is_empty());
    assert_eq!(res.tracks.total, Some(0));
}

#[tokio::test]
async fn test_rate_limit_without_retry_after_is_an_error() {
    let (url, requests) = stub_server(|_, _| StubResponse::json(429, json!({}))).await;
    let client = SpotifyClient::new(url, "token");

    let result = timeout(
        Duration::from_secs(5),
        client.get_audio_features_for_tracks(&["a".to_string()]),
    )
    .await
    .expect("a 429 without Retry-After must not be retried");

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(request_count(&requests), 1);
}

#[tokio::test]
async fn test_rate_limit_with_excessive_retry_after_is_an_error() {
    let (url, requests) = stub_server(|_, _| {
        StubResponse::json(429, json!({})).with_header("retry-after", "500")
    })
    .await;
    let client = SpotifyClient::new(url, "token");

    let result = timeout(
        Duration::from_secs(5),
        client.get_audio_features_for_tracks(&["a".to_string()]),
    )
    .await
    .expect("a long Retry-After must not be waited out");

    assert_eq!(
        result.unwrap_err().status(),
        Some(StatusCode::TOO_MANY_REQUESTS)
    );
    assert_eq!(request_count(&requests), 1);
}

#[tokio::test]
async fn test_rate_limit_with_short_retry_after_is_retried() {
    let (url, requests) = stub_server(|index, request| {
        if index == 0 {
            StubResponse::json(429, json!({})).with_header("retry-after", "0")
        } else {
            StubResponse::json(200, audio_features_body(request, ""))
        }
    })
    .await;
    let client = SpotifyClient::new(url, "token");

    let features = timeout(
        Duration::from_secs(5),
        client.get_audio_features_for_tracks(&["a".to_string()]),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(features.len(), 1);
    assert_eq!(features[0].id, "a");
    assert_eq!(request_count(&requests), 2);
}

#[tokio::test]
async fn test_audio_features_are_fetched_in_batches_and_nulls_dropped() {
    let (url, requests) = stub_server(|_, request| {
        StubResponse::json(200, audio_features_body(request, "t7"))
    })
    .await;
    let client = SpotifyClient::new(url, "token");
    let ids: Vec<String> = (0..150).map(|i| format!("t{}", i)).collect();

    let features = client.get_audio_features_for_tracks(&ids).await.unwrap();

    assert_eq!(features.len(), 149);
    assert!(features.iter().all(|f| f.id != "t7"));
    assert_eq!(features[0].id, "t0");
    assert_eq!(features[148].id, "t149");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let batch_sizes: Vec<usize> = requests
        .iter()
        .map(|r| r.query_value("ids").unwrap().split(',').count())
        .collect();
    assert_eq!(batch_sizes, vec![100, 50]);
    assert!(requests.iter().all(|r| r.method == "GET"));
    assert!(requests.iter().all(|r| r.path() == "/audio-features"));
    assert_eq!(requests[0].header("authorization"), Some("Bearer token"));
}

#[tokio::test]
async fn test_recommendations_send_query_pairs() {
    let (url, requests) = stub_server(|_, _| {
        StubResponse::json(
            200,
            json!({
                "tracks": [{
                    "id": "r1",
                    "name": "Song",
                    "uri": "spotify:track:r1",
                    "artists": [{ "id": "a1", "name": "Artist" }],
                    "album": { "id": "al1", "name": "Album", "release_date": "1994" },
                    "duration_ms": 200000,
                    "popularity": 61,
                    "preview_url": null
                }]
            }),
        )
    })
    .await;
    let client = SpotifyClient::new(url, "token");
    let request = RecommendationRequest {
        limit: 20,
        seed_tracks: vec![],
        seed_artists: vec!["a1".to_string(), "a2".to_string()],
        seed_genres: vec!["rock".to_string()],
        target_audio_features: TargetFeatures {
            energy: Some(0.9),
            ..Default::default()
        },
        min_year: Some(1980),
        max_year: None,
    };

    let tracks = client.get_recommendations(&request).await.unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, "r1");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.method, "GET");
    assert_eq!(sent.path(), "/recommendations");
    assert_eq!(sent.query_value("limit").as_deref(), Some("20"));
    assert_eq!(sent.query_value("seed_artists").as_deref(), Some("a1,a2"));
    assert_eq!(sent.query_value("seed_genres").as_deref(), Some("rock"));
    assert_eq!(sent.query_value("target_energy").as_deref(), Some("0.9"));
    assert_eq!(sent.query_value("min_year").as_deref(), Some("1980"));
    assert_eq!(sent.query_value("seed_tracks"), None);
    assert_eq!(sent.query_value("max_year"), None);
}

#[tokio::test]
async fn test_add_tracks_posts_in_batches_of_100() {
    let (url, requests) = stub_server(|index, _| {
        StubResponse::json(201, json!({ "snapshot_id": format!("snap-{}", index) }))
    })
    .await;
    let client = SpotifyClient::new(url, "token");
    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{}", i)).collect();

    let snapshot = client.add_tracks("pl1", &uris).await.unwrap();
    assert_eq!(snapshot.as_deref(), Some("snap-2"));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 3);

    let mut sent = Vec::new();
    for request in requests.iter() {
        assert_eq!(request.method, "POST");
        assert_eq!(request.path(), "/playlists/pl1/tracks");
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let batch: Vec<String> = body["uris"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u.as_str().unwrap().to_string())
            .collect();
        sent.push(batch);
    }

    let batch_sizes: Vec<usize> = sent.iter().map(Vec::len).collect();
    assert_eq!(batch_sizes, vec![100, 100, 50]);
    assert_eq!(sent.concat(), uris);
}

#[tokio::test]
async fn test_create_playlist_is_not_retried_on_bad_gateway() {
    let (url, requests) = stub_server(|_, _| StubResponse::json(502, json!({}))).await;
    let client = SpotifyClient::new(url, "token");

    let result = timeout(
        Duration::from_secs(5),
        client.create_playlist("u1", "Mix".to_string(), "desc".to_string(), false),
    )
    .await
    .expect("a failed playlist creation must not be repeated");

    assert_eq!(result.unwrap_err().status(), Some(StatusCode::BAD_GATEWAY));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path(), "/users/u1/playlists");

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["name"], "Mix");
    assert_eq!(body["public"], false);
    assert_eq!(body["collaborative"], false);
}
