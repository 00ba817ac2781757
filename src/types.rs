use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Audio features of a single track as published by the Spotify audio-features endpoint.
///
/// Only the descriptors used for recommendation targets are kept; the remaining
/// fields of the payload (key, loudness, mode, ...) are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    #[serde(default)]
    pub id: String,
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub speechiness: f64,
}

/// A partial set of audio features used as recommendation targets.
///
/// Every field is optional; only the present ones end up in a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acousticness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speechiness: Option<f64>,
}

impl TargetFeatures {
    /// Overwrites every field that is present in `overrides`; absent fields keep
    /// their current value.
    pub fn merge(&mut self, overrides: &TargetFeatures) {
        self.danceability = overrides.danceability.or(self.danceability);
        self.energy = overrides.energy.or(self.energy);
        self.valence = overrides.valence.or(self.valence);
        self.tempo = overrides.tempo.or(self.tempo);
        self.acousticness = overrides.acousticness.or(self.acousticness);
        self.instrumentalness = overrides.instrumentalness.or(self.instrumentalness);
        self.liveness = overrides.liveness.or(self.liveness);
        self.speechiness = overrides.speechiness.or(self.speechiness);
    }

    /// Returns the present targets as `(feature name, value)` pairs in a stable order.
    pub fn present(&self) -> Vec<(&'static str, f64)> {
        [
            ("danceability", self.danceability),
            ("energy", self.energy),
            ("valence", self.valence),
            ("tempo", self.tempo),
            ("acousticness", self.acousticness),
            ("instrumentalness", self.instrumentalness),
            ("liveness", self.liveness),
            ("speechiness", self.speechiness),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }
}

/// Artist reference embedded in track payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: String,
    pub name: String,
}

/// Album a track belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub id: String,
    pub name: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` depending on the album's date precision.
    #[serde(default)]
    pub release_date: String,
}

/// A track as returned by the recommendations and search endpoints.
///
/// Only the fields shown in the track table or needed to save a playlist are kept.
/// `uri` (`spotify:track:<id>`) is what the add-tracks endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub album: TrackAlbum,
    #[serde(default)]
    pub duration_ms: u64,
    pub popularity: Option<u32>,
    pub preview_url: Option<String>,
}

/// Response of `GET /audio-features`.
///
/// Ids Spotify does not know come back as `null` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

/// Response of `GET /recommendations`; the seeds echo is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<Track>,
}

/// Response of `GET /search?type=track`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<Track>,
    pub total: Option<u64>,
}

/// Profile of the user the access token belongs to (`GET /me`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

/// Body of `POST /users/{user_id}/playlists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub collaborative: bool,
}

/// Body of `POST /playlists/{playlist_id}/tracks`, at most 100 uris.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

/// Row of the recommended tracks table.
#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub year: String,
}

#[derive(Tabled)]
pub struct MoodTableRow {
    pub mood: String,
    pub targets: String,
}
