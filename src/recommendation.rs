//! Recommendation target derivation.
//!
//! Turns a [`RecommendationContext`] (seed tracks, seed artists, seed genres, a mood
//! and an era label) into a [`RecommendationRequest`] ready to be sent to the Spotify
//! recommendations endpoint.
//!
//! The derivation itself is a pure transformation:
//!
//! 1. Audio features of the seed tracks are averaged into target values.
//! 2. Mood preset values are merged on top, overriding seed averages.
//! 3. Seed lists are truncated to [`MAX_SEEDS`] entries each.
//! 4. An era label is mapped to `min_year` / `max_year` bounds.
//!
//! Fetching audio features and requesting recommendations are delegated to a
//! [`RecommendationClient`], so the engine can run against the real Spotify API or
//! against a test double.

use std::{fmt, future::Future, str::FromStr};

use serde::Serialize;

use crate::types::{AudioFeatures, TargetFeatures, Track};

/// Maximum number of entries per seed list accepted by the recommendations endpoint.
pub const MAX_SEEDS: usize = 5;

/// Number of tracks requested when the context does not specify a limit.
pub const DEFAULT_LIMIT: u32 = 20;

/// Upper year bound of the `classic` era and lower bound of the `retro` era.
pub const CLASSIC_MAX_YEAR: u16 = 1980;

/// Upper year bound of the `retro` era and lower bound of the `modern` era.
pub const RETRO_MAX_YEAR: u16 = 2000;

/// The services the recommendation engine depends on.
///
/// Implementations decide on transport, authentication and retries. Errors are
/// passed through the engine untouched.
pub trait RecommendationClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the audio features for the given track ids. Ids unknown to the
    /// service may be left out of the result.
    fn get_audio_features_for_tracks(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<AudioFeatures>, Self::Error>> + Send;

    fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> impl Future<Output = Result<Vec<Track>, Self::Error>> + Send;
}

/// Mood labels with a fixed set of audio feature targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Relaxed,
    Focused,
    Party,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Relaxed,
        Mood::Focused,
        Mood::Party,
    ];

    pub const fn targets(self) -> TargetFeatures {
        let empty = TargetFeatures {
            danceability: None,
            energy: None,
            valence: None,
            tempo: None,
            acousticness: None,
            instrumentalness: None,
            liveness: None,
            speechiness: None,
        };

        match self {
            Mood::Happy => TargetFeatures {
                valence: Some(0.8),
                energy: Some(0.7),
                danceability: Some(0.7),
                ..empty
            },
            Mood::Sad => TargetFeatures {
                valence: Some(0.2),
                energy: Some(0.4),
                acousticness: Some(0.7),
                ..empty
            },
            Mood::Energetic => TargetFeatures {
                energy: Some(0.9),
                danceability: Some(0.8),
                tempo: Some(130.0),
                ..empty
            },
            Mood::Relaxed => TargetFeatures {
                energy: Some(0.3),
                acousticness: Some(0.8),
                tempo: Some(90.0),
                ..empty
            },
            Mood::Focused => TargetFeatures {
                instrumentalness: Some(0.8),
                speechiness: Some(0.1),
                energy: Some(0.6),
                ..empty
            },
            Mood::Party => TargetFeatures {
                danceability: Some(0.9),
                energy: Some(0.9),
                valence: Some(0.8),
                ..empty
            },
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "energetic" => Ok(Mood::Energetic),
            "relaxed" => Ok(Mood::Relaxed),
            "focused" => Ok(Mood::Focused),
            "party" => Ok(Mood::Party),
            other => Err(format!("Unknown mood: {}", other)),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Relaxed => "relaxed",
            Mood::Focused => "focused",
            Mood::Party => "party",
        };
        write!(f, "{}", label)
    }
}

/// Coarse release-year buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    Classic,
    Retro,
    Modern,
}

impl Era {
    /// Returns `(min_year, max_year)` for this era.
    pub const fn year_bounds(self) -> (Option<u16>, Option<u16>) {
        match self {
            Era::Classic => (None, Some(CLASSIC_MAX_YEAR)),
            Era::Retro => (Some(CLASSIC_MAX_YEAR), Some(RETRO_MAX_YEAR)),
            Era::Modern => (Some(RETRO_MAX_YEAR), None),
        }
    }
}

impl FromStr for Era {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(Era::Classic),
            "retro" => Ok(Era::Retro),
            "modern" => Ok(Era::Modern),
            other => Err(format!("Unknown era: {}", other)),
        }
    }
}

/// A seed track, optionally carrying audio features that were fetched earlier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedTrack {
    pub id: String,
    pub features: Option<AudioFeatures>,
}

impl SeedTrack {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: None,
        }
    }

    pub fn with_features(id: impl Into<String>, features: AudioFeatures) -> Self {
        Self {
            id: id.into(),
            features: Some(features),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationContext {
    pub seed_tracks: Vec<SeedTrack>,
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub mood: Option<String>,
    pub era: Option<String>,
    pub limit: Option<u32>,
}

/// Parameters for the recommendations endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub limit: u32,
    pub seed_tracks: Vec<String>,
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub target_audio_features: TargetFeatures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<u16>,
}

impl RecommendationRequest {
    /// Flattens the request into query parameters. Seed lists are comma-joined and
    /// left out when empty; each present target becomes a `target_<feature>` key.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("limit".to_string(), self.limit.to_string())];

        for (key, seeds) in [
            ("seed_tracks", &self.seed_tracks),
            ("seed_artists", &self.seed_artists),
            ("seed_genres", &self.seed_genres),
        ] {
            if !seeds.is_empty() {
                pairs.push((key.to_string(), seeds.join(",")));
            }
        }

        for (name, value) in self.target_audio_features.present() {
            pairs.push((format!("target_{}", name), value.to_string()));
        }

        if let Some(min_year) = self.min_year {
            pairs.push(("min_year".to_string(), min_year.to_string()));
        }
        if let Some(max_year) = self.max_year {
            pairs.push(("max_year".to_string(), max_year.to_string()));
        }

        pairs
    }
}

/// Averages each audio feature independently across `features`.
///
/// An empty slice yields empty targets.
pub fn average_features(features: &[AudioFeatures]) -> TargetFeatures {
    if features.is_empty() {
        return TargetFeatures::default();
    }

    let count = features.len() as f64;
    let mean = |field: fn(&AudioFeatures) -> f64| -> Option<f64> {
        Some(features.iter().map(field).sum::<f64>() / count)
    };

    TargetFeatures {
        danceability: mean(|f| f.danceability),
        energy: mean(|f| f.energy),
        valence: mean(|f| f.valence),
        tempo: mean(|f| f.tempo),
        acousticness: mean(|f| f.acousticness),
        instrumentalness: mean(|f| f.instrumentalness),
        liveness: mean(|f| f.liveness),
        speechiness: mean(|f| f.speechiness),
    }
}

/// Looks up the preset targets of a mood label, ignoring case. Unknown labels
/// yield empty targets.
pub fn mood_to_targets(mood: &str) -> TargetFeatures {
    mood.parse::<Mood>()
        .map(Mood::targets)
        .unwrap_or_default()
}

/// Maps an era label to `(min_year, max_year)`, ignoring case. Unknown labels
/// yield no bounds.
pub fn era_bounds(era: &str) -> (Option<u16>, Option<u16>) {
    era.parse::<Era>()
        .map(Era::year_bounds)
        .unwrap_or((None, None))
}

fn first_seeds(seeds: &[String]) -> Vec<String> {
    seeds.iter().take(MAX_SEEDS).cloned().collect()
}

pub struct RecommendationEngine<C> {
    client: C,
}

impl<C: RecommendationClient> RecommendationEngine<C> {
    pub fn new(client: C) -> Self {
        RecommendationEngine { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Builds the recommendation request for `context`.
    ///
    /// Seed tracks without precomputed features are resolved through the client in
    /// a single call. A failing fetch is returned as is; no targets are derived from
    /// a partial result.
    pub async fn build_request(
        &self,
        context: &RecommendationContext,
    ) -> Result<RecommendationRequest, C::Error> {
        let mut targets = TargetFeatures::default();

        if !context.seed_tracks.is_empty() {
            let mut features: Vec<AudioFeatures> = context
                .seed_tracks
                .iter()
                .filter_map(|t| t.features.clone())
                .collect();

            let missing: Vec<String> = context
                .seed_tracks
                .iter()
                .filter(|t| t.features.is_none())
                .map(|t| t.id.clone())
                .collect();

            if !missing.is_empty() {
                let fetched = self.client.get_audio_features_for_tracks(&missing).await?;
                features.extend(fetched);
            }

            targets = average_features(&features);
        }

        if let Some(mood) = &context.mood {
            targets.merge(&mood_to_targets(mood));
        }

        let (min_year, max_year) = match &context.era {
            Some(era) => era_bounds(era),
            None => (None, None),
        };

        Ok(RecommendationRequest {
            limit: context.limit.unwrap_or(DEFAULT_LIMIT),
            seed_tracks: context
                .seed_tracks
                .iter()
                .take(MAX_SEEDS)
                .map(|t| t.id.clone())
                .collect(),
            seed_artists: first_seeds(&context.seed_artists),
            seed_genres: first_seeds(&context.seed_genres),
            target_audio_features: targets,
            min_year,
            max_year,
        })
    }

    pub async fn get_recommendations(
        &self,
        context: &RecommendationContext,
    ) -> Result<Vec<Track>, C::Error> {
        let request = self.build_request(context).await?;
        self.client.get_recommendations(&request).await
    }
}
