//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by Moodmix. It is
//! the integration layer between the recommendation engine and Spotify's services,
//! handling HTTP communication, bearer authentication and rate limiting.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Recommendation Engine (target derivation)
//!          ↓
//! Spotify Integration Layer
//!     ├── Client (audio features, recommendations, retries)
//!     ├── Search (track lookup)
//!     └── Playlist Operations (current user, create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Client Module
//!
//! [`client`] - [`SpotifyClient`] wraps a `reqwest::Client`, the API base url and an
//! access token. It implements [`crate::recommendation::RecommendationClient`]:
//! - **Audio Features**: Batches up to 100 track ids per request, skipping unknown ids
//! - **Recommendations**: Sends the flattened request as query parameters
//!
//! ### Search Module
//!
//! [`search`] - Resolves free-text or field-filtered queries to a single track.
//!
//! ### Playlist Module
//!
//! [`playlist`] - Creates playlists for the current user and adds tracks in batches
//! of 100 uris.
//!
//! ## Error Handling
//!
//! - **502 Bad Gateway**: GET requests are retried after a 10-second delay; POSTs are
//!   not, since the change may already have been applied
//! - **429 Too Many Requests**: Waits out `Retry-After` when it is present and at most
//!   120 seconds; otherwise the 429 is returned as an error
//! - **Everything else**: Propagated as `reqwest::Error`
//!
//! Access tokens are never refreshed here. An expired token surfaces as a
//! `401 Unauthorized` error.
//!
//! ## API Coverage
//!
//! - `GET /audio-features` - Audio features for several tracks
//! - `GET /recommendations` - Recommendations from seeds and targets
//! - `GET /search` - Track search
//! - `GET /me` - Current user profile
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists

pub mod client;
pub mod playlist;
pub mod search;

pub use client::SpotifyClient;
