//! # CLI Module
//!
//! This module provides the command-line interface layer for Moodmix. It implements
//! the user-facing commands and coordinates between the recommendation engine, the
//! Spotify client and user interaction.
//!
//! ## Commands
//!
//! - [`recommend`] - Derives recommendation targets from seeds, mood and era, fetches
//!   recommendations and optionally saves them as a playlist
//! - [`moods`] - Lists the available mood presets and their targets
//!
//! ## Data Flow
//!
//! 1. **Client Setup**: Read the API url and access token from configuration
//! 2. **Seed Resolution**: Turn search queries into seed tracks
//! 3. **Target Derivation**: Average seed audio features and apply the mood preset
//! 4. **API Interaction**: Request recommendations from Spotify
//! 5. **Output Generation**: Print a table of tracks, create the playlist if asked
//!
//! ## Error Handling
//!
//! - Missing configuration and failed upstream calls needed for the result are fatal
//!   and reported through [`crate::error!`]
//! - Unknown mood or era labels, search misses and playlist failures are reported
//!   through [`crate::warning!`] and skipped
//!
//! ## Usage Patterns
//!
//! ```bash
//! moodmix moods
//! moodmix recommend --seed-genre rock --mood happy
//! moodmix recommend --seed-search "track:Heroes artist:Bowie" --era retro --limit 30
//! moodmix recommend --seed-artist 0oSGxfWSnnOXhD2fKuz2Gy --mood party --playlist "Friday"
//! ```

mod moods;
mod recommend;

pub use moods::moods;
pub use recommend::RecommendArgs;
pub use recommend::recommend;
