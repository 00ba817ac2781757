//! Moodmix CLI Library
//!
//! This library builds Spotify recommendation requests from seed tracks, seed
//! artists, seed genres, a mood and an era, and submits them to the Spotify Web API.
//! The target derivation lives in [`recommendation`] and talks to Spotify only
//! through the [`recommendation::RecommendationClient`] trait.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `recommendation` - Recommendation target derivation and engine
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use moodmix::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> moodmix::Res<()> {
//!     config::load_env().await?;
//!     cli::moods();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod recommendation;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result type for application-level operations that combine several error
/// sources. Boxed so that `?` works across `reqwest`, `serde_json` and string errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Targets: {}", targets);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` to stderr and exits with code 1.
///
/// Only for failures the current command cannot recover from; code after the
/// macro does not run.
///
/// ```
/// error!("Failed to fetch recommendations. Err: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!` to stderr.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
