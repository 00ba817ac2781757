//! Configuration management for Moodmix.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Values are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

/// Default base URL of the Spotify Web API.
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Returns the path of the `.env` file in the local data directory.
///
/// - Linux: `~/.local/share/moodmix/.env`
/// - macOS: `~/Library/Application Support/moodmix/.env`
/// - Windows: `%LOCALAPPDATA%/moodmix/.env`
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodmix/.env");
    path
}

/// Loads environment variables from the `.env` file in the local data directory.
///
/// Creates the directory if it does not exist yet. A missing `.env` file is not an
/// error, since every value can also come from the process environment.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file exists
/// but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the Spotify Web API base URL from `SPOTIFY_API_URL`, falling back to
/// [`DEFAULT_SPOTIFY_API_URL`].
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Returns the access token from `SPOTIFY_ACCESS_TOKEN`.
///
/// # Errors
///
/// Fails if the variable is not set or empty.
pub fn spotify_access_token() -> Result<String, String> {
    match env::var("SPOTIFY_ACCESS_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(format!(
            "SPOTIFY_ACCESS_TOKEN must be set (in the environment or {})",
            env_path().display()
        )),
    }
}

/// Returns the Spotify user id from `SPOTIFY_USER_ID`, if configured.
pub fn spotify_user() -> Option<String> {
    env::var("SPOTIFY_USER_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
}
