use std::collections::HashSet;

use chrono::{NaiveDate, Utc};

use crate::{
    recommendation::Mood,
    types::{MoodTableRow, SimpleArtist, TargetFeatures, Track, TrackTableRow},
};

/// Extracts the year from a Spotify release date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
///
/// # Example
///
/// ```
/// use moodmix::utils::release_year;
///
/// assert_eq!(release_year("1994-02-01"), Some(1994));
/// assert_eq!(release_year("1977"), Some(1977));
/// assert_eq!(release_year(""), None);
/// ```
pub fn release_year(release_date: &str) -> Option<u16> {
    release_date.get(0..4)?.parse::<u16>().ok()
}

/// Whether the album year of `track` lies within the inclusive bounds. Tracks
/// without a usable release date are kept.
pub fn within_year_bounds(
    track: &Track,
    min_year: Option<u16>,
    max_year: Option<u16>,
) -> bool {
    match release_year(&track.album.release_date) {
        Some(year) => {
            min_year.is_none_or(|min| year >= min) && max_year.is_none_or(|max| year <= max)
        }
        None => true,
    }
}

/// Drops tracks whose album year lies outside the year bounds.
///
/// The recommendations endpoint does not enforce `min_year`/`max_year`, so the
/// bounds of an era are applied to the returned tracks here.
///
/// # Arguments
///
/// * `tracks` - Tracks to filter in place, order is preserved
/// * `min_year` - Inclusive lower bound, `None` for no bound
/// * `max_year` - Inclusive upper bound, `None` for no bound
///
/// # Returns
///
/// The number of tracks that were removed.
pub fn filter_by_year(
    tracks: &mut Vec<Track>,
    min_year: Option<u16>,
    max_year: Option<u16>,
) -> usize {
    let before = tracks.len();
    tracks.retain(|t| within_year_bounds(t, min_year, max_year));
    before - tracks.len()
}

/// Removes tracks with an id seen earlier in the list, keeping the first occurrence.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

/// Joins the artist names with `, `.
pub fn format_artists(artists: &[SimpleArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders targets as `name=value` pairs, e.g. `energy=0.9, tempo=130`.
pub fn format_targets(targets: &TargetFeatures) -> String {
    targets
        .present()
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Converts tracks into table rows of name, artists, album and release year.
///
/// The year column is empty when the album has no parsable release date.
pub fn track_table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .map(|t| TrackTableRow {
            name: t.name.clone(),
            artists: format_artists(&t.artists),
            album: t.album.name.clone(),
            year: release_year(&t.album.release_date)
                .map(|y| y.to_string())
                .unwrap_or_default(),
        })
        .collect()
}

/// One row per mood preset with its targets, in the order of [`Mood::ALL`].
pub fn mood_table_rows() -> Vec<MoodTableRow> {
    Mood::ALL
        .iter()
        .map(|m| MoodTableRow {
            mood: m.to_string(),
            targets: format_targets(&m.targets()),
        })
        .collect()
}

/// Builds a playlist description from the mood and genres it was generated for.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use moodmix::utils::playlist_description;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(
///     playlist_description(Some("Happy"), &["pop".to_string()], date),
///     "A happy playlist featuring pop music. Generated on 2024-03-01."
/// );
/// ```
pub fn playlist_description(
    mood: Option<&str>,
    genres: &[String],
    date: NaiveDate,
) -> String {
    let basis = match (mood, genres.is_empty()) {
        (Some(mood), false) => format!(
            "A {} playlist featuring {} music.",
            mood.to_lowercase(),
            genres.join(", ")
        ),
        (Some(mood), true) => format!("A {} playlist.", mood.to_lowercase()),
        (None, false) => format!("A playlist featuring {} music.", genres.join(", ")),
        (None, true) => "A playlist based on your seeds.".to_string(),
    };

    format!("{} Generated on {}.", basis, date.format("%Y-%m-%d"))
}

/// Current date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
