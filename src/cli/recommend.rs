use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    Res, config, error, info,
    recommendation::{
        Era, Mood, RecommendationClient, RecommendationContext, RecommendationEngine, SeedTrack,
    },
    spotify::SpotifyClient,
    success,
    types::{CreatePlaylistResponse, Track},
    utils, warning,
};

/// Input of the `recommend` command.
#[derive(Debug, Clone, Default)]
pub struct RecommendArgs {
    pub seed_tracks: Vec<String>,
    pub seed_searches: Vec<String>,
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub mood: Option<String>,
    pub era: Option<String>,
    pub limit: Option<u32>,
    pub playlist: Option<String>,
    pub public: bool,
    pub token: Option<String>,
    pub dry_run: bool,
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub async fn recommend(args: RecommendArgs) {
    let client = match SpotifyClient::from_env(args.token.clone()) {
        Ok(c) => c,
        Err(e) => error!("Cannot create Spotify client. Err: {}", e),
    };

    if let Some(mood) = &args.mood {
        if mood.parse::<Mood>().is_err() {
            warning!("Unknown mood '{}', no mood targets will be applied.", mood);
        }
    }
    if let Some(era) = &args.era {
        if era.parse::<Era>().is_err() {
            warning!("Unknown era '{}', no year bounds will be applied.", era);
        }
    }

    let mut seed_tracks: Vec<SeedTrack> = args.seed_tracks.iter().map(SeedTrack::new).collect();
    seed_tracks.extend(resolve_seed_searches(&client, &args.seed_searches).await);

    if seed_tracks.is_empty() && args.seed_artists.is_empty() && args.seed_genres.is_empty() {
        error!("At least one seed track, seed artist or seed genre is required.");
    }

    let context = RecommendationContext {
        seed_tracks,
        seed_artists: args.seed_artists.clone(),
        seed_genres: args.seed_genres.clone(),
        mood: args.mood.clone(),
        era: args.era.clone(),
        limit: args.limit,
    };

    let engine = RecommendationEngine::new(client);

    let pb = spinner("Deriving recommendation targets...");
    let request = match engine.build_request(&context).await {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch audio features for seed tracks. Err: {}", e);
        }
    };
    pb.finish_and_clear();

    if args.dry_run {
        match serde_json::to_string_pretty(&request) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot serialize request. Err: {}", e),
        }
        return;
    }

    if request.target_audio_features.is_empty() {
        info!("No audio feature targets.");
    } else {
        info!(
            "Targets: {}",
            utils::format_targets(&request.target_audio_features)
        );
    }

    let pb = spinner("Fetching recommendations...");
    let mut tracks: Vec<Track> = match engine.client().get_recommendations(&request).await {
        Ok(t) => t,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch recommendations. Err: {}", e);
        }
    };
    pb.finish_and_clear();

    utils::remove_duplicate_tracks(&mut tracks);
    let dropped = utils::filter_by_year(&mut tracks, request.min_year, request.max_year);
    if dropped > 0 {
        warning!("{} tracks outside of the requested era were dropped.", dropped);
    }

    if tracks.is_empty() {
        warning!("No recommendations found.");
        return;
    }

    println!("{}", Table::new(utils::track_table_rows(&tracks)));
    success!("Found {} recommendations", tracks.len());

    if let Some(name) = args.playlist {
        let description =
            utils::playlist_description(args.mood.as_deref(), &args.seed_genres, utils::today());
        info!("Create playlist {}", name);
        match save_playlist(engine.client(), name, description, args.public, &tracks).await {
            Ok(playlist) => success!(
                "Added {} tracks to playlist {}",
                tracks.len(),
                playlist.name
            ),
            Err(e) => warning!("Failed to save playlist: {}", e),
        }
    }
}

async fn resolve_seed_searches(client: &SpotifyClient, queries: &[String]) -> Vec<SeedTrack> {
    let mut seeds = Vec::new();

    for query in queries {
        match client.search_track(query).await {
            Ok(Some(track)) => {
                info!(
                    "Seed track: {} by {}",
                    track.name,
                    utils::format_artists(&track.artists)
                );
                seeds.push(SeedTrack::new(track.id));
            }
            Ok(None) => warning!("Could not find a track for '{}'", query),
            Err(e) => warning!("Search for '{}' failed: {}", query, e),
        }
    }

    seeds
}

async fn save_playlist(
    client: &SpotifyClient,
    name: String,
    description: String,
    public: bool,
    tracks: &[Track],
) -> Res<CreatePlaylistResponse> {
    let user_id = match config::spotify_user() {
        Some(id) => id,
        None => client.current_user_id().await?,
    };

    let playlist = client
        .create_playlist(&user_id, name, description, public)
        .await?;

    let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
    client.add_tracks(&playlist.id, &uris).await?;

    Ok(playlist)
}
