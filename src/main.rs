use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodmix::{cli, config, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get recommendations for seeds, mood and era
    Recommend(RecommendOptions),

    /// List the mood presets
    Moods,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Spotify track id to use as seed; can be repeated
    #[clap(long = "seed-track", action = ArgAction::Append)]
    pub seed_tracks: Vec<String>,

    /// Search query resolved to a seed track, e.g. "track:Heroes artist:Bowie"; can be repeated
    #[clap(long = "seed-search", action = ArgAction::Append)]
    pub seed_searches: Vec<String>,

    /// Spotify artist id to use as seed; can be repeated
    #[clap(long = "seed-artist", action = ArgAction::Append)]
    pub seed_artists: Vec<String>,

    /// Genre to use as seed; can be repeated
    #[clap(long = "seed-genre", action = ArgAction::Append)]
    pub seed_genres: Vec<String>,

    /// Mood preset (happy, sad, energetic, relaxed, focused, party)
    #[clap(long)]
    pub mood: Option<String>,

    /// Era (classic, retro, modern)
    #[clap(long)]
    pub era: Option<String>,

    /// Number of tracks to request [default: 20]
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: Option<u32>,

    /// Save the recommendations as a playlist with this name
    #[clap(long)]
    pub playlist: Option<String>,

    /// Make the saved playlist public
    #[clap(long, requires = "playlist")]
    pub public: bool,

    /// Access token to use instead of SPOTIFY_ACCESS_TOKEN
    #[clap(long)]
    pub token: Option<String>,

    /// Print the recommendation request as JSON instead of sending it
    #[clap(long, conflicts_with = "playlist")]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Recommend(opt) => {
            cli::recommend(cli::RecommendArgs {
                seed_tracks: opt.seed_tracks,
                seed_searches: opt.seed_searches,
                seed_artists: opt.seed_artists,
                seed_genres: opt.seed_genres,
                mood: opt.mood,
                era: opt.era,
                limit: opt.limit,
                playlist: opt.playlist,
                public: opt.public,
                token: opt.token,
                dry_run: opt.dry_run,
            })
            .await
        }
        Command::Moods => cli::moods(),
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
