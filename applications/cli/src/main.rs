/// Encore - search, play through and remember tracks from the command line
use clap::{Parser, Subcommand, ValueEnum};
use encore_cli::{commands, App, EncoreConfig, PlayOptions};
use encore_playback::LoopMode;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore playback queue and listening history", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./encore.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep the library in memory; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Queue search results and play them through headlessly
    Play {
        query: String,
        /// Shuffle the queue
        #[arg(long)]
        shuffle: bool,
        /// Loop mode (defaults to the configured one)
        #[arg(long = "loop", value_enum)]
        loop_mode: Option<LoopArg>,
        /// Number of search results to queue
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Stop after this many plays (defaults to the queue length)
        #[arg(long)]
        max_plays: Option<usize>,
    },
    /// Show recently played tracks
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// Favorite the best match for a query
    Add { query: String },
    /// List favorites
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum LoopArg {
    Off,
    All,
    One,
}

impl From<LoopArg> for LoopMode {
    fn from(arg: LoopArg) -> Self {
        match arg {
            LoopArg::Off => LoopMode::Off,
            LoopArg::All => LoopMode::All,
            LoopArg::One => LoopMode::One,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=info,encore_cli=info,encore_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = EncoreConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let app = App::connect(config, cli.ephemeral).await?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Search { query, limit } => {
            commands::search(&app, &query, limit, &mut out).await?;
        }
        Commands::Play {
            query,
            shuffle,
            loop_mode,
            limit,
            max_plays,
        } => {
            let options = PlayOptions {
                shuffle: shuffle.then_some(true),
                loop_mode: loop_mode.map(LoopMode::from),
                limit,
                max_plays,
            };
            commands::play(&app, &query, &options, &mut out).await?;
        }
        Commands::History { limit } => {
            commands::history(&app, limit, &mut out).await?;
        }
        Commands::Favorite { action } => match action {
            FavoriteAction::Add { query } => {
                commands::favorite_add(&app, &query, &mut out).await?;
            }
            FavoriteAction::List => {
                commands::favorite_list(&app, &mut out).await?;
            }
        },
    }

    Ok(())
}
