/// Lark - headless playlist player
use clap::{Parser, Subcommand};
use lark_audio::{PacedOutput, SymphoniaProvider};
use lark_cli::{display, playlist, CliConfig};
use lark_playback::{ChannelProgressSink, PlaybackEvent, PlayerStatus, PlaylistController};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lark")]
#[command(about = "Headless playlist player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play files as a playlist
    Play {
        /// Shuffle the playlist
        #[arg(long)]
        shuffle: bool,

        /// Loop the playlist
        #[arg(long)]
        repeat: bool,

        /// Sort by tag before playing (e.g. filename, title)
        #[arg(long, value_name = "TAG")]
        sort: Option<String>,

        /// Reverse the sort order
        #[arg(long, requires = "sort")]
        reverse: bool,

        /// Configuration file path
        #[arg(short, long, env = "LARK_CONFIG")]
        config: Option<PathBuf>,

        /// Files to play (mp3, ogg)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lark=info,lark_cli=info,lark_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            shuffle,
            repeat,
            sort,
            reverse,
            config,
            files,
        } => {
            let mut settings = CliConfig::load(config.as_deref())?;
            settings.playback.shuffle |= shuffle;
            settings.playback.repeat |= repeat;
            settings.validate()?;

            play(settings, files, sort, reverse).await?;
        }
    }

    Ok(())
}

async fn play(
    config: CliConfig,
    files: Vec<PathBuf>,
    sort: Option<String>,
    reverse: bool,
) -> anyhow::Result<()> {
    let tracks = playlist::from_paths(files)?;
    tracing::info!(
        tracks = tracks.len(),
        shuffle = config.playback.shuffle,
        repeat = config.playback.repeat,
        "Starting playback"
    );

    let controller = PlaylistController::with_config(
        Arc::new(PacedOutput::new(config.output)),
        Arc::new(SymphoniaProvider::new()),
        tracks,
        config.playback,
    );

    if let Some(tag) = sort.as_deref() {
        controller.sort_by(playlist::tag_key(tag), reverse);
    }

    let (sink, events) = ChannelProgressSink::channel();
    let runner = controller.clone();
    let playback = tokio::task::spawn_blocking(move || runner.run(&sink));

    // The sink is dropped when the loop exits, which ends this task
    let reporter = tokio::task::spawn_blocking(move || {
        for event in &events {
            if let PlaybackEvent::TimeAdvanced {
                position_ms,
                duration_ms,
            } = event
            {
                tracing::debug!(
                    "{} / {}",
                    display::format_time(position_ms),
                    display::format_time(duration_ms)
                );
            }
            if let Some(line) = display::describe(&event) {
                println!("{}", line);
            }
        }
    });

    controller.set_paused(false);

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Interrupted");
        }
        () = finished(controller.clone()) => {
            tracing::info!("Playlist finished");
        }
    }

    controller.quitting();
    playback.await?;
    reporter.await?;

    Ok(())
}

/// Resolves once the playlist has run out and will not loop
async fn finished(controller: PlaylistController) {
    let mut ticker = tokio::time::interval(Duration::from_millis(200));
    loop {
        ticker.tick().await;
        if controller.status() == PlayerStatus::Idle
            && controller.pending().is_empty()
            && !controller.repeat()
        {
            return;
        }
    }
}
