use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use musicplayer::audio::{AudioPlayer, MediaPlayer};
use musicplayer::config::AppConfig;
use musicplayer::controller::AppController;
use musicplayer::logging;
use musicplayer::model::{AppModel, ListKind};
use musicplayer::service::{ModelSink, NowPlayingSink, PlaybackService};
use musicplayer::source::{DeezerClient, LocalLibrary, MusicRepository, MusicRepositoryImpl};
use musicplayer::view::AppView;

/// Input poll timeout; also paces redraws at roughly 60 Hz
const FRAME_TIME: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before the rest of the config so setting warnings are kept
    if let Err(e) = logging::init_logging(&AppConfig::log_dir_from_env()) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let config = AppConfig::from_env();

    tracing::info!("=== Music Player Starting ===");
    tracing::info!(
        api_url = %config.api_url,
        music_dir = %config.music_dir.display(),
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "Configuration loaded"
    );

    let api = DeezerClient::new(&config.api_url, config.http_timeout).context("Invalid catalog API configuration")?;
    let library = LocalLibrary::new(config.music_dir.clone());
    let repository: Arc<dyn MusicRepository> = Arc::new(MusicRepositoryImpl::new(api, library));

    let model = Arc::new(AppModel::new());
    let player: Arc<dyn MediaPlayer> = Arc::new(AudioPlayer::new());
    let sink: Arc<dyn NowPlayingSink> = Arc::new(ModelSink::new(model.clone()));
    let service = PlaybackService::new(player.clone(), sink).context("Failed to build artwork HTTP client")?;

    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    let controller = AppController::new(
        model.clone(),
        repository,
        player,
        service,
        actions_tx,
        config.poll_interval,
    );
    controller.start(actions_rx).await;

    // Initial listings load in the background
    controller.refresh_list(ListKind::Online);
    controller.refresh_list(ListKind::Local);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.shutdown().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Music Player shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let playback = model.get_playback_info().await;
        let ui_state = model.get_ui_state().await;
        let content_state = model.get_content_state().await;
        let should_quit = model.should_quit().await;

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &content_state);
        })?;

        if should_quit {
            break;
        }

        if event::poll(FRAME_TIME)? {
            if let Event::Key(key) = event::read()? {
                controller.handle_key_event(key).await;
            }
        }
    }

    Ok(())
}
