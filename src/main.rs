mod audio;
mod auth;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod player;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::RodioElement;
use config::Config;
use controller::AppController;
use model::{AppModel, PodcastClient};
use player::PlaybackController;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Podcast Player Starting ===");

    let config = Config::load()?;
    tracing::debug!(?config, "Configuration loaded");

    let token = auth::load_token(&config.token_file)?;
    let client = PodcastClient::new(&config.api_base_url, token, config.player_settings().fetch_timeout)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let element = RodioElement::new(event_tx, config.tick_interval());
    let player = Arc::new(Mutex::new(PlaybackController::new(element, config.player_settings())));

    let model = Arc::new(Mutex::new(AppModel::new()));
    let controller = AppController::new(
        model.clone(),
        player,
        client,
        config.seek_step_secs,
        config.language.clone(),
    );
    controller.start_player_event_listener(event_rx);

    // Show the UI right away; the listing arrives when it arrives
    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.refresh_podcasts().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.shutdown_player().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Podcast player shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let (ui_state, podcasts, last_refreshed, should_quit) = {
            let model_guard = model.lock().await;
            model_guard.auto_clear_old_notices().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_podcasts().await,
                model_guard.last_refreshed().await,
                model_guard.should_quit().await,
            )
        };
        let playback = controller.player.lock().await.snapshot();

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &podcasts, last_refreshed);
        })?;

        // Short poll keeps the position and captions moving smoothly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
