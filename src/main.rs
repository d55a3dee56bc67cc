mod config;
mod controller;
mod logging;
mod model;
mod player;
mod scope;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::{AppConfig, Cli};
use controller::AppController;
use model::{AppModel, CatalogSource, Preferences, WindowSize};
use player::ExternalPlayer;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_cli(&cli);

    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== iwara-tui starting ===");
    tracing::debug!(
        catalog = %config.source.catalog.display(),
        metered = config.network.metered,
        player = %config.player.command,
        "Configuration loaded"
    );

    let source = CatalogSource::load(&config.source.catalog, config.source.page_size, config.session())
        .with_context(|| format!("could not open catalog {}", config.source.catalog.display()))?;

    let preferences = match Preferences::load(&config.ui.preferences_file).await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read preferences, starting with defaults");
            Preferences::in_memory()
        }
    };
    let dark_mode = preferences.dark_mode().await;

    let model = Arc::new(AppModel::new(Arc::new(source), preferences, dark_mode));
    let player = Arc::new(ExternalPlayer::new(
        config.player.command.clone(),
        config.player.args.clone(),
    ));
    tracing::info!(command = player.command(), "External player configured");

    let tick = config.tick();
    let controller = AppController::new(model.clone(), player, Arc::new(config));
    controller.try_start_event_listener().await;

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.check_session().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller.clone(), tick).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Stops the external player and restores the status bar
    controller.close_all_videos().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("iwara-tui shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
    tick: Duration,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let size = terminal.size()?;
        model
            .set_window_size(WindowSize::from_terminal(size.width, size.height))
            .await;

        let ui_state = model.get_ui_state().await;
        let screen = model.get_screen_view().await;
        let status_bar = model.status_bar.style();

        terminal.draw(|f| {
            AppView::render(f, &ui_state, status_bar, &screen);
        })?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
