//! Faculty portal TUI entry point.

use portal_core::{ProfileBackend, QueryCache};
use portal_tui::api_client::RestClient;
use portal_tui::config::TuiConfig;
use portal_tui::error::TuiError;
use portal_tui::events::TuiEvent;
use portal_tui::keys::map_key;
use portal_tui::logging::init_logging;
use portal_tui::persistence;
use portal_tui::state::{App, Command};
use portal_tui::views::render_view;
use portal_tui::workflow::ProfileWorkflow;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// What the loop should do after an event.
enum Flow {
    Continue,
    Quit,
    Logout,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = TuiConfig::load()?;
    init_logging(&config.log_path)?;
    info!(base_url = %config.api_base_url, "starting portal-tui");

    let backend: Arc<dyn ProfileBackend> = Arc::new(RestClient::new(&config)?);
    let cache = QueryCache::new(config.cache_config());
    let workflow = ProfileWorkflow::new(cache, backend);
    let mut app = App::new(config, workflow);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "ignoring unreadable persisted state"),
    }
    app.workflow.mount();

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let mut ticker = tokio::time::interval(app.config.refresh_interval());

    let flow = loop {
        terminal.draw(|f| render_view(f, &app))?;

        let flow = tokio::select! {
            _ = ticker.tick() => handle_event(&mut app, TuiEvent::Tick, &event_tx),
            Some(event) = event_rx.recv() => handle_event(&mut app, event, &event_tx),
            Some(update) = app.workflow.next_update() => {
                handle_event(&mut app, TuiEvent::Query(update), &event_tx)
            }
        };
        match flow {
            Flow::Continue => {}
            other => break other,
        }
    };

    match flow {
        Flow::Logout => {
            persistence::clear(&app.config.persistence_path)?;
            info!("logged out");
        }
        _ => {
            let state = app.persisted_state();
            if let Err(err) = persistence::save(&app.config.persistence_path, &state) {
                warn!(error = %err, "failed to save state");
            }
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let event = match evt {
                    CrosstermEvent::Key(key) => TuiEvent::Input(key),
                    CrosstermEvent::Resize(width, height) => TuiEvent::Resize { width, height },
                    _ => continue,
                };
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_event(app: &mut App, event: TuiEvent, sender: &mpsc::Sender<TuiEvent>) -> Flow {
    match event {
        TuiEvent::Input(key) => {
            let Some(action) = map_key(key, app.mode) else {
                return Flow::Continue;
            };
            match app.handle_action(action) {
                Some(Command::Quit) => return Flow::Quit,
                Some(Command::Logout) => return Flow::Logout,
                Some(Command::Submit(task)) => {
                    let sender = sender.clone();
                    tokio::spawn(async move {
                        let result = task.run().await;
                        let _ = sender.send(TuiEvent::SubmitFinished(result)).await;
                    });
                }
                None => {}
            }
        }
        TuiEvent::Query(update) => app.workflow.apply_update(update),
        TuiEvent::SubmitFinished(result) => {
            app.finish_submit(result);
        }
        TuiEvent::Resize { .. } | TuiEvent::Tick => {}
    }
    Flow::Continue
}
