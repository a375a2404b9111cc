pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::ThemeColors;

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

const TICK_MS: u64 = 250;
const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(20);

pub async fn run_tui(mut app: App, http: reqwest::Client) -> anyhow::Result<()> {
    // Buffer log output while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(TICK_MS);

    // Blog posts and the activity calendar load in the background
    let config = app.config.clone();
    let mut pending_page: Option<tokio::task::JoinHandle<_>> = Some(tokio::spawn(async move {
        tokio::time::timeout(PAGE_LOAD_TIMEOUT, crate::fetch::load_page_data(&http, &config)).await
    }));

    let result: anyhow::Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.on_tick(),
        }

        if let Some(handle) = &mut pending_page {
            if handle.is_finished() {
                if let Some(handle) = pending_page.take() {
                    match handle.await {
                        Ok(Ok(page)) => app.set_page_data(page),
                        Ok(Err(_elapsed)) => {
                            app.set_page_data(Default::default());
                            app.show_flash("Failed to load posts and activity: timed out".to_string());
                        }
                        Err(e) => {
                            app.set_page_data(Default::default());
                            app.show_flash(format!("Failed to load posts and activity: {}", e));
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Stop the view's background work before leaving
    app.shutdown();
    if let Some(handle) = pending_page {
        handle.abort();
    }

    ratatui::restore();

    // Flush buffered log lines now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Tab => app.next_view(),

            KeyCode::Enter => app.activate_selected(),
            KeyCode::Char('o') => app.open_selected(),
            KeyCode::Char('t') => app.toggle_theme(),
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
