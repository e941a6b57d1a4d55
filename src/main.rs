//! dsm-tui - A terminal editor for Design Structure Matrices
//!
//! Components, their pairwise links and sorting keys are edited in a
//! ratatui interface and written to a JSON file after every change.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::model::DsmStore;
use crate::services::storage::FileStorage;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;

fn main() -> Result<()> {
    let base_dir = Config::config_dir().unwrap_or_else(|| std::env::temp_dir().join("dsm-tui"));
    let logging = logging::init(&base_dir);

    let config = Config::load_or_init();
    let storage = match config.data_path() {
        Some(path) => FileStorage::new(path),
        None => FileStorage::in_dir(&config.data_dir()),
    };
    tracing::info!(path = %storage.path().display(), "using matrix file");

    let store = DsmStore::open(Box::new(storage));
    let mut app = App::new(store);

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(config.tick_rate_ms));
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {:?}", err);
        if let Some(guard) = &logging {
            eprintln!("Logs: {}", guard.log_dir().display());
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
