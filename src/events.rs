use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Histogram resolution
        KeyCode::Char('+') | KeyCode::Char('=') => app.more_bins(),
        KeyCode::Char('-') => app.fewer_bins(),

        // Reload
        KeyCode::Char('r') => {
            if app.reload_data() {
                app.set_status_message(format!("Reloaded {} rows", app.dataset.len()));
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => match app.export_html() {
            Ok(()) => {
                let message = format!("Exported to {}", app.export_path.display());
                app.set_status_message(message);
            }
            Err(e) => {
                app.set_status_message(format!("Export failed: {}", e));
            }
        },

        _ => {}
    }
}
