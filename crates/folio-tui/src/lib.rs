//! folio-tui: Terminal UI for the expertise timeline
//!
//! This crate renders the timeline with ratatui, including:
//! - The renderer that turns eras into cards bound to the controller
//! - The card widget with animated skill bars and one-shot reveals
//! - Keyboard and mouse activation
//! - Headless mode for testing and printing frames

mod app;
mod event;
pub mod headless;
mod render;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widget;

pub use app::{TimelineApp, SCROLL_SPEED};
pub use event::{key_to_action, Action, Event, EventHandler, TimerScheduler};
pub use folio_engine;
pub use render::{BarView, CardHandle, CardView, RenderedTimeline, RevealPhase, TimelineRenderer};
pub use theme::{Theme, ThemeName};
pub use widget::{layout_cards, CardSlot, TimelineWidget};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use folio_engine::{TimelineDataStore, WidgetConfig};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Instant;
use tracing::info;

/// Frame tick interval (~60 fps) so transitions animate smoothly.
const TICK_RATE_MS: u64 = 16;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. Must be called from within a tokio runtime.
pub async fn run_tui(
    store: &TimelineDataStore,
    config: &WidgetConfig,
    theme: Theme,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TimelineApp::new(store, config, theme);
    let mut events = EventHandler::new(TICK_RATE_MS);
    info!(eras = store.len(), "Starting timeline UI");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TimelineApp,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scheduler = events.scheduler();
    let mut last_frame = Instant::now();

    loop {
        // Animations follow wall-clock time regardless of which event woke us.
        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;

        terminal.draw(|frame| {
            let area = frame.area();
            app.draw(area, frame.buffer_mut());
        })?;

        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => app.handle_action(key_to_action(key), &mut scheduler),
            Event::Mouse(mouse) => app.handle_mouse(mouse, &mut scheduler),
            Event::Phase(task) => app.run_phase(task),
            Event::Tick | Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
