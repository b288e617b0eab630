//! Headless mode for the folio TUI.
//!
//! Drives a [`TimelineApp`] without a real terminal. Time is advanced
//! explicitly through a [`ManualScheduler`], so rendered frames are
//! deterministic. Used by the `print` command and by tests.

use std::time::Duration;

use folio_engine::{EraId, ManualScheduler, TimelineDataStore, ToggleOutcome, WidgetConfig};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::TimelineApp;
use crate::event::Action;
use crate::theme::Theme;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Simulated frame interval.
const FRAME: Duration = Duration::from_millis(16);

/// A timeline app running against a virtual screen and clock.
#[derive(Debug)]
pub struct HeadlessSession {
    app: TimelineApp,
    scheduler: ManualScheduler,
    config: WidgetConfig,
    area: Rect,
}

impl HeadlessSession {
    /// Create a session and lay out the first frame.
    pub fn new(
        store: &TimelineDataStore,
        config: &WidgetConfig,
        theme: Theme,
        width: u16,
        height: u16,
    ) -> Self {
        let area = Rect::new(0, 0, width, height);
        let mut app = TimelineApp::new(store, config, theme);
        app.layout(area);
        Self {
            app,
            scheduler: ManualScheduler::new(),
            config: config.clone(),
            area,
        }
    }

    pub fn app(&self) -> &TimelineApp {
        &self.app
    }

    /// Send a key action to the app.
    pub fn send_action(&mut self, action: Action) {
        self.app.handle_action(action, &mut self.scheduler);
        self.app.layout(self.area);
    }

    /// Click a screen position. Returns whether a card was hit.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        let hit = self.app.click(column, row, &mut self.scheduler);
        self.app.layout(self.area);
        hit
    }

    /// Toggle the card of an era.
    pub fn toggle(&mut self, era: EraId) -> ToggleOutcome {
        let outcome = self.app.toggle_era(era, &mut self.scheduler);
        self.app.layout(self.area);
        outcome
    }

    /// Advance the virtual clock frame by frame, firing due phases.
    pub fn advance(&mut self, by: Duration) {
        let mut remaining = by;
        while !remaining.is_zero() {
            let step = remaining.min(FRAME);
            remaining -= step;
            for task in self.scheduler.advance(step) {
                self.app.run_phase(task);
            }
            self.app.tick(step);
            self.app.layout(self.area);
        }
    }

    /// Advance until every pending phase and transition has finished.
    pub fn settle(&mut self) {
        let longest = (self.config.expand_delay() + self.config.bar_fill_duration())
            .max(self.config.reveal_duration());
        self.advance(longest + FRAME);
    }

    /// Render the current frame as text.
    pub fn screen(&mut self) -> String {
        render_to_string(&mut self.app, self.area.width, self.area.height)
    }
}

/// Draw an app into a `width` x `height` buffer and return it as text.
pub fn render_to_string(app: &mut TimelineApp, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    app.draw(area, &mut buffer);
    buffer_to_string(&buffer)
}

/// Convert a buffer to a string representation.
///
/// Trailing whitespace is trimmed from each line.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    // Remove trailing newline
    if result.ends_with('\n') {
        result.pop();
    }

    result
}
