//! Test utilities for folio-tui rendering and interaction tests.

use folio_engine::{TimelineDataStore, WidgetConfig};
use ratatui::{backend::TestBackend, Terminal};

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// The bundled timeline, which has several multi-skill eras.
pub fn sample_store() -> TimelineDataStore {
    TimelineDataStore::builtin()
}

/// Default widget configuration.
pub fn test_config() -> WidgetConfig {
    WidgetConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TimelineApp;
    use crate::theme::Theme;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_app_draws_through_terminal() {
        let mut terminal = create_test_terminal();
        let mut app = TimelineApp::new(&sample_store(), &test_config(), Theme::default());
        app.tick(std::time::Duration::ZERO);

        terminal
            .draw(|frame| {
                let area = frame.area();
                app.draw(area, frame.buffer_mut());
            })
            .unwrap();
        // First frame starts the reveal; the second shows the settled cards.
        app.tick(std::time::Duration::from_secs(1));
        terminal
            .draw(|frame| {
                let area = frame.area();
                app.draw(area, frame.buffer_mut());
            })
            .unwrap();

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("Expertise Timeline"));
        assert!(text.contains("enter toggle"));
        assert!(text.contains(&sample_store().eras()[0].title));
    }
}
