//! Event handling for the folio TUI.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use folio_engine::{PhaseTask, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
    /// A deferred phase became due.
    Phase(PhaseTask),
}

/// Event handler that runs in a background task.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // Spawn blocking thread for event polling (crossterm uses blocking I/O)
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                } else if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Scheduler that delivers phases back through this handler.
    pub fn scheduler(&self) -> TimerScheduler {
        TimerScheduler::new(self.tx.clone())
    }

    /// Get the next event, blocking until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Scheduler backed by tokio timers.
///
/// Each scheduled task sleeps on the runtime and is then sent as an
/// [`Event::Phase`]. Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TimerScheduler {
    tx: mpsc::UnboundedSender<Event>,
}

impl TimerScheduler {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TimerScheduler {
    fn schedule(&mut self, delay: Duration, task: PhaseTask) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone once the UI has exited.
            let _ = tx.send(Event::Phase(task));
        });
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Collapse the expanded card, or quit when none is expanded.
    Back,
    /// Expand or collapse the selected card.
    Toggle,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::Back,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Action::Up,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::Home,
        KeyCode::End | KeyCode::Char('G') => Action::End,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::EraId;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_to_action() {
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Back);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Toggle);
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::Toggle);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::Down);
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::Up);
        assert_eq!(key_to_action(key(KeyCode::End)), Action::End);
        assert_eq!(key_to_action(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(event), Action::Quit);
    }

    #[tokio::test]
    async fn test_timer_scheduler_delivers_phase_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TimerScheduler::new(tx);
        let task = PhaseTask::FillBars { era: EraId(3) };

        let started = std::time::Instant::now();
        scheduler.schedule(Duration::from_millis(20), task);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("phase was not delivered")
            .expect("channel closed");
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(matches!(event, Event::Phase(t) if t == task));
    }
}
