//! Application state for the folio TUI.

use std::time::Duration;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use folio_engine::{
    EraId, PhaseTask, RevealTracker, Scheduler, TimelineDataStore, TimelineInteractionController,
    ToggleOutcome, WidgetConfig,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use tracing::debug;

use crate::event::Action;
use crate::render::{CardHandle, RenderedTimeline, RevealPhase, TimelineRenderer};
use crate::theme::Theme;
use crate::widget::{content_height, layout_cards, CardSlot, TimelineWidget};

/// Rows scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

const FOOTER_HINTS: &str = "\u{2191}/\u{2193} select  enter toggle  esc collapse  q quit";

/// Main application state.
#[derive(Debug)]
pub struct TimelineApp {
    /// Theme colors.
    pub theme: Theme,
    timeline: RenderedTimeline,
    controller: TimelineInteractionController<CardHandle>,
    visibility: RevealTracker<CardHandle>,
    selected: Option<CardHandle>,
    /// Rows scrolled off the top of the card column.
    scroll: usize,
    /// Card area from the most recent layout.
    viewport: Rect,
    /// Should the app quit?
    pub should_quit: bool,
}

impl TimelineApp {
    /// Render the store and set up interaction state.
    pub fn new(store: &TimelineDataStore, config: &WidgetConfig, theme: Theme) -> Self {
        let mut visibility = RevealTracker::new(config.reveal_threshold);
        let (timeline, controller) = TimelineRenderer::render(store, config, &mut visibility);
        let selected = (!timeline.is_empty()).then_some(CardHandle(0));

        Self {
            theme,
            timeline,
            controller,
            visibility,
            selected,
            scroll: 0,
            viewport: Rect::default(),
            should_quit: false,
        }
    }

    pub fn timeline(&self) -> &RenderedTimeline {
        &self.timeline
    }

    pub fn controller(&self) -> &TimelineInteractionController<CardHandle> {
        &self.controller
    }

    pub fn selected(&self) -> Option<CardHandle> {
        self.selected
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Handle a key action.
    pub fn handle_action(&mut self, action: Action, scheduler: &mut dyn Scheduler) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => match self.controller.expanded() {
                Some(era) => {
                    self.toggle_era(era, scheduler);
                }
                None => self.should_quit = true,
            },
            Action::Toggle => {
                if let Some(handle) = self.selected {
                    self.activate(handle, scheduler);
                }
            }
            Action::Up => self.move_selection(-1),
            Action::Down => self.move_selection(1),
            Action::Home => self.select(0),
            Action::End => self.select(self.timeline.len().saturating_sub(1)),
            Action::PageUp => self.scroll_up(self.page_rows()),
            Action::PageDown => self.scroll_down(self.page_rows()),
            Action::None => {}
        }
    }

    /// Handle a mouse event: left click activates, the wheel scrolls.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, scheduler: &mut dyn Scheduler) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.click(mouse.column, mouse.row, scheduler);
            }
            MouseEventKind::ScrollUp => self.scroll_up(SCROLL_SPEED),
            MouseEventKind::ScrollDown => self.scroll_down(SCROLL_SPEED),
            _ => {}
        }
    }

    /// Activate the card under a screen position. Returns whether a card was hit.
    pub fn click(&mut self, column: u16, row: u16, scheduler: &mut dyn Scheduler) -> bool {
        let hit = self
            .slots()
            .into_iter()
            .find(|slot| slot.contains(column, row))
            .map(|slot| slot.handle)
            .filter(|&handle| {
                self.timeline
                    .card(handle)
                    .is_some_and(|card| card.reveal != RevealPhase::Hidden)
            });
        match hit {
            Some(handle) => {
                self.selected = Some(handle);
                self.activate(handle, scheduler);
                true
            }
            None => false,
        }
    }

    /// Toggle the card of an era.
    pub fn toggle_era(&mut self, era: EraId, scheduler: &mut dyn Scheduler) -> ToggleOutcome {
        let outcome = self.controller.toggle(era, &mut self.timeline, scheduler);
        if let Some(handle) = self.controller.handle(era) {
            self.selected = Some(handle);
            self.ensure_visible(handle);
        }
        outcome
    }

    fn activate(&mut self, handle: CardHandle, scheduler: &mut dyn Scheduler) {
        if let Some(era) = self.timeline.card(handle).map(|card| card.era) {
            self.toggle_era(era, scheduler);
        }
    }

    /// Run a deferred phase that became due.
    pub fn run_phase(&mut self, task: PhaseTask) {
        self.controller.run_phase(task, &mut self.timeline);
    }

    /// Advance animations by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.timeline.advance(dt);
    }

    /// Lay out the frame for `area` and reveal cards that scrolled into view.
    pub fn layout(&mut self, area: Rect) {
        let (main, _) = split_footer(area);
        self.viewport = TimelineWidget::inner_area(main, true);
        self.clamp_scroll();
        self.update_visibility();
    }

    /// Lay out and draw the whole frame.
    pub fn draw(&mut self, area: Rect, buf: &mut Buffer) {
        self.layout(area);
        let (main, footer) = split_footer(area);

        TimelineWidget::new(&self.timeline, &self.theme)
            .selected(self.selected)
            .scroll(self.scroll)
            .render(main, buf);

        if let Some(footer) = footer {
            Paragraph::new(Line::from(Span::styled(
                FOOTER_HINTS,
                Style::default().fg(self.theme.muted),
            )))
            .render(footer, buf);
        }
    }

    fn slots(&self) -> Vec<CardSlot> {
        layout_cards(&self.timeline, self.viewport, self.scroll)
    }

    fn update_visibility(&mut self) {
        for slot in self.slots() {
            if self.visibility.notify(&slot.handle, slot.visible_ratio) {
                debug!(card = slot.handle.0, ratio = slot.visible_ratio, "Revealing card");
                self.timeline.begin_reveal(slot.handle);
            }
        }
    }

    fn select(&mut self, index: usize) {
        if index < self.timeline.len() {
            self.selected = Some(CardHandle(index));
            self.ensure_visible(CardHandle(index));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let last = self.timeline.len().saturating_sub(1);
        let next = current.0.saturating_add_signed(delta).min(last);
        self.select(next);
    }

    fn page_rows(&self) -> usize {
        usize::from(self.viewport.height.max(1))
    }

    fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows);
        self.clamp_scroll();
    }

    fn max_scroll(&self) -> usize {
        content_height(&self.timeline, self.viewport.width)
            .saturating_sub(usize::from(self.viewport.height))
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scroll so that as much of the card as fits is on screen, top first.
    fn ensure_visible(&mut self, handle: CardHandle) {
        let Some(slot) = self.slots().into_iter().find(|slot| slot.handle == handle) else {
            return;
        };
        let height = usize::from(self.viewport.height);
        let bottom = slot.top + usize::from(slot.height);
        if slot.top < self.scroll {
            self.scroll = slot.top;
        } else if bottom > self.scroll + height {
            self.scroll = bottom.saturating_sub(height).min(slot.top);
        }
        self.clamp_scroll();
    }
}

/// Split off the bottom row for footer hints when there is room.
fn split_footer(area: Rect) -> (Rect, Option<Rect>) {
    if area.height < 3 {
        return (area, None);
    }
    let main = Rect::new(area.x, area.y, area.width, area.height - 1);
    let footer = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    (main, Some(footer))
}
