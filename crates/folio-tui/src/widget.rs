//! Timeline widget and card layout.
//!
//! Cards are stacked vertically in a virtual column that scrolls by rows.
//! [`layout_cards`] is shared by drawing, click hit-testing and visibility
//! reporting so all three agree on where a card is.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::render::{BarView, CardHandle, CardView, RenderedTimeline};
use crate::theme::Theme;

/// Blank rows between consecutive cards.
pub const CARD_GAP: u16 = 1;

/// Columns used by a card's borders and horizontal padding.
const CARD_CHROME: u16 = 4;

/// Rows a card slides down by at the start of its reveal.
const REVEAL_SLIDE: f64 = 2.0;

/// Where a card sits in the scrolled column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSlot {
    pub handle: CardHandle,
    /// First row of the card in the virtual column.
    pub top: usize,
    pub height: u16,
    /// On-screen part of the card, if any.
    pub visible: Option<Rect>,
    /// Fraction of the card's rows that are on screen.
    pub visible_ratio: f64,
}

impl CardSlot {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.visible.is_some_and(|rect| {
            column >= rect.x
                && column < rect.x + rect.width
                && row >= rect.y
                && row < rect.y + rect.height
        })
    }
}

/// Width available for text inside a card.
fn text_width(card_width: u16) -> usize {
    usize::from(card_width.saturating_sub(CARD_CHROME))
}

fn wrap_description(description: &str, width: usize) -> Vec<String> {
    if description.trim().is_empty() || width == 0 {
        return Vec::new();
    }
    textwrap::wrap(description, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

fn skill_rows(bar: &BarView) -> u16 {
    if bar.description.is_empty() {
        2
    } else {
        3
    }
}

/// Rows a card occupies at `width`.
pub fn card_height(card: &CardView, width: u16) -> u16 {
    let description = u16::try_from(wrap_description(&card.description, text_width(width)).len())
        .unwrap_or(u16::MAX);
    let skills: u16 = if card.expanded {
        card.bars.iter().map(skill_rows).sum()
    } else {
        0
    };
    // Borders, description, hint line, skill rows.
    2u16.saturating_add(description)
        .saturating_add(1)
        .saturating_add(skills)
}

/// Total rows of the virtual column at `width`.
pub fn content_height(timeline: &RenderedTimeline, width: u16) -> usize {
    let cards: usize = timeline
        .cards()
        .iter()
        .map(|card| usize::from(card_height(card, width)))
        .sum();
    cards + usize::from(CARD_GAP) * timeline.len().saturating_sub(1)
}

/// Position every card for a viewport `area` scrolled down by `scroll` rows.
pub fn layout_cards(timeline: &RenderedTimeline, area: Rect, scroll: usize) -> Vec<CardSlot> {
    let view_top = scroll;
    let view_bottom = scroll + usize::from(area.height);
    let mut top = 0usize;
    let mut slots = Vec::with_capacity(timeline.len());

    for (handle, card) in timeline.handles().zip(timeline.cards()) {
        let height = card_height(card, area.width);
        let bottom = top + usize::from(height);

        let first = top.max(view_top);
        let last = bottom.min(view_bottom);
        let (visible, visible_ratio) = if first < last && height > 0 {
            // Both offsets are bounded by area.height, which is a u16.
            let y = area.y + u16::try_from(first - view_top).unwrap_or(u16::MAX);
            let rows = u16::try_from(last - first).unwrap_or(u16::MAX);
            let rect = Rect::new(area.x, y, area.width, rows);
            (Some(rect), f64::from(rows) / f64::from(height))
        } else {
            (None, 0.0)
        };

        slots.push(CardSlot {
            handle,
            top,
            height,
            visible,
            visible_ratio,
        });
        top = bottom + usize::from(CARD_GAP);
    }

    slots
}

/// Outer timeline pane widget.
pub struct TimelineWidget<'a> {
    timeline: &'a RenderedTimeline,
    theme: &'a Theme,
    selected: Option<CardHandle>,
    scroll: usize,
    with_border: bool,
}

impl<'a> TimelineWidget<'a> {
    /// Create a new timeline widget.
    pub fn new(timeline: &'a RenderedTimeline, theme: &'a Theme) -> Self {
        Self {
            timeline,
            theme,
            selected: None,
            scroll: 0,
            with_border: true,
        }
    }

    /// Mark a card as selected.
    #[must_use]
    pub fn selected(mut self, selected: Option<CardHandle>) -> Self {
        self.selected = selected;
        self
    }

    /// Rows scrolled off the top.
    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Set whether to render with a border.
    #[must_use]
    pub fn with_border(mut self, border: bool) -> Self {
        self.with_border = border;
        self
    }

    /// Area the cards are laid out in for a given outer area.
    pub fn inner_area(area: Rect, with_border: bool) -> Rect {
        if with_border {
            Block::default().borders(Borders::ALL).inner(area)
        } else {
            area
        }
    }

    fn draw_card(&self, card: &CardView, handle: CardHandle, slot: &CardSlot, buf: &mut Buffer) {
        let Some(visible) = slot.visible else {
            return;
        };
        let progress = self.timeline.reveal_progress(handle);
        if progress <= 0.0 {
            // Not revealed yet: the card keeps its space but draws nothing.
            return;
        }

        // Slide offset in rows, shrinking to zero as the reveal completes.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let slide = ((1.0 - progress) * REVEAL_SLIDE).round() as u16;

        let full = Rect::new(0, 0, visible.width, slot.height.saturating_add(slide));
        let mut card_buf = Buffer::empty(full);
        let card_area = Rect::new(0, slide, visible.width, slot.height);
        let settled = progress >= 1.0;
        self.draw_card_contents(card, Some(handle) == self.selected, settled, card_area, &mut card_buf);

        // Copy the on-screen rows of the card into the pane.
        let skipped = slot.top.max(self.scroll) - slot.top;
        let skipped = u16::try_from(skipped).unwrap_or(u16::MAX);
        for row in 0..visible.height {
            let source_row = skipped.saturating_add(row);
            for col in 0..visible.width {
                if let (Some(source), Some(target)) = (
                    card_buf.cell((col, source_row)),
                    buf.cell_mut((visible.x + col, visible.y + row)),
                ) {
                    *target = source.clone();
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn draw_card_contents(
        &self,
        card: &CardView,
        selected: bool,
        settled: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let theme = self.theme;
        // Until the reveal settles everything is drawn in the muted tone.
        let tone = |color| if settled { color } else { theme.muted };

        let border_color = if selected {
            theme.border_focused
        } else {
            theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(tone(border_color)))
            .title_top(Line::from(Span::styled(
                format!(" {} ", card.title),
                Style::default()
                    .fg(tone(theme.text))
                    .add_modifier(Modifier::BOLD),
            )))
            .title_top(
                Line::from(Span::styled(
                    format!(" {} ", card.year_range),
                    Style::default().fg(tone(theme.secondary)),
                ))
                .right_aligned(),
            )
            .style(Style::default().bg(theme.surface));
        let inner = block.inner(area);
        block.render(area, buf);

        let text_area = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        let width = usize::from(text_area.width);
        if width == 0 {
            return;
        }

        let mut lines: Vec<Line<'_>> = wrap_description(&card.description, width)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(tone(theme.subtext)))))
            .collect();

        let (indicator, hint_color) = if card.expanded {
            ("\u{25be} ", theme.primary) // ▾
        } else {
            ("\u{25b8} ", theme.muted) // ▸
        };
        lines.push(Line::from(vec![
            Span::styled(indicator, Style::default().fg(tone(hint_color))),
            Span::styled(
                truncate_str(&card.details_label, width.saturating_sub(2)),
                Style::default()
                    .fg(tone(hint_color))
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));

        if card.expanded {
            for bar in &card.bars {
                lines.push(skill_header(bar, width, theme, settled));
                lines.push(skill_bar(bar, width, theme));
                if !bar.description.is_empty() {
                    lines.push(Line::from(Span::styled(
                        truncate_str(&bar.description, width),
                        Style::default().fg(theme.muted),
                    )));
                }
            }
        }

        Paragraph::new(lines).render(text_area, buf);
    }
}

/// Skill name on the left, level label on the right.
fn skill_header(bar: &BarView, width: usize, theme: &Theme, settled: bool) -> Line<'static> {
    let level = format!("{}%", bar.level);
    let name_width = width.saturating_sub(level.len() + 1);
    let name = truncate_str(&bar.name, name_width);
    let padding = width.saturating_sub(name.width() + level.len());
    let text = if settled { theme.text } else { theme.muted };
    Line::from(vec![
        Span::styled(name, Style::default().fg(text)),
        Span::raw(" ".repeat(padding)),
        Span::styled(level, Style::default().fg(theme.secondary)),
    ])
}

/// Progress bar at the bar's current animated width.
fn skill_bar(bar: &BarView, width: usize, theme: &Theme) -> Line<'static> {
    let filled = filled_cells(bar.current_width(), width);
    Line::from(vec![
        Span::styled("\u{2588}".repeat(filled), Style::default().fg(theme.bar_fill)), // █
        Span::styled(
            "\u{2591}".repeat(width - filled), // ░
            Style::default().fg(theme.bar_track),
        ),
    ])
}

/// Cells to fill for a percentage of `width`.
pub fn filled_cells(percent: f64, width: usize) -> usize {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let cells = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    cells.min(width)
}

impl Widget for TimelineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if self.with_border {
            let block = Block::default()
                .title(" Expertise Timeline ")
                .title_style(Style::default().fg(self.theme.text))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border))
                .style(Style::default().bg(self.theme.base));
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Empty state
        if self.timeline.is_empty() {
            let empty_msg = Line::from(vec![Span::styled(
                "No eras to show",
                Style::default().fg(self.theme.muted),
            )]);
            Paragraph::new(empty_msg).render(
                Rect::new(
                    inner.x + 2.min(inner.width),
                    inner.y + inner.height / 2,
                    inner.width.saturating_sub(4),
                    1,
                ),
                buf,
            );
            return;
        }

        for slot in layout_cards(self.timeline, inner, self.scroll) {
            if let Some(card) = self.timeline.card(slot.handle) {
                self.draw_card(card, slot.handle, &slot, buf);
            }
        }
    }
}

/// Truncate a string to `max_width` columns, adding ellipsis if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = if max_width > 3 { max_width - 3 } else { max_width };
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max_width > 3 {
        out.push_str("...");
    }
    out
}
