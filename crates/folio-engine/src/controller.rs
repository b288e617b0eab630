//! Timeline interaction controller.
//!
//! Owns the expanded/collapsed selection and drives card presentation
//! through a [`CardSurface`]. Cards are addressed through handles bound
//! once at render time, so the controller never searches the rendered
//! output for a card.

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::WidgetConfig;
use crate::era::EraId;
use crate::schedule::{PhaseTask, Scheduler};
use crate::state::TimelineViewState;

/// Presentation operations the controller performs on rendered cards.
pub trait CardSurface {
    /// Opaque reference to one rendered card.
    type Handle: Copy + Debug;

    /// Switch a card between its expanded and collapsed presentation.
    fn set_expanded(&mut self, card: Self::Handle, expanded: bool);

    /// Replace the card's details hint.
    fn set_details_label(&mut self, card: Self::Handle, label: &str);

    /// Return every progress bar of the card to zero width.
    fn reset_bars(&mut self, card: Self::Handle);

    /// Start animating every progress bar of the card to its target width.
    fn fill_bars(&mut self, card: Self::Handle);
}

/// What a call to [`TimelineInteractionController::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The clicked card was expanded and is now collapsed.
    Collapsed(EraId),
    /// The clicked card is now expanded; `replaced` was collapsed to make room.
    Expanded {
        era: EraId,
        replaced: Option<EraId>,
    },
    /// No card is bound to the id.
    Unknown(EraId),
}

/// Expand/collapse state machine over the rendered cards.
#[derive(Debug)]
pub struct TimelineInteractionController<H> {
    state: TimelineViewState,
    cards: HashMap<EraId, H>,
    expand_delay: Duration,
    collapsed_hint: String,
    expanded_hint: String,
}

impl<H: Copy + Debug> TimelineInteractionController<H> {
    /// Create a controller over the cards produced by a render pass.
    pub fn new(bindings: impl IntoIterator<Item = (EraId, H)>, config: &WidgetConfig) -> Self {
        Self {
            state: TimelineViewState::new(),
            cards: bindings.into_iter().collect(),
            expand_delay: config.expand_delay(),
            collapsed_hint: config.collapsed_hint.clone(),
            expanded_hint: config.expanded_hint.clone(),
        }
    }

    pub fn state(&self) -> &TimelineViewState {
        &self.state
    }

    /// The currently expanded era, if any.
    pub fn expanded(&self) -> Option<EraId> {
        self.state.expanded()
    }

    pub fn is_expanded(&self, era: EraId) -> bool {
        self.state.is_expanded(era)
    }

    /// Handle of the card rendered for `era`.
    pub fn handle(&self, era: EraId) -> Option<H> {
        self.cards.get(&era).copied()
    }

    /// Details hint a card should currently display.
    pub fn details_label(&self, era: EraId) -> &str {
        if self.state.is_expanded(era) {
            &self.expanded_hint
        } else {
            &self.collapsed_hint
        }
    }

    /// Toggle the card for `era`.
    ///
    /// Collapses it if it is the expanded card. Otherwise collapses whichever
    /// card is expanded, expands this one and schedules its bar fill after
    /// the configured delay.
    pub fn toggle<S, Q>(&mut self, era: EraId, surface: &mut S, scheduler: &mut Q) -> ToggleOutcome
    where
        S: CardSurface<Handle = H>,
        Q: Scheduler + ?Sized,
    {
        let Some(card) = self.handle(era) else {
            warn!(era = %era, "Toggle for unbound era ignored");
            return ToggleOutcome::Unknown(era);
        };

        if self.state.is_expanded(era) {
            self.collapse_card(card, surface);
            self.state.collapse();
            debug!(era = %era, "Collapsed card");
            return ToggleOutcome::Collapsed(era);
        }

        let replaced = self.state.expanded();
        if let Some(previous) = replaced.and_then(|id| self.handle(id)) {
            self.collapse_card(previous, surface);
        }

        surface.reset_bars(card);
        surface.set_expanded(card, true);
        surface.set_details_label(card, &self.expanded_hint);
        self.state.expand(era);
        scheduler.schedule(self.expand_delay, PhaseTask::FillBars { era });
        debug!(era = %era, replaced = ?replaced, delay = ?self.expand_delay, "Expanded card");

        ToggleOutcome::Expanded { era, replaced }
    }

    /// Run a deferred phase once its delay has elapsed.
    ///
    /// Tasks are not cancelled when the selection changes before they fire.
    /// A fill for a card that is no longer expanded is skipped, so collapsed
    /// cards always keep empty bars.
    pub fn run_phase<S>(&mut self, task: PhaseTask, surface: &mut S)
    where
        S: CardSurface<Handle = H>,
    {
        match task {
            PhaseTask::FillBars { era } => {
                if !self.state.is_expanded(era) {
                    debug!(era = %era, "Skipping bar fill for collapsed card");
                    return;
                }
                if let Some(card) = self.handle(era) {
                    debug!(era = %era, "Filling skill bars");
                    surface.fill_bars(card);
                }
            }
        }
    }

    fn collapse_card<S>(&self, card: H, surface: &mut S)
    where
        S: CardSurface<Handle = H>,
    {
        surface.set_expanded(card, false);
        surface.set_details_label(card, &self.collapsed_hint);
        surface.reset_bars(card);
    }
}
