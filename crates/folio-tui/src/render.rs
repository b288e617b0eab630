//! Timeline renderer.
//!
//! Turns the data store into one [`CardView`] per era, registers each card
//! for its one-shot reveal and binds it to the interaction controller.
//! [`RenderedTimeline`] is the presentation state the controller mutates.

use std::time::Duration;

use folio_engine::{
    CardSurface, EraId, RevealTracker, TimelineDataStore, TimelineInteractionController, Tween,
    WidgetConfig,
};

/// Index of a rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardHandle(pub usize);

/// Entrance transition state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Not yet scrolled into view.
    Hidden,
    /// Fading and sliding in.
    Revealing { elapsed: Duration },
    /// Fully visible.
    Shown,
}

/// One skill row with its animated progress bar.
#[derive(Debug, Clone)]
pub struct BarView {
    pub name: String,
    pub description: String,
    /// Target fill in percent.
    pub level: u8,
    width: f64,
    animation: Option<BarAnimation>,
}

#[derive(Debug, Clone, Copy)]
struct BarAnimation {
    tween: Tween,
    elapsed: Duration,
}

impl BarView {
    /// Target fill in percent.
    pub fn target_width(&self) -> f64 {
        f64::from(self.level)
    }

    /// Current fill in percent.
    pub fn current_width(&self) -> f64 {
        self.width
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn reset(&mut self) {
        self.width = 0.0;
        self.animation = None;
    }

    fn start_fill(&mut self, duration: Duration) {
        self.animation = Some(BarAnimation {
            tween: Tween::new(self.width, self.target_width(), duration),
            elapsed: Duration::ZERO,
        });
        if duration.is_zero() {
            self.advance(Duration::ZERO);
        }
    }

    fn advance(&mut self, dt: Duration) {
        if let Some(animation) = &mut self.animation {
            animation.elapsed += dt;
            self.width = animation.tween.value_at(animation.elapsed);
            if animation.tween.is_finished(animation.elapsed) {
                self.animation = None;
            }
        }
    }
}

/// Presentation of one era.
#[derive(Debug, Clone)]
pub struct CardView {
    pub era: EraId,
    pub title: String,
    pub year_range: String,
    pub description: String,
    /// Current details hint.
    pub details_label: String,
    pub expanded: bool,
    pub bars: Vec<BarView>,
    pub reveal: RevealPhase,
}

impl CardView {
    /// Whether any part of the card is still transitioning.
    pub fn is_animating(&self) -> bool {
        matches!(self.reveal, RevealPhase::Revealing { .. })
            || self.bars.iter().any(BarView::is_animating)
    }
}

/// All rendered cards, in store order.
#[derive(Debug, Clone)]
pub struct RenderedTimeline {
    cards: Vec<CardView>,
    bar_fill: Duration,
    reveal_duration: Duration,
}

impl RenderedTimeline {
    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    pub fn card(&self, handle: CardHandle) -> Option<&CardView> {
        self.cards.get(handle.0)
    }

    pub fn handles(&self) -> impl Iterator<Item = CardHandle> + '_ {
        (0..self.cards.len()).map(CardHandle)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Start a card's entrance transition.
    pub fn begin_reveal(&mut self, handle: CardHandle) {
        if let Some(card) = self.cards.get_mut(handle.0) {
            if card.reveal == RevealPhase::Hidden {
                card.reveal = if self.reveal_duration.is_zero() {
                    RevealPhase::Shown
                } else {
                    RevealPhase::Revealing {
                        elapsed: Duration::ZERO,
                    }
                };
            }
        }
    }

    /// Entrance progress in `0.0..=1.0`.
    pub fn reveal_progress(&self, handle: CardHandle) -> f64 {
        match self.card(handle).map(|card| card.reveal) {
            Some(RevealPhase::Revealing { elapsed }) => {
                Tween::new(0.0, 1.0, self.reveal_duration).value_at(elapsed)
            }
            Some(RevealPhase::Shown) => 1.0,
            Some(RevealPhase::Hidden) | None => 0.0,
        }
    }

    /// Step every running transition forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let reveal_duration = self.reveal_duration;
        for card in &mut self.cards {
            if let RevealPhase::Revealing { elapsed } = card.reveal {
                let elapsed = elapsed + dt;
                card.reveal = if elapsed >= reveal_duration {
                    RevealPhase::Shown
                } else {
                    RevealPhase::Revealing { elapsed }
                };
            }
            for bar in &mut card.bars {
                bar.advance(dt);
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.cards.iter().any(CardView::is_animating)
    }
}

impl CardSurface for RenderedTimeline {
    type Handle = CardHandle;

    fn set_expanded(&mut self, card: CardHandle, expanded: bool) {
        if let Some(card) = self.cards.get_mut(card.0) {
            card.expanded = expanded;
        }
    }

    fn set_details_label(&mut self, card: CardHandle, label: &str) {
        if let Some(card) = self.cards.get_mut(card.0) {
            card.details_label = label.to_string();
        }
    }

    fn reset_bars(&mut self, card: CardHandle) {
        if let Some(card) = self.cards.get_mut(card.0) {
            card.bars.iter_mut().for_each(BarView::reset);
        }
    }

    fn fill_bars(&mut self, card: CardHandle) {
        let duration = self.bar_fill;
        if let Some(card) = self.cards.get_mut(card.0) {
            for bar in &mut card.bars {
                bar.start_fill(duration);
            }
        }
    }
}

/// Builds the rendered timeline from a data store.
pub struct TimelineRenderer;

impl TimelineRenderer {
    /// Render one card per era in store order.
    ///
    /// Every card starts collapsed with empty bars and is registered with
    /// `visibility` for its entrance transition. The returned controller is
    /// bound to the rendered cards.
    pub fn render(
        store: &TimelineDataStore,
        config: &WidgetConfig,
        visibility: &mut RevealTracker<CardHandle>,
    ) -> (RenderedTimeline, TimelineInteractionController<CardHandle>) {
        let cards: Vec<CardView> = store
            .eras()
            .iter()
            .map(|era| CardView {
                era: era.id,
                title: era.title.clone(),
                year_range: era.year_range.clone(),
                description: era.description.clone(),
                details_label: config.collapsed_hint.clone(),
                expanded: false,
                bars: era
                    .skills
                    .iter()
                    .map(|skill| BarView {
                        name: skill.name.clone(),
                        description: skill.description.clone(),
                        level: skill.level,
                        width: 0.0,
                        animation: None,
                    })
                    .collect(),
                reveal: RevealPhase::Hidden,
            })
            .collect();

        let bindings: Vec<(EraId, CardHandle)> = cards
            .iter()
            .enumerate()
            .map(|(idx, card)| (card.era, CardHandle(idx)))
            .collect();
        for (_, handle) in &bindings {
            visibility.observe(*handle);
        }

        let timeline = RenderedTimeline {
            cards,
            bar_fill: config.bar_fill_duration(),
            reveal_duration: config.reveal_duration(),
        };
        let controller = TimelineInteractionController::new(bindings, config);
        (timeline, controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::{Era, ManualScheduler, Skill, EXPANDED_HINT};

    fn store() -> TimelineDataStore {
        TimelineDataStore::new(vec![
            Era::new(2, "2017-2019", "B", "second").with_skill(Skill::new("S2", 85, "")),
            Era::new(1, "2015-2016", "A", "first")
                .with_skill(Skill::new("S1", 50, "d1"))
                .with_skill(Skill::new("S3", 30, "d3")),
        ])
        .unwrap()
    }

    fn render() -> (
        RenderedTimeline,
        TimelineInteractionController<CardHandle>,
        RevealTracker<CardHandle>,
    ) {
        let config = WidgetConfig::default();
        let mut visibility = RevealTracker::new(config.reveal_threshold);
        let (timeline, controller) = TimelineRenderer::render(&store(), &config, &mut visibility);
        (timeline, controller, visibility)
    }

    #[test]
    fn test_cards_follow_store_order() {
        let (timeline, controller, _) = render();
        let ids: Vec<u32> = timeline.cards().iter().map(|c| c.era.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(controller.handle(EraId(1)), Some(CardHandle(0)));
        assert_eq!(controller.handle(EraId(2)), Some(CardHandle(1)));
    }

    #[test]
    fn test_initial_card_state() {
        let (timeline, _, visibility) = render();
        let card = timeline.card(CardHandle(0)).unwrap();
        assert!(!card.expanded);
        assert_eq!(card.details_label, "Click for details");
        assert_eq!(card.reveal, RevealPhase::Hidden);
        assert_eq!(card.bars.len(), 2);
        assert!(card.bars.iter().all(|b| b.current_width() == 0.0));
        assert!((card.bars[0].target_width() - 50.0).abs() < f64::EPSILON);
        assert_eq!(visibility.pending(), 2);
    }

    #[test]
    fn test_bar_reaches_target_after_delay_and_fill() {
        let (mut timeline, mut controller, _) = render();
        let mut scheduler = ManualScheduler::new();

        controller.toggle(EraId(2), &mut timeline, &mut scheduler);
        let card = timeline.card(CardHandle(1)).unwrap();
        assert!(card.expanded);
        assert_eq!(card.details_label, EXPANDED_HINT);
        assert!(card.bars[0].current_width().abs() < f64::EPSILON);

        for task in scheduler.advance(Duration::from_millis(100)) {
            controller.run_phase(task, &mut timeline);
        }
        assert!(timeline.is_animating());

        timeline.advance(Duration::from_millis(500));
        let mid = timeline.card(CardHandle(1)).unwrap().bars[0].current_width();
        assert!(mid > 0.0 && mid < 85.0);

        timeline.advance(Duration::from_millis(500));
        let bar = &timeline.card(CardHandle(1)).unwrap().bars[0];
        assert!((bar.current_width() - 85.0).abs() < f64::EPSILON);
        assert!(!bar.is_animating());

        // Stable afterwards.
        timeline.advance(Duration::from_secs(5));
        let bar = &timeline.card(CardHandle(1)).unwrap().bars[0];
        assert!((bar.current_width() - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collapse_empties_bars() {
        let (mut timeline, mut controller, _) = render();
        let mut scheduler = ManualScheduler::new();

        controller.toggle(EraId(1), &mut timeline, &mut scheduler);
        for task in scheduler.advance(Duration::from_millis(100)) {
            controller.run_phase(task, &mut timeline);
        }
        timeline.advance(Duration::from_secs(2));
        controller.toggle(EraId(1), &mut timeline, &mut scheduler);

        let card = timeline.card(CardHandle(0)).unwrap();
        assert!(!card.expanded);
        assert!(card.bars.iter().all(|b| b.current_width() == 0.0));
    }

    #[test]
    fn test_card_switched_away_before_delay_keeps_empty_bars() {
        let (mut timeline, mut controller, _) = render();
        let mut scheduler = ManualScheduler::new();

        controller.toggle(EraId(1), &mut timeline, &mut scheduler);
        for task in scheduler.advance(Duration::from_millis(32)) {
            controller.run_phase(task, &mut timeline);
        }
        controller.toggle(EraId(2), &mut timeline, &mut scheduler);
        for task in scheduler.advance(Duration::from_secs(1)) {
            controller.run_phase(task, &mut timeline);
        }
        timeline.advance(Duration::from_secs(2));

        let first = timeline.card(CardHandle(0)).unwrap();
        assert!(!first.expanded);
        assert!(first.bars.iter().all(|b| b.current_width() == 0.0));
        assert!(!first.is_animating());

        let second = timeline.card(CardHandle(1)).unwrap();
        assert!((second.bars[0].current_width() - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reveal_transition() {
        let (mut timeline, _, _) = render();
        assert!(timeline.reveal_progress(CardHandle(0)).abs() < f64::EPSILON);

        timeline.begin_reveal(CardHandle(0));
        assert!(matches!(
            timeline.card(CardHandle(0)).unwrap().reveal,
            RevealPhase::Revealing { .. }
        ));

        timeline.advance(Duration::from_millis(250));
        let progress = timeline.reveal_progress(CardHandle(0));
        assert!(progress > 0.0 && progress < 1.0);

        timeline.advance(Duration::from_millis(250));
        assert_eq!(timeline.card(CardHandle(0)).unwrap().reveal, RevealPhase::Shown);

        // A second reveal request does not restart a shown card.
        timeline.begin_reveal(CardHandle(0));
        assert_eq!(timeline.card(CardHandle(0)).unwrap().reveal, RevealPhase::Shown);
    }

    #[test]
    fn test_empty_store_renders_no_cards() {
        let config = WidgetConfig::default();
        let mut visibility = RevealTracker::new(config.reveal_threshold);
        let (timeline, controller) =
            TimelineRenderer::render(&TimelineDataStore::default(), &config, &mut visibility);
        assert!(timeline.is_empty());
        assert_eq!(controller.expanded(), None);
        assert_eq!(visibility.pending(), 0);
    }
}
