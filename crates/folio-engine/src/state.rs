//! Timeline view state.

use crate::era::EraId;

/// Which card, if any, is currently expanded.
///
/// Holds at most one id, so the single-expanded invariant is structural.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineViewState {
    expanded: Option<EraId>,
}

impl TimelineViewState {
    /// Create a state with every card collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<EraId> {
        self.expanded
    }

    pub fn is_expanded(&self, id: EraId) -> bool {
        self.expanded == Some(id)
    }

    pub(crate) fn expand(&mut self, id: EraId) {
        self.expanded = Some(id);
    }

    pub(crate) fn collapse(&mut self) {
        self.expanded = None;
    }
}
