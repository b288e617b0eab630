//! Timeline data model.
//!
//! An [`Era`] is one chronological entry in the expertise timeline and owns
//! an ordered list of [`Skill`]s. Both are immutable once loaded.

use serde::Serialize;
use std::fmt;

/// Upper bound of a skill proficiency percentage.
pub const MAX_LEVEL: u8 = 100;

/// Identifier of an era. Defines display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EraId(pub u32);

impl fmt::Display for EraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named competency with a proficiency percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    /// Display name.
    pub name: String,
    /// Proficiency in `0..=100`.
    pub level: u8,
    /// Display description.
    pub description: String,
}

impl Skill {
    /// Create a skill, clamping `level` into `0..=100`.
    pub fn new(name: impl Into<String>, level: u8, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: level.min(MAX_LEVEL),
            description: description.into(),
        }
    }

    /// Target fill of the skill's progress bar as a fraction of full width.
    pub fn fill_ratio(&self) -> f64 {
        f64::from(self.level.min(MAX_LEVEL)) / f64::from(MAX_LEVEL)
    }
}

/// One chronological entry in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Era {
    pub id: EraId,
    /// Display range, e.g. "2015-2016".
    pub year_range: String,
    pub title: String,
    pub description: String,
    /// Skills in display order.
    pub skills: Vec<Skill>,
}

impl Era {
    /// Create an era with no skills.
    pub fn new(
        id: u32,
        year_range: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: EraId(id),
            year_range: year_range.into(),
            title: title.into(),
            description: description.into(),
            skills: Vec::new(),
        }
    }

    /// Append a skill.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_is_clamped() {
        let skill = Skill::new("Rust", 140, "too confident");
        assert_eq!(skill.level, 100);

        let skill = Skill::new("Rust", 85, "");
        assert_eq!(skill.level, 85);
    }

    #[test]
    fn test_fill_ratio() {
        assert!((Skill::new("a", 85, "").fill_ratio() - 0.85).abs() < f64::EPSILON);
        assert!(Skill::new("a", 0, "").fill_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_era_serializes_with_camel_case() {
        let era = Era::new(1, "2015-2016", "A", "desc").with_skill(Skill::new("S1", 50, "d"));
        let json = serde_json::to_value(&era).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["yearRange"], "2015-2016");
        assert_eq!(json["skills"][0]["level"], 50);
    }

    #[test]
    fn test_era_id_display() {
        assert_eq!(EraId(7).to_string(), "7");
    }
}
