//! Timeline data store.
//!
//! Holds the ordered, validated list of eras. The list is loaded once and is
//! read-only afterwards. Validation happens here so that interaction code can
//! treat every id and level as well-formed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info};

use crate::era::{Era, EraId, Skill, MAX_LEVEL};

/// Bundled default timeline.
const BUILTIN_TIMELINE: &str = include_str!("../data/timeline.json");

/// Ordered list of eras, sorted ascending by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineDataStore {
    eras: Vec<Era>,
}

/// On-disk document: either `{"eras": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Wrapped { eras: Vec<RawEra> },
    Bare(Vec<RawEra>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEra {
    id: u32,
    year_range: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    skills: Vec<RawSkill>,
}

/// Levels are read wide so that out-of-range values surface as a
/// validation error instead of an opaque parse failure.
#[derive(Debug, Deserialize)]
struct RawSkill {
    name: String,
    level: i64,
    #[serde(default)]
    description: String,
}

#[derive(Serialize)]
struct Document<'a> {
    eras: &'a [Era],
}

impl TimelineDataStore {
    /// Validate and sort a list of eras.
    pub fn new(mut eras: Vec<Era>) -> Result<Self, StoreError> {
        let mut seen = HashSet::new();
        for era in &eras {
            if era.id.0 == 0 {
                return Err(StoreError::ZeroId);
            }
            if !seen.insert(era.id) {
                return Err(StoreError::DuplicateId(era.id));
            }
            if let Some(skill) = era.skills.iter().find(|s| s.level > MAX_LEVEL) {
                return Err(StoreError::LevelOutOfRange {
                    era: era.id,
                    skill: skill.name.clone(),
                    level: i64::from(skill.level),
                });
            }
        }
        eras.sort_by_key(|era| era.id);
        Ok(Self { eras })
    }

    /// Parse a timeline document from JSON.
    pub fn from_json_str(content: &str) -> Result<Self, StoreError> {
        let raw: RawDocument = serde_json::from_str(content).map_err(StoreError::Parse)?;
        let raw_eras = match raw {
            RawDocument::Wrapped { eras } | RawDocument::Bare(eras) => eras,
        };

        let mut eras = Vec::with_capacity(raw_eras.len());
        for raw_era in raw_eras {
            let id = EraId(raw_era.id);
            let mut skills = Vec::with_capacity(raw_era.skills.len());
            for raw_skill in raw_era.skills {
                let level = u8::try_from(raw_skill.level)
                    .ok()
                    .filter(|level| *level <= MAX_LEVEL)
                    .ok_or_else(|| StoreError::LevelOutOfRange {
                        era: id,
                        skill: raw_skill.name.clone(),
                        level: raw_skill.level,
                    })?;
                skills.push(Skill::new(raw_skill.name, level, raw_skill.description));
            }
            eras.push(Era {
                id,
                year_range: raw_era.year_range,
                title: raw_era.title,
                description: raw_era.description,
                skills,
            });
        }

        Self::new(eras)
    }

    /// Load a timeline document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(StoreError::Io)?;
        let store = Self::from_json_str(&content)?;
        info!(path = %path.display(), eras = store.len(), "Loaded timeline");
        Ok(store)
    }

    /// The bundled default timeline.
    pub fn builtin() -> Self {
        Self::parse_bundled(BUILTIN_TIMELINE)
    }

    /// Parse a bundled document, falling back to an empty timeline.
    fn parse_bundled(content: &str) -> Self {
        Self::from_json_str(content).unwrap_or_else(|e| {
            error!(error = %e, "Bundled timeline is invalid, showing no eras");
            Self::default()
        })
    }

    /// Serialize as a `{"eras": [...]}` document.
    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&Document { eras: &self.eras }).map_err(StoreError::Serialize)
    }

    /// All eras in display order.
    pub fn eras(&self) -> &[Era] {
        &self.eras
    }

    /// Look up an era by id.
    pub fn get(&self, id: EraId) -> Option<&Era> {
        self.eras
            .binary_search_by_key(&id, |era| era.id)
            .ok()
            .map(|idx| &self.eras[idx])
    }

    pub fn contains(&self, id: EraId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.eras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}

/// Errors surfaced while loading timeline data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading the data file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing timeline JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing timeline JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Era ids must be positive.
    #[error("era id must be positive")]
    ZeroId,

    /// Two eras share an id.
    #[error("duplicate era id {0}")]
    DuplicateId(EraId),

    /// A skill level is outside `0..=100`.
    #[error("skill '{skill}' in era {era} has level {level}, expected 0-100")]
    LevelOutOfRange {
        era: EraId,
        skill: String,
        level: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_timeline_is_valid() {
        let store = TimelineDataStore::from_json_str(BUILTIN_TIMELINE).unwrap();
        assert!(!store.is_empty());
        assert_eq!(store, TimelineDataStore::builtin());
    }

    #[test]
    fn test_broken_bundled_document_falls_back_to_empty() {
        let store = TimelineDataStore::parse_bundled(r#"{"eras": [{"id": 0}]}"#);
        assert!(store.is_empty());

        let store = TimelineDataStore::parse_bundled(BUILTIN_TIMELINE);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_eras_sorted_regardless_of_input_order() {
        let store = TimelineDataStore::new(vec![
            Era::new(2, "2017", "B", ""),
            Era::new(1, "2015", "A", ""),
        ])
        .unwrap();
        let ids: Vec<u32> = store.eras().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_store_is_valid() {
        let store = TimelineDataStore::from_json_str(r#"{"eras": []}"#).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_bare_array_document() {
        let store = TimelineDataStore::from_json_str(
            r#"[{"id": 3, "yearRange": "2020", "title": "C", "skills": []}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.eras()[0].title, "C");
        assert!(store.eras()[0].description.is_empty());
    }

    #[test]
    fn test_missing_skills_renders_no_rows() {
        let store =
            TimelineDataStore::from_json_str(r#"[{"id": 1, "yearRange": "x", "title": "A"}]"#)
                .unwrap();
        assert!(store.eras()[0].skills.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = TimelineDataStore::new(vec![Era::new(1, "", "A", ""), Era::new(1, "", "B", "")])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(EraId(1))));
    }

    #[test]
    fn test_zero_id_rejected() {
        let err = TimelineDataStore::new(vec![Era::new(0, "", "A", "")]).unwrap_err();
        assert!(matches!(err, StoreError::ZeroId));
    }

    #[test]
    fn test_level_out_of_range_rejected_at_load() {
        let json = r#"[{"id": 1, "yearRange": "x", "title": "A",
            "skills": [{"name": "S1", "level": 120}]}]"#;
        let err = TimelineDataStore::from_json_str(json).unwrap_err();
        match err {
            StoreError::LevelOutOfRange { era, skill, level } => {
                assert_eq!(era, EraId(1));
                assert_eq!(skill, "S1");
                assert_eq!(level, 120);
            }
            other => panic!("unexpected error: {other}"),
        }

        let json = r#"[{"id": 1, "yearRange": "x", "title": "A",
            "skills": [{"name": "S1", "level": -5}]}]"#;
        assert!(matches!(
            TimelineDataStore::from_json_str(json),
            Err(StoreError::LevelOutOfRange { level: -5, .. })
        ));
    }

    #[test]
    fn test_directly_built_level_out_of_range_rejected() {
        let mut era = Era::new(1, "", "A", "");
        era.skills.push(Skill {
            name: "S".into(),
            level: 101,
            description: String::new(),
        });
        assert!(matches!(
            TimelineDataStore::new(vec![era]),
            Err(StoreError::LevelOutOfRange { level: 101, .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            TimelineDataStore::from_json_str("{not json"),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn test_get_and_contains() {
        let store = TimelineDataStore::new(vec![
            Era::new(5, "", "E", ""),
            Era::new(2, "", "B", ""),
        ])
        .unwrap();
        assert_eq!(store.get(EraId(5)).unwrap().title, "E");
        assert!(store.contains(EraId(2)));
        assert!(!store.contains(EraId(3)));
    }

    #[test]
    fn test_load_and_export_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeline.json");
        let original = TimelineDataStore::builtin();
        std::fs::write(&path, original.to_json_pretty().unwrap()).unwrap();

        let loaded = TimelineDataStore::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = TimelineDataStore::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
