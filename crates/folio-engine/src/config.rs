//! Widget configuration.
//!
//! Timing and label settings for the timeline widget. Every field has a
//! default, so a partial (or empty) JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Details hint shown on a collapsed card.
pub const COLLAPSED_HINT: &str = "Click for details";

/// Details hint shown on the expanded card.
pub const EXPANDED_HINT: &str = "Click to collapse";

/// Configuration for the timeline widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Delay between a card starting to expand and its bars starting to fill.
    #[serde(default = "default_expand_delay_ms")]
    pub expand_delay_ms: u64,

    /// Duration of the progress bar fill animation.
    #[serde(default = "default_bar_fill_ms")]
    pub bar_fill_ms: u64,

    /// Fraction of a card that must be visible before it is revealed.
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold: f64,

    /// Duration of the one-shot reveal transition.
    #[serde(default = "default_reveal_ms")]
    pub reveal_ms: u64,

    /// Details label for collapsed cards.
    #[serde(default = "default_collapsed_hint")]
    pub collapsed_hint: String,

    /// Details label for the expanded card.
    #[serde(default = "default_expanded_hint")]
    pub expanded_hint: String,
}

fn default_expand_delay_ms() -> u64 {
    100
}

fn default_bar_fill_ms() -> u64 {
    1000
}

fn default_reveal_threshold() -> f64 {
    0.1
}

fn default_reveal_ms() -> u64 {
    500
}

fn default_collapsed_hint() -> String {
    COLLAPSED_HINT.into()
}

fn default_expanded_hint() -> String {
    EXPANDED_HINT.into()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            expand_delay_ms: default_expand_delay_ms(),
            bar_fill_ms: default_bar_fill_ms(),
            reveal_threshold: default_reveal_threshold(),
            reveal_ms: default_reveal_ms(),
            collapsed_hint: default_collapsed_hint(),
            expanded_hint: default_expanded_hint(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reveal_threshold > 0.0 && self.reveal_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "reveal_threshold must be in (0, 1], got {}",
                self.reveal_threshold
            )));
        }
        if self.collapsed_hint == self.expanded_hint {
            return Err(ConfigError::Invalid(
                "collapsed_hint and expanded_hint must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    pub fn bar_fill_duration(&self) -> Duration {
        Duration::from_millis(self.bar_fill_ms)
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
