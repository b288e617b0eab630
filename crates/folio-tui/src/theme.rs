//! Catppuccin color palettes for the timeline.

use ratatui::style::Color;
use std::str::FromStr;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub secondary: Color,

    // Skill bars
    pub bar_fill: Color,
    pub bar_track: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),    // #1e1e2e
            surface: Color::Rgb(49, 50, 68), // #313244

            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            primary: Color::Rgb(180, 190, 254),   // #b4befe (lavender)
            secondary: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            bar_fill: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
            bar_track: Color::Rgb(69, 71, 90),   // #45475a

            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Catppuccin Latte theme (light theme).
    pub fn latte() -> Self {
        Self {
            base: Color::Rgb(239, 241, 245),    // #eff1f5
            surface: Color::Rgb(230, 233, 239), // #e6e9ef

            text: Color::Rgb(76, 79, 105),    // #4c4f69
            subtext: Color::Rgb(92, 95, 119), // #5c5f77
            muted: Color::Rgb(140, 143, 161), // #8c8fa1

            primary: Color::Rgb(114, 135, 253),  // #7287fd (lavender)
            secondary: Color::Rgb(23, 146, 153), // #179299 (teal)

            bar_fill: Color::Rgb(64, 160, 43),    // #40a02b (green)
            bar_track: Color::Rgb(204, 208, 218), // #ccd0da

            border: Color::Rgb(188, 192, 204),         // #bcc0cc
            border_focused: Color::Rgb(114, 135, 253), // #7287fd (lavender)
        }
    }

    /// High contrast theme for accessibility.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Black,
            surface: Color::Rgb(20, 20, 20),

            text: Color::White,
            subtext: Color::Rgb(200, 200, 200),
            muted: Color::Rgb(150, 150, 150),

            primary: Color::Cyan,
            secondary: Color::Magenta,

            bar_fill: Color::Green,
            bar_track: Color::DarkGray,

            border: Color::White,
            border_focused: Color::Cyan,
        }
    }
}

/// Named palette, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Mocha,
    Latte,
    HighContrast,
}

impl ThemeName {
    pub fn theme(self) -> Theme {
        match self {
            Self::Mocha => Theme::mocha(),
            Self::Latte => Theme::latte(),
            Self::HighContrast => Theme::high_contrast(),
        }
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mocha" | "dark" => Ok(Self::Mocha),
            "latte" | "light" => Ok(Self::Latte),
            "high-contrast" | "contrast" => Ok(Self::HighContrast),
            other => Err(format!(
                "unknown theme '{other}' (expected mocha, latte or high-contrast)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mocha_theme_creates() {
        let theme = Theme::mocha();
        assert!(matches!(theme.base, Color::Rgb(30, 30, 46)));
    }

    #[test]
    fn test_latte_theme_creates() {
        let theme = Theme::latte();
        assert!(matches!(theme.base, Color::Rgb(239, 241, 245)));
    }

    #[test]
    fn test_high_contrast_theme_creates() {
        let theme = Theme::high_contrast();
        assert!(matches!(theme.base, Color::Black));
    }

    #[test]
    fn test_theme_name_parsing() {
        assert_eq!("mocha".parse::<ThemeName>(), Ok(ThemeName::Mocha));
        assert_eq!("Light".parse::<ThemeName>(), Ok(ThemeName::Latte));
        assert_eq!(
            "high-contrast".parse::<ThemeName>(),
            Ok(ThemeName::HighContrast)
        );
        assert!("neon".parse::<ThemeName>().is_err());
        assert!(matches!(
            ThemeName::default().theme().base,
            Color::Rgb(30, 30, 46)
        ));
    }
}
