//! Color palette and styles for the terminal UI.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Prediction;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    /// Deep teal (#0D9488)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136);

    /// Lighter teal for highlights (#2DD4BF)
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191);

    /// Light slate for borders (#94A3B8)
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184);

    pub const DANGER: Color = Color::Rgb(244, 63, 94);

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252);
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184);
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for a verdict, colored by outcome.
    #[must_use]
    pub fn prediction(prediction: Prediction) -> Style {
        let (r, g, b) = prediction.color();
        Style::default()
            .fg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD)
    }
}
