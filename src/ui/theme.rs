//! Dark and light palettes for MovieTUI
//!
//! The dark palette is the neon-on-black look; the light palette keeps the
//! same roles with colors that stay readable on a pale background. Every
//! renderer takes a [`Theme`] built from the persisted theme flag.

use ratatui::style::{Color, Modifier, Style};

/// Color roles shared by both palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    /// Panels, inputs and the status bar
    pub background_light: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub highlight: Color,
    pub text: Color,
    pub dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: Color::Rgb(0x0a, 0x0a, 0x0f),
        background_light: Color::Rgb(0x14, 0x14, 0x1e),
        primary: Color::Rgb(0x00, 0xff, 0xf2),
        secondary: Color::Rgb(0xff, 0x00, 0xff),
        accent: Color::Rgb(0xff, 0xff, 0x00),
        highlight: Color::Rgb(0xff, 0x00, 0x80),
        text: Color::Rgb(0xe0, 0xe0, 0xe0),
        dim: Color::Rgb(0x8a, 0x8a, 0xa0),
        success: Color::Rgb(0x00, 0xff, 0x00),
        warning: Color::Rgb(0xff, 0xaa, 0x00),
        error: Color::Rgb(0xff, 0x00, 0x40),
        border: Color::Rgb(0x00, 0x80, 0x78),
    };

    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(0xf5, 0xf5, 0xfa),
        background_light: Color::Rgb(0xe6, 0xe6, 0xef),
        primary: Color::Rgb(0x00, 0x6e, 0x68),
        secondary: Color::Rgb(0xa0, 0x00, 0x8c),
        accent: Color::Rgb(0x8a, 0x6d, 0x00),
        highlight: Color::Rgb(0xc2, 0x18, 0x5b),
        text: Color::Rgb(0x1a, 0x1a, 0x24),
        dim: Color::Rgb(0x6a, 0x6a, 0x7a),
        success: Color::Rgb(0x2e, 0x7d, 0x32),
        warning: Color::Rgb(0xb3, 0x5c, 0x00),
        error: Color::Rgb(0xc6, 0x28, 0x28),
        border: Color::Rgb(0x4a, 0x8f, 0x8a),
    };
}

/// Style helpers over one palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub const DARK: Theme = Theme {
        palette: Palette::DARK,
    };
    pub const LIGHT: Theme = Theme {
        palette: Palette::LIGHT,
    };

    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .bg(self.palette.background)
    }

    /// Whole-screen background
    pub fn base(&self) -> Style {
        Style::default().bg(self.palette.background)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.palette.dim)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.palette.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default()
            .fg(self.palette.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default()
            .fg(self.palette.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.palette.secondary)
    }

    pub fn accent(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.palette.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected list row (inverted with the primary color)
    pub fn list_item_selected(&self) -> Style {
        Style::default()
            .fg(self.palette.background)
            .bg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .bg(self.palette.background_light)
    }

    pub fn keybind(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    pub fn status_bar(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .bg(self.palette.background_light)
    }

    pub fn loading(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Favorite marker
    pub fn favorite(&self) -> Style {
        Style::default()
            .fg(self.palette.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year(&self) -> Style {
        Style::default().fg(self.palette.secondary)
    }

    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Rating colored by value
    pub fn rating(&self, rating: f32) -> Style {
        if rating >= 7.5 {
            self.success()
        } else if rating >= 6.0 {
            self.warning()
        } else if rating >= 4.0 {
            self.dimmed()
        } else {
            self.error()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white).
/// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text.
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
