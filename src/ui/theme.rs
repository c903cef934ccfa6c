//! Greyscale theme for fix-review
//! High-contrast monochrome with a few accents for state

use ratatui::style::{Color, Modifier, Style};

/// The greyscale color palette
pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Core greyscale palette - from brightest to darkest
    // ─────────────────────────────────────────────────────────────────────

    /// Pure white - maximum emphasis
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Near white - headers, selected items
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);

    /// Bright grey - primary text
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Light grey - secondary text
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);

    /// Medium grey - muted text
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - subtle elements, line numbers
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Very dark grey - subtle borders
    pub const GREY_600: Color = Color::Rgb(45, 45, 45);

    /// Dark grey - overlay backgrounds
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);

    /// Near black - panel background
    pub const GREY_800: Color = Color::Rgb(28, 28, 28);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    /// Background color alias
    pub const BG: Color = Self::GREY_900;

    // ─────────────────────────────────────────────────────────────────────
    // Accents
    // ─────────────────────────────────────────────────────────────────────

    /// Active fixes, success toasts
    pub const GREEN: Color = Color::Rgb(100, 200, 100);

    /// Errors
    pub const RED: Color = Color::Rgb(200, 100, 100);

    /// Waiting states (pending geometry, closing)
    pub const YELLOW: Color = Color::Rgb(220, 200, 100);

    /// Background of the highlighted fix range in the source view
    pub const HIGHLIGHT_BG: Color = Color::Rgb(70, 60, 20);

    // ─────────────────────────────────────────────────────────────────────
    // Pre-built styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    /// Selected/highlighted item
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::GREY_600)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style for panels
    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Active border (focused panel)
    pub fn border_active() -> Style {
        Style::default().fg(Self::GREY_200)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::GREY_50)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding chip in the footer
    pub fn key_chip() -> Style {
        Style::default().fg(Self::GREY_900).bg(Self::GREY_500)
    }

    pub fn key_label() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Source text inside the highlighted range
    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::HIGHLIGHT_BG)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Glyphs
    // ─────────────────────────────────────────────────────────────────────

    pub const CHECKED: &'static str = "[x]";
    pub const UNCHECKED: &'static str = "[ ]";
    pub const FOLDER: char = '▾';
    pub const ARROW_RIGHT: char = '▸';
    pub const DOT_SEPARATOR: char = '·';
}
