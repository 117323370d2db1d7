//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Card face colour before glare is mixed in.
pub const CARD_FACE: (u8, u8, u8) = (34, 38, 62);
/// Colour the glare blends the card face toward.
pub const GLARE_TINT: (u8, u8, u8) = (235, 240, 255);

/// Central theme.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn hero_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn button_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD)
    }

    pub fn stat_value_style() -> Style {
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn stat_label_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_body_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn parallax_style() -> Style {
        Style::default().fg(Color::LightMagenta)
    }

    pub fn hovered_style() -> Style {
        Style::default()
            .fg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD)
    }

    pub fn marquee_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── cursor ─────────────────────────────────────────────────
    pub fn cursor_dot_style() -> Style {
        Style::default().fg(Color::LightMagenta)
    }

    pub fn cursor_ring_style() -> Style {
        Style::default().fg(Color::Magenta)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn nav_style() -> Style {
        Style::default().bg(Color::Rgb(24, 26, 40)).fg(Color::White)
    }

    pub fn nav_link_style() -> Style {
        Style::default().bg(Color::Rgb(40, 44, 66)).fg(Color::White)
    }

    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn scrollbar_thumb() -> Color {
        Color::LightBlue
    }

    pub fn scrollbar_track() -> Color {
        Color::DarkGray
    }
}

/// Linear blend of two RGB colours, `t` in `[0, 1]`.
pub fn mix(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Color::Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Grey level for a shadow of the given opacity.
pub fn shadow_colour(opacity: f64) -> Color {
    mix((70, 70, 80), (8, 8, 12), opacity / 0.4)
}
