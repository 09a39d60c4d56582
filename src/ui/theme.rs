use ratatui::style::{Color, Modifier, Style};

use crate::alerts::AlertLevel;

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub bg_selected: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub border: Color,
    pub border_focused: Color,
    /// Trace colors, reused in order when there are more traces.
    pub series: [Color; 8],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            bg_secondary: Color::Rgb(30, 30, 40),
            bg_highlight: Color::Rgb(40, 42, 54),
            bg_selected: Color::Rgb(68, 71, 90),
            text: Color::Rgb(248, 248, 242),
            text_dim: Color::Rgb(149, 152, 170),
            text_muted: Color::Rgb(98, 100, 118),
            accent: Color::Rgb(139, 233, 253),
            error: Color::Rgb(255, 85, 85),
            warning: Color::Rgb(241, 250, 140),
            success: Color::Rgb(80, 250, 123),
            border: Color::Rgb(68, 71, 90),
            border_focused: Color::Rgb(139, 233, 253),
            series: [
                Color::Rgb(99, 110, 250),
                Color::Rgb(239, 85, 59),
                Color::Rgb(0, 204, 150),
                Color::Rgb(171, 99, 250),
                Color::Rgb(255, 161, 90),
                Color::Rgb(25, 211, 243),
                Color::Rgb(255, 102, 146),
                Color::Rgb(182, 232, 128),
            ],
        }
    }

    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused_style(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.bg_selected)
            .fg(self.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn alert_style(&self, level: AlertLevel) -> Style {
        let fg = match level {
            AlertLevel::Success => self.success,
            AlertLevel::Info => self.accent,
            AlertLevel::Warning => self.warning,
            AlertLevel::Error => self.error,
        };
        Style::default().fg(fg).bg(self.bg_secondary)
    }

    pub fn button_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .bg(self.bg_secondary)
    }

    pub fn button_active_style(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn block_style(&self, focused: bool) -> Style {
        if focused {
            self.border_focused_style()
        } else {
            self.border_style()
        }
    }
}

pub mod icons {
    pub const DATABASE: &str = "";
    pub const PLAY: &str = "";
    pub const CLEAR: &str = "";
    pub const CHART: &str = "";
    pub const SPARKLE: &str = "✦";
    pub const CHECK: &str = "✔";
    pub const CROSS: &str = "✘";
    pub const WARN: &str = "⚠";
    pub const INFO: &str = "ℹ";
    pub const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
}
