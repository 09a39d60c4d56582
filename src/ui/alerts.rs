use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::alerts::{AlertLevel, Alerts};
use super::theme::{icons, Theme};

const ALERT_WIDTH: u16 = 56;

fn icon(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Success => icons::CHECK,
        AlertLevel::Info => icons::INFO,
        AlertLevel::Warning => icons::WARN,
        AlertLevel::Error => icons::CROSS,
    }
}

/// Stacks the live alerts in the top-right corner, oldest first.
pub fn render_alerts(frame: &mut Frame, alerts: &Alerts, theme: &Theme) {
    let area = frame.area();
    let width = ALERT_WIDTH.min(area.width);
    let text_width = width.saturating_sub(4).max(1) as usize;
    let mut y = area.y + 1;

    for alert in alerts.iter() {
        let text = format!("{} {}", icon(alert.level), alert.message);
        let lines = (text.chars().count() / text_width + 1) as u16;
        let height = (lines + 2).min(6);
        if y + height > area.y + area.height {
            break;
        }

        let rect = Rect::new(area.x + area.width - width, y, width, height);
        let style = theme.alert_style(alert.level);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::styled(text, style))
                .wrap(Wrap { trim: true })
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            rect,
        );
        y += height;
    }
}
