use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::theme::{icons, Theme};

pub fn render_analysis_tab(
    frame: &mut Frame,
    area: Rect,
    analysis: Option<&str>,
    running: Option<&str>,
    scroll: u16,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .title(format!(" {} LLM Analysis of Table ", icons::SPARKLE))
        .title_bottom(" F4: Run Analysis ")
        .borders(Borders::ALL)
        .border_style(theme.block_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [status_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

    if let Some(status) = running {
        frame.render_widget(Paragraph::new(Line::styled(status, theme.accent_style())), status_area);
    }

    let body = match analysis {
        Some(text) => Paragraph::new(text).style(theme.text_style()),
        None => Paragraph::new("No analysis to show").style(theme.muted_style()),
    };
    frame.render_widget(body.wrap(Wrap { trim: false }).scroll((scroll, 0)), body_area);
}
