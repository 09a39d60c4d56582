use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::theme::{icons, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryButton {
    None,
    Run,
    Clear,
}

#[derive(Debug, Clone, Copy)]
pub struct ButtonRegion {
    pub run: Rect,
    pub clear: Rect,
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    rect.x <= x && x < rect.x + rect.width && rect.y <= y && y < rect.y + rect.height
}

impl ButtonRegion {
    pub fn hit_test(&self, x: u16, y: u16) -> QueryButton {
        if contains(self.run, x, y) {
            QueryButton::Run
        } else if contains(self.clear, x, y) {
            QueryButton::Clear
        } else {
            QueryButton::None
        }
    }
}

pub fn render_query_panel(
    frame: &mut Frame,
    area: Rect,
    textarea: &TextArea,
    focused: bool,
    hovered_button: QueryButton,
    connection: Option<&str>,
    theme: &Theme,
) -> ButtonRegion {
    let run_width = 10u16;
    let clear_width = 11u16;
    let spacing = 1u16;
    let total_buttons_width = run_width + clear_width + spacing;

    let buttons_x = area.x + area.width.saturating_sub(total_buttons_width + 2);
    let buttons_y = area.y;

    let run_rect = Rect::new(buttons_x, buttons_y, run_width, 1);
    let clear_rect = Rect::new(buttons_x + run_width + spacing, buttons_y, clear_width, 1);

    let subtitle = match connection {
        Some(conn) => format!(" {conn} "),
        None => " no connection, press F2 ".to_string(),
    };

    let mut ta = textarea.clone();
    ta.set_block(
        Block::default()
            .title(" Enter SQL query ")
            .title_bottom(subtitle)
            .borders(Borders::ALL)
            .border_style(theme.block_style(focused))
            .style(Style::default().bg(theme.bg_secondary)),
    );
    ta.set_style(theme.text_style());
    ta.set_cursor_style(if focused {
        Style::default().add_modifier(Modifier::REVERSED).bg(theme.accent)
    } else {
        Style::default()
    });

    frame.render_widget(&ta, area);

    let run_style = button_style(QueryButton::Run, hovered_button, theme);
    let clear_style = button_style(QueryButton::Clear, hovered_button, theme);

    frame.render_widget(Paragraph::new(format!(" {} Run ", icons::PLAY)).style(run_style), run_rect);
    frame.render_widget(Paragraph::new(format!(" {} Clear ", icons::CLEAR)).style(clear_style), clear_rect);

    ButtonRegion { run: run_rect, clear: clear_rect }
}

fn button_style(button: QueryButton, hovered: QueryButton, theme: &Theme) -> Style {
    if button == hovered {
        theme.button_active_style()
    } else {
        theme.button_style()
    }
}
