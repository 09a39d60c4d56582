use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget},
    Frame,
};
use tui_textarea::TextArea;
use unicode_width::UnicodeWidthStr;

use crate::table::Table;
use super::theme::Theme;

const MIN_COL_WIDTH: usize = 4;
const MAX_COL_WIDTH: usize = 32;

/// Cell cursor and scroll offsets of the table preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    pub row: usize,
    pub col: usize,
    pub row_offset: usize,
    pub col_offset: usize,
}

impl GridState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn move_by(&mut self, d_row: isize, d_col: isize, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            self.reset();
            return;
        }
        self.row = self.row.saturating_add_signed(d_row).min(rows - 1);
        self.col = self.col.saturating_add_signed(d_col).min(cols - 1);
    }

    pub fn clamp(&mut self, rows: usize, cols: usize) {
        self.move_by(0, 0, rows, cols);
    }

    /// Scrolls so the cursor cell is inside a viewport of `height` rows and
    /// `inner_width` terminal columns.
    fn scroll_into_view(&mut self, height: usize, widths: &[usize], inner_width: usize) {
        let height = height.max(1);
        if self.row < self.row_offset {
            self.row_offset = self.row;
        } else if self.row >= self.row_offset + height {
            self.row_offset = self.row + 1 - height;
        }

        if self.col < self.col_offset {
            self.col_offset = self.col;
        }
        while self.col_offset < self.col
            && !visible_columns(widths, self.col_offset, inner_width).contains(&self.col)
        {
            self.col_offset += 1;
        }
    }
}

/// Columns that fit from `offset` on; always at least one.
fn visible_columns(widths: &[usize], offset: usize, inner_width: usize) -> Vec<usize> {
    let mut used = 0;
    let mut out = Vec::new();
    for (i, w) in widths.iter().enumerate().skip(offset) {
        if used + w > inner_width && !out.is_empty() {
            break;
        }
        used += w + 1;
        out.push(i);
    }
    out
}

/// Display width per column: widest of header and cells, within bounds.
pub fn column_widths(table: &Table) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|v| v.to_string().width());
            cells
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
                .clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
        })
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    table: Option<&Table>,
    caption: &str,
    state: &mut GridState,
    editor: Option<&TextArea>,
    focused: bool,
    theme: &Theme,
) {
    let Some(table) = table else {
        let placeholder = Paragraph::new("Run the query to see the table!")
            .style(theme.dim_style())
            .block(
                Block::default()
                    .title(format!(" {caption} "))
                    .borders(Borders::ALL)
                    .border_style(theme.block_style(focused)),
            );
        frame.render_widget(placeholder, area);
        return;
    };

    let [grid_area, editor_area] = if editor.is_some() {
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area)
    } else {
        [area, Rect::default()]
    };

    let widths = column_widths(table);
    let inner_width = grid_area.width.saturating_sub(2) as usize;
    let body_height = grid_area.height.saturating_sub(3) as usize;

    state.clamp(table.row_count(), table.column_count());
    state.scroll_into_view(body_height, &widths, inner_width);
    let visible = visible_columns(&widths, state.col_offset, inner_width);

    let header = Row::new(
        visible
            .iter()
            .map(|&i| Cell::from(truncate(&table.columns[i], widths[i])).style(theme.header_style())),
    );

    let rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .skip(state.row_offset)
        .take(body_height)
        .map(|(r, row)| {
            Row::new(visible.iter().map(|&c| {
                let value = &row[c];
                let style = if r == state.row && c == state.col && focused {
                    theme.selected_style()
                } else if value.is_null() {
                    theme.muted_style()
                } else if r == state.row {
                    theme.text_style().bg(theme.bg_highlight)
                } else {
                    theme.text_style()
                };
                Cell::from(truncate(&value.to_string(), widths[c])).style(style)
            }))
        })
        .collect();

    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|&i| Constraint::Length(widths[i] as u16))
        .collect();

    let title = format!(" {caption} ({} rows) ", table.row_count());

    let grid = TableWidget::new(rows, constraints)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(title)
                .title_bottom(Line::from(format!(
                    " {}:{} ",
                    state.row + 1,
                    table.columns.get(state.col).map(String::as_str).unwrap_or("")
                )))
                .borders(Borders::ALL)
                .border_style(theme.block_style(focused)),
        );
    frame.render_widget(grid, grid_area);

    if let Some(editor) = editor {
        let mut ta = editor.clone();
        ta.set_block(
            Block::default()
                .title(" Edit cell (Enter: save, Esc: cancel) ")
                .borders(Borders::ALL)
                .border_style(theme.border_focused_style()),
        );
        ta.set_style(theme.text_style());
        ta.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED).bg(theme.accent));
        ta.set_cursor_line_style(Style::default());
        frame.render_widget(&ta, editor_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn cursor_stays_inside_the_table() {
        let mut state = GridState::default();
        state.move_by(-1, -1, 3, 2);
        assert_eq!((state.row, state.col), (0, 0));
        state.move_by(10, 10, 3, 2);
        assert_eq!((state.row, state.col), (2, 1));
        state.clamp(1, 1);
        assert_eq!((state.row, state.col), (0, 0));
    }

    #[test]
    fn scrolling_follows_the_cursor() {
        let widths = [10, 10, 10, 10];
        let mut state = GridState { row: 12, col: 3, ..Default::default() };
        state.scroll_into_view(5, &widths, 22);
        assert_eq!(state.row_offset, 8);
        assert_eq!(state.col_offset, 2);
        assert_eq!(visible_columns(&widths, state.col_offset, 22), vec![2, 3]);

        state.row = 2;
        state.col = 0;
        state.scroll_into_view(5, &widths, 22);
        assert_eq!((state.row_offset, state.col_offset), (2, 0));
    }

    #[test]
    fn widths_cover_headers_and_wide_cells() {
        let table = Table::new(
            vec!["id".into(), "customerName".into()],
            vec![vec![Value::Int(103), Value::Text("Atelier graphique".into())]],
        );
        assert_eq!(column_widths(&table), vec![4, 17]);
        assert_eq!(truncate("Atelier graphique", 8), "Atelier…");
    }
}
