use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

use crate::db::ConnectionParams;
use super::theme::{icons, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionField {
    Host,
    Port,
    User,
    Password,
    Database,
}

impl ConnectionField {
    pub const ALL: [ConnectionField; 5] = [
        ConnectionField::Host,
        ConnectionField::Port,
        ConnectionField::User,
        ConnectionField::Password,
        ConnectionField::Database,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Host => Self::Port,
            Self::Port => Self::User,
            Self::User => Self::Password,
            Self::Password => Self::Database,
            Self::Database => Self::Host,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Host => Self::Database,
            Self::Port => Self::Host,
            Self::User => Self::Port,
            Self::Password => Self::User,
            Self::Database => Self::Password,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Port => "Port",
            Self::User => "Username",
            Self::Password => "Password",
            Self::Database => "Database Name",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

fn field_input<'a>(field: ConnectionField, value: &str) -> TextArea<'a> {
    let mut ta = TextArea::new(vec![value.to_string()]);
    ta.set_cursor_line_style(Style::default());
    ta.move_cursor(CursorMove::End);
    if field == ConnectionField::Password {
        ta.set_mask_char('•');
    }
    ta
}

/// One single-line editor per connection field. Nothing reaches the session
/// until the form is confirmed.
#[derive(Clone)]
pub struct ConnectionForm<'a> {
    scheme: String,
    inputs: [TextArea<'a>; 5],
    pub active: ConnectionField,
}

pub enum FormInput {
    Edited,
    Confirm,
    Cancel,
    Ignored,
}

impl<'a> ConnectionForm<'a> {
    pub fn new(params: ConnectionParams) -> Self {
        let value = |field: ConnectionField| match field {
            ConnectionField::Host => params.host.as_str(),
            ConnectionField::Port => params.port.as_str(),
            ConnectionField::User => params.user.as_str(),
            ConnectionField::Password => params.password.as_str(),
            ConnectionField::Database => params.database.as_str(),
        };
        Self {
            inputs: ConnectionField::ALL.map(|field| field_input(field, value(field))),
            scheme: params.scheme.clone(),
            active: ConnectionField::Host,
        }
    }

    pub fn value(&self, field: ConnectionField) -> String {
        self.inputs[field.index()].lines().concat()
    }

    pub fn set_value(&mut self, field: ConnectionField, value: &str) {
        self.inputs[field.index()] = field_input(field, value);
    }

    /// Field values as they stand, substituted verbatim.
    pub fn params(&self) -> ConnectionParams {
        ConnectionParams {
            scheme: self.scheme.clone(),
            host: self.value(ConnectionField::Host),
            port: self.value(ConnectionField::Port),
            user: self.value(ConnectionField::User),
            password: self.value(ConnectionField::Password),
            database: self.value(ConnectionField::Database),
        }
    }

    pub fn input(&mut self, key: KeyEvent) -> FormInput {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => FormInput::Cancel,
            KeyCode::Enter => FormInput::Confirm,
            KeyCode::Tab | KeyCode::Down => {
                self.active = self.active.next();
                FormInput::Edited
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = self.active.prev();
                FormInput::Edited
            }
            KeyCode::Char('u') if ctrl => {
                self.set_value(self.active, "");
                FormInput::Edited
            }
            // Newline chords would split a single-line field.
            KeyCode::Char('m' | 'j') if ctrl => FormInput::Ignored,
            _ => {
                if self.inputs[self.active.index()].input(key) {
                    FormInput::Edited
                } else {
                    FormInput::Ignored
                }
            }
        }
    }
}

pub fn render_connection_dialog(frame: &mut Frame, form: &ConnectionForm<'_>, theme: &Theme) {
    let area = frame.area();

    let dialog_width = 64.min(area.width.saturating_sub(4));
    let dialog_height = 3 + ConnectionField::ALL.len() as u16 * 3 + 2;

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height.min(area.height));

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" {} MySQL Setup ", icons::DATABASE))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(theme.border_focused_style())
        .style(Style::default().bg(theme.bg_secondary));
    frame.render_widget(block, dialog_area);

    let inner = Rect::new(
        dialog_area.x + 2,
        dialog_area.y + 1,
        dialog_area.width.saturating_sub(4),
        dialog_area.height.saturating_sub(2),
    );

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(ConnectionField::ALL.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::vertical(constraints).split(inner);

    let title = Paragraph::new("Enter MySQL Connection Details")
        .style(theme.accent_style().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    for (i, field) in ConnectionField::ALL.iter().enumerate() {
        let focused = *field == form.active;
        let mut ta = form.inputs[field.index()].clone();
        ta.set_block(
            Block::default()
                .title(format!(" {} ", field.label()))
                .borders(Borders::ALL)
                .border_style(theme.block_style(focused))
                .style(Style::default().bg(theme.bg)),
        );
        ta.set_style(theme.text_style());
        if focused {
            ta.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED).bg(theme.accent));
        } else {
            ta.set_cursor_style(Style::default());
        }
        frame.render_widget(&ta, chunks[i + 1]);
    }

    let help = Paragraph::new("Enter: confirm  |  Tab/Shift+Tab: next/prev field  |  Esc: cancel")
        .style(theme.muted_style())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[ConnectionField::ALL.len() + 1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(form: &mut ConnectionForm, code: KeyCode) -> FormInput {
        form.input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn fields_cycle_in_dialog_order() {
        assert_eq!(ConnectionField::Host.next(), ConnectionField::Port);
        assert_eq!(ConnectionField::Database.next(), ConnectionField::Host);
        assert_eq!(ConnectionField::Host.prev(), ConnectionField::Database);
    }

    #[test]
    fn typing_edits_the_active_field_only() {
        let mut form = ConnectionForm::new(ConnectionParams::default());
        for _ in 0..3 {
            press(&mut form, KeyCode::Tab);
        }
        assert_eq!(form.active, ConnectionField::Password);
        for c in "s3cret".chars() {
            press(&mut form, KeyCode::Char(c));
        }
        press(&mut form, KeyCode::Backspace);

        let params = form.params();
        assert_eq!(params.password, "s3cre");
        assert_eq!(params.host, "localhost");
        assert!(matches!(press(&mut form, KeyCode::Enter), FormInput::Confirm));
        assert!(matches!(press(&mut form, KeyCode::Esc), FormInput::Cancel));
    }

    #[test]
    fn cursor_moves_within_a_field() {
        let mut form = ConnectionForm::new(ConnectionParams::default());
        form.active = ConnectionField::Port;
        press(&mut form, KeyCode::Left);
        press(&mut form, KeyCode::Left);
        press(&mut form, KeyCode::Char('0'));
        assert_eq!(form.value(ConnectionField::Port), "33006");

        press(&mut form, KeyCode::Home);
        press(&mut form, KeyCode::Char('1'));
        assert_eq!(form.value(ConnectionField::Port), "133006");

        form.input(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(form.value(ConnectionField::Port), "");
    }

    #[test]
    fn only_the_password_is_masked() {
        let mut form = ConnectionForm::new(ConnectionParams::default());
        form.set_value(ConnectionField::Password, "pw");
        assert_eq!(form.inputs[ConnectionField::Password.index()].mask_char(), Some('•'));
        assert_eq!(form.inputs[ConnectionField::User.index()].mask_char(), None);
        assert_eq!(form.params().password, "pw");
        assert!(matches!(
            form.input(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::CONTROL)),
            FormInput::Ignored
        ));
        assert_eq!(form.inputs[ConnectionField::Password.index()].lines().len(), 1);
    }
}
