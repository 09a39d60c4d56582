use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Waits up to `timeout` for input. Key releases and repeats reported by
/// some terminals are swallowed so each press acts once.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Press => Ok(None),
        other => Ok(Some(other)),
    }
}

/// Keys that mean the same thing whatever pane has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Escape,
    OpenConnection,
    RunQuery,
    ForceRunQuery,
    SwitchTab,
    RunAnalysis,
    ToggleGridView,
    CycleFocus,
    CycleFocusBack,
}

pub fn map_global_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('r') if ctrl => Some(Action::ForceRunQuery),
        KeyCode::Esc => Some(Action::Escape),
        KeyCode::F(2) => Some(Action::OpenConnection),
        KeyCode::F(3) => Some(Action::SwitchTab),
        KeyCode::F(4) => Some(Action::RunAnalysis),
        KeyCode::F(5) => Some(Action::RunQuery),
        KeyCode::F(6) => Some(Action::ToggleGridView),
        KeyCode::Tab => Some(Action::CycleFocus),
        KeyCode::BackTab => Some(Action::CycleFocusBack),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn function_keys_drive_the_main_actions() {
        assert_eq!(map_global_key(key(KeyCode::F(2), KeyModifiers::NONE)), Some(Action::OpenConnection));
        assert_eq!(map_global_key(key(KeyCode::F(5), KeyModifiers::NONE)), Some(Action::RunQuery));
        assert_eq!(map_global_key(key(KeyCode::F(4), KeyModifiers::NONE)), Some(Action::RunAnalysis));
        assert_eq!(map_global_key(key(KeyCode::F(3), KeyModifiers::NONE)), Some(Action::SwitchTab));
        assert_eq!(map_global_key(key(KeyCode::F(6), KeyModifiers::NONE)), Some(Action::ToggleGridView));
    }

    #[test]
    fn control_chords_are_distinguished_from_typing() {
        assert_eq!(
            map_global_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::ForceRunQuery)
        );
        assert_eq!(map_global_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Action::Quit));
        assert_eq!(map_global_key(key(KeyCode::Char('r'), KeyModifiers::NONE)), None);
        assert_eq!(map_global_key(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }
}
