use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Pause,
    Resume,
    WindowUp,
    WindowDown,
    ThresholdUp,
    ThresholdDown,
    Export,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Up => Some(UiCommand::WindowUp),
        KeyCode::Down => Some(UiCommand::WindowDown),
        KeyCode::Right => Some(UiCommand::ThresholdUp),
        KeyCode::Left => Some(UiCommand::ThresholdDown),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'p' => Some(UiCommand::Pause),
            'r' => Some(UiCommand::Resume),
            '+' | '=' => Some(UiCommand::WindowUp),
            '-' | '_' => Some(UiCommand::WindowDown),
            ']' => Some(UiCommand::ThresholdUp),
            '[' => Some(UiCommand::ThresholdDown),
            'e' => Some(UiCommand::Export),
            _ => None,
        },
        _ => None,
    }
}

/// Like [`parse_main_command`], but Ctrl+C always quits (raw mode swallows SIGINT).
pub fn parse_key_event(key: &KeyEvent) -> Option<UiCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiCommand::Quit);
    }
    parse_main_command(&key.code)
}
