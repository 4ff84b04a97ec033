//! Key mapping from terminal events to player commands.

use crate::types::InputCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a player command.
pub fn map_key(key: KeyEvent) -> Option<InputCommand> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(InputCommand::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputCommand::MoveRight)
        }
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(InputCommand::Rotate),
        _ => None,
    }
}

/// Press or auto-repeat; terminals with the kitty protocol also report releases.
pub fn is_press(key: KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_movement_keys() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Left)), Some(InputCommand::MoveLeft));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Right)), Some(InputCommand::MoveRight));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('H'))), Some(InputCommand::MoveLeft));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('a'))), Some(InputCommand::MoveLeft));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('L'))), Some(InputCommand::MoveRight));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('d'))), Some(InputCommand::MoveRight));
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Up)), Some(InputCommand::Rotate));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('w'))), Some(InputCommand::Rotate));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('K'))), Some(InputCommand::Rotate));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Down)), None);
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char(' '))), None);
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(!is_press(release));
        assert!(is_press(KeyEvent::from(KeyCode::Left)));
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
