//! Input events delivered by the window collaborator.

use engine_math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the engine distinguishes; anything else arrives as [`Key::Char`] or
/// is dropped by the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Char(char),
}

/// One input event. Positions are in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    MouseDown { button: MouseButton, position: Vec2 },
    MouseUp { button: MouseButton, position: Vec2 },
    MouseMoved { position: Vec2 },
    KeyPressed(Key),
    KeyReleased(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_round_trip() {
        let events = vec![
            Event::KeyPressed(Key::Space),
            Event::MouseUp {
                button: MouseButton::Left,
                position: Vec2::new(0.5, -1.0),
            },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<Event> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }
}
