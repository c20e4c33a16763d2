//=========================================================================
// Input Event Types
//=========================================================================
//
// Platform-neutral keyboard and mouse events.
//
// Event Flow:
// ```text
//   winit (platform thread)
//       ↓  InputProcessor
//   InputEvent ── channel ──> StateTracker (logic thread)
//       ↓
//   any_key_clicked / is_key_pressed / ...
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side, thumb, and vendor buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical key location, independent of keyboard layout.
///
/// Only the keys a pad-less arcade game cares about are named. Anything
/// else arrives as `Unidentified` and is dropped by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Letters ----------------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Digits -----------------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Navigation -------------------------------------------------------

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    //--- Control ----------------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier keys held when an event was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// `true` when no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// One input occurrence reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },
}

impl InputEvent {
    /// `true` for press and release events (order matters, never merged).
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::MouseMoved { .. })
    }

    /// Modifier state carried by the event, if any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            Self::MouseMoved { .. } => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_moves_are_continuous() {
        assert!(!InputEvent::MouseMoved { x: 1.0, y: 2.0 }.is_discrete());
        assert!(InputEvent::KeyDown {
            key: KeyCode::Space,
            modifiers: Modifiers::NONE
        }
        .is_discrete());
    }

    #[test]
    fn modifiers_are_reported_for_buttons_and_keys() {
        let event = InputEvent::MouseButtonUp {
            button: MouseButton::Left,
            modifiers: Modifiers::CTRL,
        };
        assert_eq!(event.modifiers(), Some(Modifiers::CTRL));
        assert_eq!(InputEvent::MouseMoved { x: 0.0, y: 0.0 }.modifiers(), None);
    }

    #[test]
    fn modifier_constants() {
        assert!(Modifiers::NONE.is_empty());
        assert!(Modifiers::default().is_empty());
        assert!(Modifiers::SHIFT.shift && !Modifiers::SHIFT.ctrl);
        assert!(Modifiers::ALT.alt && !Modifiers::ALT.is_empty());
    }
}
