//=========================================================================
// State Tracker
//=========================================================================
//
// Folds each tick's input events into "held" state and per-tick edges.
//
// Frame lifecycle: step(batches) → query
//
//   held:    survives the tick boundary (keys/buttons currently down)
//   edges:   rebuilt every step (pressed/released during this tick)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Keyboard and mouse state as seen by the logic thread.
#[derive(Debug, Default)]
pub struct StateTracker {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    cursor: (f32, f32),
    modifiers: Modifiers,

    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Starts a new tick and applies its event batches in order.
    pub fn step(&mut self, batches: &[Vec<InputEvent>]) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();

        for event in batches.iter().flatten() {
            self.apply(event);
        }

        if self.any_key_clicked() {
            trace!("Pressed this tick: keys {:?}, buttons {:?}", self.keys_pressed, self.buttons_pressed);
        }
    }

    fn apply(&mut self, event: &InputEvent) {
        if let Some(modifiers) = event.modifiers() {
            self.modifiers = modifiers;
        }

        match *event {
            InputEvent::KeyDown { key, .. } => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::KeyUp { key, .. } => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            InputEvent::MouseButtonDown { button, .. } => {
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::MouseButtonUp { button, .. } => {
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            InputEvent::MouseMoved { x, y } => self.cursor = (x, y),
        }
    }

    //--- Queries ----------------------------------------------------------

    /// `true` if any key or mouse button went down during this tick.
    pub fn any_key_clicked(&self) -> bool {
        !self.keys_pressed.is_empty() || !self.buttons_pressed.is_empty()
    }

    /// `true` only on the tick the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Last reported cursor position.
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key, modifiers: Modifiers::NONE }
    }

    #[test]
    fn press_is_reported_for_one_tick() {
        let mut state = StateTracker::new();

        state.step(&[vec![key_down(KeyCode::Enter)]]);
        assert!(state.any_key_clicked());
        assert!(state.is_key_pressed(KeyCode::Enter));

        state.step(&[]);
        assert!(!state.any_key_clicked());
        assert!(state.is_key_down(KeyCode::Enter));

        state.step(&[vec![key_up(KeyCode::Enter)]]);
        assert!(state.is_key_released(KeyCode::Enter));
        assert!(!state.is_key_down(KeyCode::Enter));
    }

    #[test]
    fn held_key_does_not_click_again() {
        let mut state = StateTracker::new();
        state.step(&[vec![key_down(KeyCode::KeyZ)]]);

        state.step(&[vec![key_down(KeyCode::KeyZ)]]);

        assert!(!state.any_key_clicked());
    }

    #[test]
    fn mouse_button_counts_as_any_key() {
        let mut state = StateTracker::new();

        state.step(&[vec![InputEvent::MouseButtonDown {
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        }]]);

        assert!(state.any_key_clicked());
        assert!(state.is_button_pressed(MouseButton::Left));
        assert_eq!(state.modifiers(), Modifiers::SHIFT);
    }

    #[test]
    fn tap_within_one_tick_is_seen() {
        let mut state = StateTracker::new();

        state.step(&[vec![key_down(KeyCode::Space), key_up(KeyCode::Space)]]);

        assert!(state.any_key_clicked());
        assert!(state.is_key_released(KeyCode::Space));
        assert!(!state.is_key_down(KeyCode::Space));
    }

    #[test]
    fn cursor_follows_last_move() {
        let mut state = StateTracker::new();

        state.step(&[
            vec![InputEvent::MouseMoved { x: 1.0, y: 2.0 }],
            vec![InputEvent::MouseMoved { x: 30.0, y: 40.0 }],
        ]);

        assert_eq!(state.cursor(), (30.0, 40.0));
        assert!(!state.any_key_clicked());
    }
}
