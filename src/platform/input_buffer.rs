//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-redraw staging area between the input processor and the channel.
//
// - discrete: key and button edges, in order, consecutive duplicates dropped
// - continuous: only the most recent cursor position survives
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::input_processor::Lane;
use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    cursor: Option<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(32),
            cursor: None,
        }
    }

    pub(crate) fn push(&mut self, lane: Lane) {
        match lane {
            Lane::Discrete(event) => self.push_discrete(event),
            Lane::Continuous(event) => self.push_continuous(event),
        }
    }

    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.cursor = Some(event);
    }

    /// Empties the buffer, returning `(discrete, continuous)`, or `None`
    /// when nothing was buffered.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::replace(&mut self.discrete, Vec::with_capacity(32));
        let continuous = self.cursor.take().into_iter().collect();
        Some((discrete, continuous))
    }

    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + usize::from(self.cursor.is_some())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.cursor.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn consecutive_duplicates_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyB));
        buffer.push_discrete(key_down(KeyCode::KeyA));

        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn cursor_keeps_latest_position() {
        let mut buffer = InputBuffer::new();
        buffer.push(Lane::Continuous(InputEvent::MouseMoved { x: 10.0, y: 10.0 }));
        buffer.push(Lane::Continuous(InputEvent::MouseMoved { x: 20.0, y: 30.0 }));

        let (discrete, continuous) = buffer.drain().unwrap();

        assert!(discrete.is_empty());
        assert_eq!(continuous, vec![InputEvent::MouseMoved { x: 20.0, y: 30.0 }]);
    }

    #[test]
    fn drain_empties_and_reports_nothing_twice() {
        let mut buffer = InputBuffer::new();
        buffer.push(Lane::Discrete(key_down(KeyCode::Space)));
        buffer.push(Lane::Continuous(InputEvent::MouseMoved { x: 5.0, y: 5.0 }));

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!((discrete.len(), continuous.len()), (1, 1));
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }
}
