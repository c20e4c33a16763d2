//=========================================================================
// Event Collector
//=========================================================================
//
// Tick-side end of the platform channel.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → input batches → TickControl
//
// Draining is bounded per tick so a flooding window thread cannot starve
// the scene update. Cursor positions from several redraws collapse into
// the most recent one.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Whether the tick loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

const MAX_EVENTS_PER_TICK: usize = 100;

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
    cursor: Option<InputEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
            cursor: None,
        }
    }

    /// Drains what the window thread has sent since the previous tick.
    ///
    /// Never blocks. Returns [`TickControl::Exit`] when the window closed
    /// or the sender is gone.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.input_batches.clear();
        self.cursor = None;

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_TICK {
            match self.receiver.try_recv() {
                Ok(event) => {
                    drained += 1;
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Platform channel disconnected");
                    return TickControl::Exit;
                }
            }
        }

        if drained >= MAX_EVENTS_PER_TICK {
            warn!("Event queue backlog: drained {} messages this tick", drained);
        }

        if let Some(cursor) = self.cursor.take() {
            self.input_batches.push(vec![cursor]);
        }

        TickControl::Continue
    }

    #[cfg(test)]
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }

    /// Moves the collected batches out, leaving the collector empty.
    pub(crate) fn take_batches(&mut self) -> Vec<Vec<InputEvent>> {
        std::mem::take(&mut self.input_batches)
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if let Some(last) = continuous.into_iter().last() {
                    self.cursor = Some(last);
                }
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn empty_queue_continues_without_batches() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn discrete_batches_keep_arrival_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for key in [KeyCode::KeyA, KeyCode::KeyB] {
            tx.send(PlatformEvent::Inputs {
                discrete: vec![key_down(key)],
                continuous: vec![],
            })
            .unwrap();
        }

        collector.collect_frame();

        let batches = collector.take_batches();
        assert_eq!(batches, vec![vec![key_down(KeyCode::KeyA)], vec![key_down(KeyCode::KeyB)]]);
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn cursor_moves_collapse_to_latest() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![key_down(KeyCode::Space)],
            continuous: vec![InputEvent::MouseMoved { x: 1.0, y: 1.0 }],
        })
        .unwrap();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![],
            continuous: vec![InputEvent::MouseMoved { x: 10.0, y: 20.0 }],
        })
        .unwrap();

        collector.collect_frame();

        assert_eq!(collector.batches().len(), 2);
        assert_eq!(
            collector.batches()[1],
            vec![InputEvent::MouseMoved { x: 10.0, y: 20.0 }]
        );
    }

    #[test]
    fn window_closed_exits() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn previous_batches_are_cleared() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![key_down(KeyCode::Space)],
            continuous: vec![],
        })
        .unwrap();
        collector.collect_frame();
        assert_eq!(collector.batches().len(), 1);

        collector.collect_frame();
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn disconnect_exits() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);
        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn backlog_is_bounded_per_tick() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..MAX_EVENTS_PER_TICK + 5 {
            tx.send(PlatformEvent::Inputs {
                discrete: vec![key_down(KeyCode::KeyZ)],
                continuous: vec![],
            })
            .unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.batches().len(), MAX_EVENTS_PER_TICK);

        collector.collect_frame();
        assert_eq!(collector.batches().len(), 5);
    }
}
