//=========================================================================
// Title Stage
//=========================================================================
//
// Per-tick environment handed to title tasks, and the world that owns
// both the tasks and that environment.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::TitleEvent;
use crate::core::observer::EventQueue;
use crate::core::render::{Assets, DrawList, Vec2};
use crate::task::{CallFn, CallId, Task, TaskContext, TaskSystem, DRAW, UPDATE};

//=== Stage ===============================================================

/// What a title task can see and touch during a callback.
#[derive(Debug, Default)]
pub struct Stage {
    pub frame: u64,
    pub any_key_clicked: bool,
    pub center: Vec2,
    pub canvas: DrawList,
    pub assets: Assets,
    pub outbox: EventQueue<TitleEvent>,
}

impl Stage {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }

    /// Queues an event for delivery after the current dispatch pass.
    pub fn raise(&mut self, event: TitleEvent) {
        debug!("Frame {}: raised {:?}", self.frame, event);
        self.outbox.push(event);
    }
}

//=== TitleWorld ==========================================================

/// Title tasks plus their stage. This is the context observers receive.
pub struct TitleWorld {
    pub tasks: TaskSystem<Stage>,
    pub stage: Stage,
}

impl TitleWorld {
    pub fn new(center: Vec2) -> Self {
        Self {
            tasks: TaskSystem::new(),
            stage: Stage::new(center),
        }
    }

    /// Runs the update group, then the draw group.
    pub fn dispatch(&mut self) {
        self.tasks.call_all(UPDATE, &mut self.stage);
        self.tasks.call_all(DRAW, &mut self.stage);
    }
}

//=== Helpers =============================================================

/// `t / frames` as a draw alpha.
pub(super) fn fade_alpha(t: u32, frames: u32) -> f32 {
    t as f32 / frames as f32
}

/// Swaps the callback of the calling task's own binding.
pub(super) fn switch_to<T: Task>(cx: &mut TaskContext<'_, Stage>, call: CallId, f: CallFn<T, Stage>) {
    if let Err(e) = cx.set_call(call, f) {
        warn!("{} could not switch phase: {}", cx.id(), e);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_queues_in_order() {
        let mut stage = Stage::new(Vec2::new(480.0, 270.0));
        stage.raise(TitleEvent::CreateTitleGraph);
        stage.raise(TitleEvent::Started);

        assert_eq!(
            stage.outbox.take(),
            vec![TitleEvent::CreateTitleGraph, TitleEvent::Started]
        );
        assert!(stage.outbox.is_empty());
    }

    #[test]
    fn fade_alpha_is_linear() {
        assert_eq!(fade_alpha(0, 120), 0.0);
        assert_eq!(fade_alpha(60, 120), 0.5);
        assert_eq!(fade_alpha(120, 120), 1.0);
    }
}
