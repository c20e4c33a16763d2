//=========================================================================
// Task System
//=========================================================================
//
// Small scheduler for polymorphic game objects ("tasks").
//
// Architecture:
// ```text
//   TaskSystem<E>
//     ├─ registry   slab + index-linked list in creation order
//     ├─ calls      per-group priority lists of (task, callback) bindings
//     ├─ gets       type-keyed rosters for indexed lookup
//     └─ links      type-keyed rosters for broadcast calls
//
//   Frame:  call_all(UPDATE) → call_all(DRAW) → update()
// ```
//
// Tasks never hold pointers to each other. Everything is addressed by
// generational ids (`TaskId`, `CallId`, `KeepId`), so a stale handle
// resolves to `None` instead of a dangling object.
//
// `E` is the caller's per-frame environment (canvas, input snapshot,
// outgoing events...). It is handed to every callback through
// `TaskContext` and is never owned by the system.
//
//=========================================================================

//=== Module Declarations =================================================

mod call;
mod context;
mod error;
mod keep;
mod keep_array;
mod registry;
mod roster;

//=== Standard Library Imports ============================================

use std::any::Any;

//=== Public API ==========================================================

pub use call::{CallFn, CallId};
pub use context::{TaskBuilder, TaskContext};
pub use error::TaskError;
pub use keep::TaskKeep;
pub use keep_array::{KeepId, TaskKeepArray};
pub use registry::{DestroyMode, TaskId, TaskSystem};

//=== Call Groups =========================================================

/// Group dispatched first each frame (state changes).
pub const UPDATE: u8 = 0;

/// Group dispatched after [`UPDATE`] (drawing).
pub const DRAW: u8 = 1;

//=== Task Trait ==========================================================

/// Marker trait for objects managed by a [`TaskSystem`].
///
/// A task carries no behavior of its own. Behavior is attached by binding
/// callbacks (see [`TaskBuilder::bind`]) which the system dispatches in
/// group and priority order.
///
/// ```
/// use saketsudukero::task::{Task, TaskContext, TaskSystem};
///
/// struct Blink { frames: u32 }
/// impl Task for Blink {}
///
/// impl Blink {
///     fn tick(&mut self, _ctx: &mut TaskContext<'_, ()>) {
///         self.frames += 1;
///     }
/// }
///
/// let mut tasks = TaskSystem::<()>::new();
/// let id = tasks.create(|cx| {
///     cx.bind(Blink::tick);
///     Blink { frames: 0 }
/// });
/// tasks.call_all(0, &mut ());
/// assert_eq!(tasks.get::<Blink>(id).map(|b| b.frames), Some(1));
/// ```
pub trait Task: AsAnyTask + Send + 'static {
    /// Human readable name used in log output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Downcasting support for `dyn Task`.
///
/// Implemented for every [`Task`]; not meant to be implemented by hand.
#[doc(hidden)]
pub trait AsAnyTask {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Task> AsAnyTask for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
