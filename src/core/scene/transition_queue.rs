//=== Transition Queue ====================================================
//
// Scenes queue transitions here during updates. The scene manager
// applies them at the tick boundary.

use super::SceneTransition;
use crate::core::observer::EventQueue;

/// Pending scene stack operations for the current tick.
pub type TransitionQueue<S> = EventQueue<SceneTransition<S>>;
