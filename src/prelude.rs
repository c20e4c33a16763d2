//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports of the types most game code touches.
//
// Usage:
//   use saketsudukero::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems, WindowInfo};

// Input
pub use crate::core::input::{KeyCode, Modifiers, MouseButton};

// Scenes
pub use crate::core::scene::{Scene, SceneKey, SceneTransition};

// Drawing
pub use crate::core::render::{Canvas, Vec2};

// Tasks
pub use crate::task::{Task, TaskContext, TaskId, TaskKeep, TaskSystem, DRAW, UPDATE};
