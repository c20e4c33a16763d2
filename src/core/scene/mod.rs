//=========================================================================
// Scene System
//=========================================================================
//
// Stack of scenes with lifecycle hooks.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<S, Box<dyn Scene<S>>>
//     └─ stack: Vec<S>
//
// Flow:
//   update() → active scenes (top down to first opaque) → Scene::update()
//   process_transitions() → drain TransitionQueue → on_exit / on_enter
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;

//=== Module Declarations =================================================

mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_manager::{SceneKey, SceneManager, SceneTransition};
pub use transition_queue::TransitionQueue;

//=== Scene Trait =========================================================

/// Scene behavior with lifecycle hooks.
///
/// Scenes keep their own state between activations. Only `update` is
/// required:
///
/// ```rust
/// # use saketsudukero::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScene { Main }
/// # impl SceneKey for GameScene {}
/// struct Blank;
///
/// impl Scene<GameScene> for Blank {
///     fn update(&mut self, _context: &mut GlobalContext<GameScene>) {}
/// }
/// ```
pub trait Scene<S: SceneKey>: Send {
    /// Called when the scene enters the active stack.
    fn on_enter(&mut self, _context: &mut GlobalContext<S>) {}

    /// Called when the scene leaves the active stack (or the engine stops).
    fn on_exit(&mut self, _context: &mut GlobalContext<S>) {}

    /// Called every tick while the scene is active.
    fn update(&mut self, context: &mut GlobalContext<S>);

    /// Whether scenes below this one keep updating.
    fn is_transparent(&self) -> bool {
        false
    }
}
