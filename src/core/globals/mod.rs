//=========================================================================
// Global Engine State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: SceneManager (owned by orchestrator)
//   GlobalContext: StateTracker + TransitionQueue + DrawList + Assets
//                  (passed to scenes)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::{GlobalContext, WindowInfo};
pub use global_systems::GlobalSystems;
