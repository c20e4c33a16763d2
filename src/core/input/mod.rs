//=========================================================================
// Input
//=========================================================================
//
// Engine-side input representation and per-tick state.
//
//   event          platform-neutral InputEvent, KeyCode, MouseButton
//   state_tracker  held keys and per-tick press/release edges
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state_tracker::StateTracker;
