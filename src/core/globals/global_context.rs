//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for scenes.
//
// Contains state data that scenes read/write:
// - input_state: keys/buttons held and clicked this tick
// - scene_transitions: command queue for scene changes
// - frame / canvas / assets / window: the narrow render surface
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, StateTracker};
use crate::core::render::{Assets, DrawList, Vec2};
use crate::core::scene::{SceneKey, TransitionQueue};

//=== WindowInfo ==========================================================

/// Window parameters fixed at engine build time.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowInfo {
    /// Centre of the client area in window pixels.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

impl Default for WindowInfo {
    fn default() -> Self {
        Self {
            title: "避け続けろ！".to_owned(),
            width: 960,
            height: 540,
        }
    }
}

//=== GlobalContext =======================================================

/// Shared context data accessible to scenes during updates.
pub struct GlobalContext<S: SceneKey> {
    /// Input state for the current tick.
    pub input_state: StateTracker,

    /// Scene changes requested this tick, applied at the tick boundary.
    pub scene_transitions: TransitionQueue<S>,

    /// Ticks since the engine started; the first tick is 1.
    pub frame: u64,

    /// Draw calls recorded during the current tick.
    pub canvas: DrawList,

    /// Fonts and textures.
    pub assets: Assets,

    pub window: WindowInfo,

    /// Input batches collected for the current tick, consumed by
    /// [`begin_frame`](Self::begin_frame).
    pub(crate) frame_events: Vec<Vec<InputEvent>>,
}

impl<S: SceneKey> GlobalContext<S> {
    pub(crate) fn new(window: WindowInfo, assets: Assets) -> Self {
        Self {
            input_state: StateTracker::new(),
            scene_transitions: TransitionQueue::new(),
            frame: 0,
            canvas: DrawList::new(),
            assets,
            window,
            frame_events: Vec::new(),
        }
    }

    /// Context with default window and a single registered `"font"`.
    #[cfg(test)]
    pub(crate) fn headless() -> Self {
        let mut assets = Assets::new();
        assets.register_font("font", 15);
        Self::new(WindowInfo::default(), assets)
    }

    /// Advances to the next tick: folds pending input, bumps the frame
    /// counter, and clears the canvas.
    pub(crate) fn begin_frame(&mut self) {
        let batches = std::mem::take(&mut self.frame_events);
        self.input_state.step(&batches);
        self.frame += 1;
        self.canvas.clear();
    }

    /// `true` if any key or mouse button went down this tick.
    pub fn any_key_clicked(&self) -> bool {
        self.input_state.any_key_clicked()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
