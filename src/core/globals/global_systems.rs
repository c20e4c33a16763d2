//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems with logic.
//
// Systems operate on GlobalContext data once per tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::scene::{SceneKey, SceneManager};

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
///
/// - `scene_manager`: stack-based scene lifecycle manager
pub struct GlobalSystems<S: SceneKey> {
    pub scene_manager: SceneManager<S>,
}

impl<S: SceneKey> GlobalSystems<S> {
    pub(crate) fn new() -> Self {
        Self {
            scene_manager: SceneManager::new(),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Frame start**: fold input, advance frame counter, clear canvas
    /// 2. **Scene update**: active scenes run (and record draw calls)
    /// 3. **Transitions**: queued scene changes are applied
    pub(crate) fn update(&mut self, context: &mut GlobalContext<S>) {
        context.begin_frame();

        self.scene_manager.update(context);
        self.scene_manager.process_transitions(context);

        trace!("Tick {} recorded {} draw call(s)", context.frame, context.canvas.len());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Scene, SceneTransition};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        First,
        Second,
    }
    impl SceneKey for Key {}

    struct Handoff;

    impl Scene<Key> for Handoff {
        fn update(&mut self, context: &mut GlobalContext<Key>) {
            if context.frame == 2 {
                context
                    .scene_transitions
                    .push(SceneTransition::Replace(Key::First, Key::Second));
            }
        }
    }

    struct Idle;

    impl Scene<Key> for Idle {
        fn update(&mut self, _context: &mut GlobalContext<Key>) {}
    }

    #[test]
    fn update_applies_transitions_at_tick_end() {
        let mut systems = GlobalSystems::new();
        let mut context = GlobalContext::headless();
        systems.scene_manager.register_default(Key::First, Handoff);
        systems.scene_manager.register_scene(Key::Second, Idle);
        systems.scene_manager.start(&mut context);

        systems.update(&mut context);
        assert_eq!(systems.scene_manager.stack(), &[Key::First]);

        systems.update(&mut context);
        assert_eq!(systems.scene_manager.stack(), &[Key::Second]);
        assert_eq!(context.frame, 2);
    }
}
