//=========================================================================
// Scene Manager
//=========================================================================
//
// Scene registration, stack operations, and lifecycle dispatch.
//
// Scenes are stored by key and referenced from a stack of keys, so a
// scene keeps its state while it is off the stack.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::globals::GlobalContext;

//=== Scene Transition ====================================================

/// Scene stack operation, applied at the tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Adds a scene on top of the stack.
    Push(K),

    /// Removes a scene from the stack.
    Remove(K),

    /// Swaps a scene on the stack for another one, in place.
    Replace(K, K),

    /// Empties the stack.
    Clear,

    /// No-op.
    Empty,
}

impl<K: SceneKey> Default for SceneTransition<K> {
    fn default() -> Self {
        Self::Empty
    }
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers (usually a game-side enum).
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Manager =======================================================

/// Stack-based scene lifecycle manager.
pub struct SceneManager<S: SceneKey> {
    scenes: HashMap<S, Box<dyn Scene<S>>>,
    stack: Vec<S>,
}

impl<S: SceneKey> SceneManager<S> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            stack: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under `key`, replacing any previous one.
    pub fn register_scene<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S> + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Registers a scene and places it on the stack.
    ///
    /// Its `on_enter` runs when the engine starts (see [`start`](Self::start)).
    pub fn register_default<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S> + 'static,
    {
        self.register_scene(key, scene);

        if self.stack.contains(&key) {
            warn!("Scene {:?} is already in the stack", key);
        } else {
            debug!("Registered scene {:?} as default", key);
            self.stack.push(key);
        }
    }

    /// Enters every scene already on the stack, bottom to top.
    pub fn start(&mut self, context: &mut GlobalContext<S>) {
        for &key in &self.stack {
            match self.scenes.get_mut(&key) {
                Some(scene) => {
                    debug!("Starting scene {:?}", key);
                    scene.on_enter(context);
                }
                None => warn!("Initial scene {:?} not registered", key),
            }
        }
    }

    /// Exits every scene on the stack, top to bottom, and empties it.
    pub fn shutdown(&mut self, context: &mut GlobalContext<S>) {
        for &key in self.stack.iter().rev() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_exit(context);
            }
        }
        self.stack.clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn stack(&self) -> &[S] {
        &self.stack
    }

    pub fn is_registered(&self, key: S) -> bool {
        self.scenes.contains_key(&key)
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates the top scene plus every scene visible through transparent
    /// scenes above it, bottom first.
    pub fn update(&mut self, context: &mut GlobalContext<S>) {
        for key in self.active_scenes() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.update(context);
            }
        }
    }

    //--- Transition Processing --------------------------------------------

    /// Applies queued transitions in FIFO order.
    pub fn process_transitions(&mut self, context: &mut GlobalContext<S>) {
        for transition in context.scene_transitions.take() {
            match transition {
                SceneTransition::Push(key) => self.push(key, context),
                SceneTransition::Remove(key) => self.remove(key, context),
                SceneTransition::Replace(old, new) => self.replace(old, new, context),
                SceneTransition::Clear => self.shutdown(context),
                SceneTransition::Empty => {}
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn push(&mut self, key: S, context: &mut GlobalContext<S>) {
        if self.stack.contains(&key) {
            warn!("Scene {:?} is already in the stack, skipping push", key);
            return;
        }

        let Some(scene) = self.scenes.get_mut(&key) else {
            warn!("Attempted to push unregistered scene {:?}", key);
            return;
        };

        debug!("Pushing scene {:?}", key);
        self.stack.push(key);
        scene.on_enter(context);
    }

    fn remove(&mut self, key: S, context: &mut GlobalContext<S>) {
        let Some(pos) = self.stack.iter().position(|&k| k == key) else {
            debug!("Scene {:?} not in stack, skipping removal", key);
            return;
        };

        debug!("Removing scene {:?} at position {}", key, pos);
        self.stack.remove(pos);

        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.on_exit(context);
        }
    }

    fn replace(&mut self, old: S, new: S, context: &mut GlobalContext<S>) {
        let Some(pos) = self.stack.iter().position(|&k| k == old) else {
            warn!("Scene {:?} not in stack, skipping replacement", old);
            return;
        };

        if self.stack.contains(&new) {
            warn!("Scene {:?} is already in the stack, skipping replacement", new);
            return;
        }

        if !self.scenes.contains_key(&new) {
            warn!("Attempted to replace with unregistered scene {:?}", new);
            return;
        }

        debug!("Replacing scene {:?} with {:?}", old, new);

        if let Some(scene) = self.scenes.get_mut(&old) {
            scene.on_exit(context);
        }

        self.stack[pos] = new;

        if let Some(scene) = self.scenes.get_mut(&new) {
            scene.on_enter(context);
        }
    }

    fn active_scenes(&self) -> Vec<S> {
        let mut active = Vec::new();

        for &key in self.stack.iter().rev() {
            active.push(key);

            let transparent = self
                .scenes
                .get(&key)
                .map(|scene| scene.is_transparent())
                .unwrap_or(false);
            if !transparent {
                break;
            }
        }

        active.reverse();
        active
    }
}

impl<S: SceneKey> Default for SceneManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        A,
        B,
        C,
    }

    impl SceneKey for TestScene {}

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Probe {
        key: TestScene,
        transparent: bool,
        journal: Journal,
    }

    impl Probe {
        fn new(key: TestScene, journal: &Journal) -> Self {
            Self {
                key,
                transparent: false,
                journal: Arc::clone(journal),
            }
        }

        fn log(&self, what: &str) {
            if let Ok(mut journal) = self.journal.lock() {
                journal.push(format!("{:?}:{}", self.key, what));
            }
        }
    }

    impl Scene<TestScene> for Probe {
        fn on_enter(&mut self, _context: &mut GlobalContext<TestScene>) {
            self.log("enter");
        }

        fn on_exit(&mut self, _context: &mut GlobalContext<TestScene>) {
            self.log("exit");
        }

        fn update(&mut self, _context: &mut GlobalContext<TestScene>) {
            self.log("update");
        }

        fn is_transparent(&self) -> bool {
            self.transparent
        }
    }

    fn drain(journal: &Journal) -> Vec<String> {
        journal.lock().map(|mut j| std::mem::take(&mut *j)).unwrap_or_default()
    }

    #[test]
    fn transition_default_is_empty() {
        let transition: SceneTransition<TestScene> = SceneTransition::default();
        assert_eq!(transition, SceneTransition::Empty);
    }

    #[test]
    fn start_enters_default_scene() {
        let journal = Journal::default();
        let mut context = GlobalContext::<TestScene>::headless();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, Probe::new(TestScene::A, &journal));

        manager.start(&mut context);
        manager.update(&mut context);

        assert_eq!(drain(&journal), vec!["A:enter", "A:update"]);
    }

    #[test]
    fn opaque_scene_hides_lower_scenes() {
        let journal = Journal::default();
        let mut context = GlobalContext::<TestScene>::headless();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, Probe::new(TestScene::A, &journal));
        manager.register_scene(TestScene::B, Probe::new(TestScene::B, &journal));

        context.scene_transitions.push(SceneTransition::Push(TestScene::B));
        manager.process_transitions(&mut context);
        drain(&journal);

        manager.update(&mut context);
        assert_eq!(drain(&journal), vec!["B:update"]);
    }

    #[test]
    fn transparent_scene_lets_lower_scenes_update() {
        let journal = Journal::default();
        let mut context = GlobalContext::<TestScene>::headless();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, Probe::new(TestScene::A, &journal));
        let mut overlay = Probe::new(TestScene::C, &journal);
        overlay.transparent = true;
        manager.register_scene(TestScene::C, overlay);

        context.scene_transitions.push(SceneTransition::Push(TestScene::C));
        manager.process_transitions(&mut context);
        drain(&journal);

        manager.update(&mut context);
        assert_eq!(drain(&journal), vec!["A:update", "C:update"]);
    }

    #[test]
    fn replace_exits_old_and_enters_new() {
        let journal = Journal::default();
        let mut context = GlobalContext::<TestScene>::headless();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, Probe::new(TestScene::A, &journal));
        manager.register_scene(TestScene::B, Probe::new(TestScene::B, &journal));

        context
            .scene_transitions
            .push(SceneTransition::Replace(TestScene::A, TestScene::B));
        manager.process_transitions(&mut context);

        assert_eq!(drain(&journal), vec!["A:exit", "B:enter"]);
        assert_eq!(manager.stack(), &[TestScene::B]);
    }

    #[test]
    fn unregistered_push_is_ignored() {
        let mut context = GlobalContext::<TestScene>::headless();
        let mut manager = SceneManager::<TestScene>::new();

        context.scene_transitions.push(SceneTransition::Push(TestScene::C));
        manager.process_transitions(&mut context);

        assert!(manager.stack().is_empty());
    }

    #[test]
    fn shutdown_exits_top_down() {
        let journal = Journal::default();
        let mut context = GlobalContext::<TestScene>::headless();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::A, Probe::new(TestScene::A, &journal));
        manager.register_default(TestScene::B, Probe::new(TestScene::B, &journal));

        manager.shutdown(&mut context);

        assert_eq!(drain(&journal), vec!["B:exit", "A:exit"]);
        assert!(manager.stack().is_empty());
    }
}
