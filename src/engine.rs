//=========================================================================
// Engine
//
// Entry point: configure with EngineBuilder, register scenes in init(),
// then run() until the window closes.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init(): scenes, assets
//         ├─ with_channel_capacity() └─ run(): tick thread + window loop
//         ├─ with_window_title()
//         ├─ with_window_size()
//         └─ with_font()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::bounded;
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::globals::{GlobalContext, GlobalSystems, WindowInfo};
use crate::core::render::Assets;
use crate::core::scene::SceneKey;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0
/// - **Channel capacity**: 128 messages
/// - **Window**: "避け続けろ！", 960x540
/// - **Font**: `"font"` at 15px
///
/// ```no_run
/// use saketsudukero::EngineBuilder;
/// use saketsudukero::core::scene::SceneKey;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameScene { Title }
/// impl SceneKey for GameScene {}
///
/// EngineBuilder::<GameScene>::new()
///     .with_tps(60.0)
///     .with_window_title("demo")
///     .build()
///     .run();
/// ```
pub struct EngineBuilder<S: SceneKey> {
    tps: f64,
    channel_capacity: usize,
    window: WindowInfo,
    font: (String, u32),
    _phantom: std::marker::PhantomData<S>,
}

impl<S: SceneKey> EngineBuilder<S> {
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            window: WindowInfo::default(),
            font: ("font".to_owned(), 15),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the scene tick rate. Fades and movement are counted in ticks,
    /// so this also sets their wall-clock speed.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets how many platform messages may queue before the window thread
    /// blocks.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive");
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Registers the default font by name and pixel size.
    pub fn with_font(mut self, name: impl Into<String>, size: u32) -> Self {
        self.font = (name.into(), size);
        self
    }

    pub fn build(self) -> Engine<S> {
        info!(
            "Building engine (TPS: {}, channel: {}, window: {}x{})",
            self.tps, self.channel_capacity, self.window.width, self.window.height
        );

        let mut assets = Assets::new();
        let (name, size) = self.font;
        assets.register_font(name, size);

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(self.window.clone(), assets),
            window: self.window,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl<S: SceneKey> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Engine runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Tick Thread @ TPS)
///   │     └─► SceneManager → scenes → task systems
///   │
///   └─► Platform (winit event loop)
///         └─► Window, input capture
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine<S: SceneKey> {
    orchestrator: CoreSystemsOrchestrator<S>,
    window: WindowInfo,
    tps: f64,
    channel_capacity: usize,
}

impl<S: SceneKey> Engine<S> {
    /// Registers scenes (and anything else) before the engine runs.
    ///
    /// ```no_run
    /// # use saketsudukero::prelude::*;
    /// # use saketsudukero::title::{TitleConfig, TitleScene};
    /// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// # enum GameScene { Title }
    /// # impl SceneKey for GameScene {}
    /// EngineBuilder::<GameScene>::new()
    ///     .build()
    ///     .init(|systems, _context| {
    ///         systems
    ///             .scene_manager
    ///             .register_default(GameScene::Title, TitleScene::new(TitleConfig::default()));
    ///     })
    ///     .run();
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems<S>, &mut GlobalContext<S>),
    {
        info!("Initializing engine systems");
        self.orchestrator.init_systems(init_fn);
        self
    }

    /// Runs until the window closes. Blocks the calling (main) thread.
    pub fn run(self) {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let (tx, rx) = bounded(self.channel_capacity);
        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);

        let platform = Platform::new(tx, self.window);
        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Main,
    }

    impl SceneKey for TestScene {}

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::<TestScene>::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.window, WindowInfo::default());
        assert_eq!(builder.font, ("font".to_owned(), 15));
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn zero_tps_panics() {
        EngineBuilder::<TestScene>::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn negative_tps_panics() {
        EngineBuilder::<TestScene>::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn zero_capacity_panics() {
        EngineBuilder::<TestScene>::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn zero_window_size_panics() {
        EngineBuilder::<TestScene>::new().with_window_size(0, 480);
    }

    #[test]
    fn fluent_configuration_reaches_engine() {
        let engine = EngineBuilder::<TestScene>::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .with_window_title("test")
            .with_window_size(640, 480)
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.window.title, "test");
        assert_eq!(engine.window.center().x, 320.0);
    }

    #[test]
    fn init_sees_registered_font() {
        let mut font_size = None;

        let _engine = EngineBuilder::<TestScene>::new()
            .with_font("mono", 12)
            .build()
            .init(|_, context| font_size = context.assets.font("mono").map(|f| f.size()));

        assert_eq!(font_size, Some(12));
    }
}
