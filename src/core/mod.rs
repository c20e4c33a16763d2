//=========================================================================
// Core Systems Orchestrator
//
// Runs scenes on the tick thread at a fixed rate, fed by platform input
// arriving over the crossbeam channel.
//
// Each tick:
//  1. Drains platform messages (EventCollector)
//  2. Folds input, updates scenes, applies transitions (GlobalSystems)
//  3. Sleeps for the rest of the tick budget
//
// The loop ends when the window closes or the channel disconnects. Scenes
// still on the stack are exited top-down before the thread returns.
//
//=========================================================================

//=== Public Modules ======================================================

pub mod globals;
pub mod input;
pub mod observer;
pub mod render;
pub mod scene;

//=== Internal Modules ====================================================

pub(crate) mod platform_bridge;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use globals::{GlobalContext, GlobalSystems, WindowInfo};
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use render::Assets;
use scene::SceneKey;

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator<S: SceneKey> {
    systems: GlobalSystems<S>,
    context: GlobalContext<S>,
}

impl<S: SceneKey> CoreSystemsOrchestrator<S> {
    pub(crate) fn new(window: WindowInfo, assets: Assets) -> Self {
        Self {
            systems: GlobalSystems::new(),
            context: GlobalContext::new(window, assets),
        }
    }

    /// Gives game code a chance to register scenes and assets before the
    /// tick thread starts.
    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems<S>, &mut GlobalContext<S>),
    {
        init_fn(&mut self.systems, &mut self.context);
    }

    /// Spawns the tick thread.
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let tick = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let Self { mut systems, mut context } = self;
            let mut collector = EventCollector::new(receiver);

            systems.scene_manager.start(&mut context);
            info!("Core thread started ({:?} per tick)", tick);

            loop {
                let tick_start = Instant::now();

                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting after {} tick(s)", context.frame);
                    break;
                }

                context.frame_events.extend(collector.take_batches());
                systems.update(&mut context);

                let elapsed = tick_start.elapsed();
                if elapsed < tick {
                    thread::sleep(tick - elapsed);
                } else {
                    debug!("Tick {} overran by {:?}", context.frame, elapsed - tick);
                }
            }

            systems.scene_manager.shutdown(&mut context);
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crate::core::scene::Scene;
    use crossbeam_channel::unbounded;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Main,
    }
    impl SceneKey for Key {}

    #[derive(Default)]
    struct Seen {
        ticks: u64,
        clicks: u32,
        exited: bool,
    }

    struct Recorder(Arc<Mutex<Seen>>);

    impl Scene<Key> for Recorder {
        fn update(&mut self, context: &mut GlobalContext<Key>) {
            let mut seen = self.0.lock().unwrap();
            seen.ticks = context.frame;
            if context.any_key_clicked() {
                seen.clicks += 1;
            }
        }

        fn on_exit(&mut self, _context: &mut GlobalContext<Key>) {
            self.0.lock().unwrap().exited = true;
        }
    }

    #[test]
    fn tick_thread_feeds_input_and_shuts_down_scenes() {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let mut orchestrator = CoreSystemsOrchestrator::new(WindowInfo::default(), Assets::new());
        let recorder = Recorder(Arc::clone(&seen));
        orchestrator.init_systems(|systems, _| systems.scene_manager.register_default(Key::Main, recorder));

        let (tx, rx) = unbounded();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown {
                key: KeyCode::Space,
                modifiers: Modifiers::NONE,
            }],
            continuous: vec![],
        })
        .unwrap();

        let handle = orchestrator.spawn_core_thread(rx, 1000.0);
        while seen.lock().unwrap().ticks < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.clicks, 1);
        assert!(seen.exited);
    }
}
