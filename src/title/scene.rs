//=========================================================================
// Title Scene
//=========================================================================
//
// Hosts the title sequence inside the scene stack.
//
// Tick:
//   lend canvas/assets → UPDATE → DRAW → deliver events → task update
//   → return canvas/assets
//
//=========================================================================

//=== External Dependencies ===============================================

use std::mem;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::create_object::CreateObject;
use super::stage::{Stage, TitleWorld};
use super::{TitleConfig, TitleEvent};
use crate::core::globals::GlobalContext;
use crate::core::observer::{ObserverId, Subject};
use crate::core::render::Vec2;
use crate::core::scene::{Scene, SceneKey};
use crate::task::TaskSystem;

//=== TitleScene ==========================================================

/// Delivery rounds per tick before remaining events wait for the next one.
const MAX_DELIVERY_ROUNDS: usize = 8;

pub struct TitleScene {
    config: TitleConfig,
    subject: Subject<TitleEvent, TitleWorld>,
    world: TitleWorld,
    creator: Option<ObserverId>,
    started: bool,
}

impl TitleScene {
    pub fn new(config: TitleConfig) -> Self {
        Self {
            config,
            subject: Subject::new(),
            world: TitleWorld::new(Vec2::ZERO),
            creator: None,
            started: false,
        }
    }

    /// `true` once the player has answered the prompt.
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn tasks(&self) -> &TaskSystem<Stage> {
        &self.world.tasks
    }

    //--- Frame Plumbing ---------------------------------------------------

    fn lend<S: SceneKey>(&mut self, context: &mut GlobalContext<S>) {
        let stage = &mut self.world.stage;
        stage.frame = context.frame;
        stage.any_key_clicked = context.any_key_clicked();
        stage.center = context.window.center();
        mem::swap(&mut stage.canvas, &mut context.canvas);
        mem::swap(&mut stage.assets, &mut context.assets);
    }

    fn give_back<S: SceneKey>(&mut self, context: &mut GlobalContext<S>) {
        let stage = &mut self.world.stage;
        mem::swap(&mut stage.canvas, &mut context.canvas);
        mem::swap(&mut stage.assets, &mut context.assets);
    }

    /// Hands queued events to observers until none are raised.
    fn deliver(&mut self) {
        for _ in 0..MAX_DELIVERY_ROUNDS {
            let events = self.world.stage.outbox.take();
            if events.is_empty() {
                return;
            }

            for event in events {
                if event == TitleEvent::Started {
                    self.started = true;
                    info!("Title finished on frame {}, game start requested", self.world.stage.frame);
                }
                self.subject.notify(&event, &mut self.world);
            }
        }

        if !self.world.stage.outbox.is_empty() {
            warn!(
                "{} title event(s) deferred to the next tick",
                self.world.stage.outbox.len()
            );
        }
    }
}

impl Default for TitleScene {
    fn default() -> Self {
        Self::new(TitleConfig::default())
    }
}

//=== Scene Integration ===================================================

impl<S: SceneKey> Scene<S> for TitleScene {
    fn on_enter(&mut self, context: &mut GlobalContext<S>) {
        self.started = false;
        self.lend(context);

        let creator = self.subject.add_observer(CreateObject::new(self.config.clone()));
        self.creator = Some(creator);
        self.subject.notify(&TitleEvent::CreateOpeningText, &mut self.world);

        self.give_back(context);
        debug!("Title scene entered");
    }

    fn update(&mut self, context: &mut GlobalContext<S>) {
        self.lend(context);

        self.world.dispatch();
        self.deliver();
        self.world.tasks.update();

        self.give_back(context);
    }

    fn on_exit(&mut self, _context: &mut GlobalContext<S>) {
        if let Some(creator) = self.creator.take() {
            self.subject.remove_observer(creator);
        }
        self.world.stage.outbox.clear();
        let removed = self.world.tasks.clear();
        debug!("Title scene exited, {} task(s) cleared", removed);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crate::core::render::DrawCommand;
    use crate::title::{GraphPhase, OpeningGraph, OpeningText, TitleGraph, TitleText};
    use crate::core::observer::Observer;
    use std::sync::{Arc, Mutex};

    /// Records every event and answers `from` by raising `to`.
    struct Relay {
        from: TitleEvent,
        to: TitleEvent,
        seen: Arc<Mutex<Vec<TitleEvent>>>,
    }

    impl Observer<TitleEvent, TitleWorld> for Relay {
        fn on_notify(&mut self, event: &TitleEvent, world: &mut TitleWorld) {
            self.seen.lock().unwrap().push(*event);
            if *event == self.from {
                world.stage.raise(self.to);
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Title,
    }
    impl SceneKey for Key {}

    struct Harness {
        scene: TitleScene,
        context: GlobalContext<Key>,
    }

    impl Harness {
        /// Scene without the stage spawner, fed only by `relay`.
        fn relaying(from: TitleEvent, to: TitleEvent) -> (Self, Arc<Mutex<Vec<TitleEvent>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let mut scene = TitleScene::default();
            scene.subject.add_observer(Relay {
                from,
                to,
                seen: Arc::clone(&seen),
            });
            let harness = Self {
                scene,
                context: GlobalContext::headless(),
            };
            (harness, seen)
        }

        fn new(config: TitleConfig) -> Self {
            let mut scene = TitleScene::new(config);
            let mut context = GlobalContext::headless();
            Scene::<Key>::on_enter(&mut scene, &mut context);
            Self { scene, context }
        }

        fn tick(&mut self) {
            self.context.begin_frame();
            Scene::<Key>::update(&mut self.scene, &mut self.context);
        }

        fn tick_until(&mut self, frame: u64) {
            while self.context.frame < frame {
                self.tick();
            }
        }

        fn press_and_tick(&mut self) {
            self.context.frame_events.push(vec![
                InputEvent::KeyDown {
                    key: KeyCode::Enter,
                    modifiers: Modifiers::NONE,
                },
                InputEvent::KeyUp {
                    key: KeyCode::Enter,
                    modifiers: Modifiers::NONE,
                },
            ]);
            self.tick();
        }

        fn tasks(&self) -> &TaskSystem<Stage> {
            self.scene.tasks()
        }

        fn graph(&self) -> &TitleGraph {
            self.tasks().get_front::<TitleGraph>().unwrap()
        }
    }

    #[test]
    fn legal_text_fades_in_and_out() {
        let mut harness = Harness::new(TitleConfig::default());

        harness.tick();
        assert_eq!(harness.tasks().get_front::<OpeningText>().unwrap().alpha(), 0.0);
        let text = harness.context.canvas.find_text("2016  @dorisol1019").unwrap();
        assert_eq!(text.center(), Vec2::new(480.0, 270.0));

        harness.tick_until(61);
        assert_eq!(harness.tasks().get_front::<OpeningText>().unwrap().alpha(), 0.5);

        harness.tick_until(121);
        assert_eq!(harness.tasks().get_front::<OpeningText>().unwrap().alpha(), 1.0);

        harness.tick_until(240);
        assert!(harness.tasks().get_front::<OpeningText>().is_some());
        assert!(harness.tasks().get_is_empty::<OpeningGraph>());
    }

    #[test]
    fn logo_follows_legal_text() {
        let mut harness = Harness::new(TitleConfig::default());

        harness.tick_until(241);
        assert!(harness.tasks().get_is_empty::<OpeningText>());
        assert_eq!(harness.tasks().get_len::<OpeningGraph>(), 1);
        assert_eq!(harness.tasks().len(), 1);

        harness.tick();
        let logo = harness.context.canvas.find_texture("Data/System/SRDG_Logo.png").unwrap();
        assert_eq!(logo.alpha(), 0.0);

        harness.tick_until(362);
        assert_eq!(harness.tasks().get_front::<OpeningGraph>().unwrap().alpha(), 1.0);

        harness.tick_until(482);
        assert!(harness.tasks().get_is_empty::<TitleGraph>());

        harness.tick_until(483);
        assert!(harness.tasks().get_is_empty::<OpeningGraph>());
        assert_eq!(harness.tasks().get_len::<TitleGraph>(), 1);
    }

    #[test]
    fn title_rises_then_prompt_appears() {
        let mut harness = Harness::new(TitleConfig::default());

        harness.tick_until(484);
        assert_eq!(harness.graph().phase(), GraphPhase::Appear);
        assert_eq!(harness.graph().position(), Vec2::new(480.0, 270.0));

        harness.tick_until(603);
        assert_eq!(harness.graph().phase(), GraphPhase::Move);

        harness.tick_until(604);
        assert_eq!(harness.graph().position().y, 265.0);

        harness.tick_until(634);
        assert!(harness.tasks().get_is_empty::<TitleText>());

        harness.tick_until(635);
        assert_eq!(harness.graph().phase(), GraphPhase::Stopping);
        assert_eq!(harness.graph().position().y, 110.0);
        assert_eq!(harness.tasks().get_len::<TitleText>(), 1);

        harness.tick();
        let prompt = harness.context.canvas.find_text("Press Start").unwrap();
        assert_eq!(prompt.center(), Vec2::new(480.0, 310.0));
        let title = harness.context.canvas.find_texture("Data/System/Title.png").unwrap();
        assert_eq!((title.center().y, title.alpha()), (110.0, 1.0));
    }

    #[test]
    fn key_on_prompt_starts_the_game() {
        let mut harness = Harness::new(TitleConfig::default());
        harness.tick_until(636);
        assert!(!harness.scene.started());

        harness.press_and_tick();

        assert!(harness.scene.started());
        assert!(harness.tasks().get_is_empty::<TitleText>());
        assert_eq!(harness.tasks().get_len::<TitleGraph>(), 1);
    }

    #[test]
    fn keys_skip_appear_and_rise() {
        let mut harness = Harness::new(TitleConfig::default());
        harness.tick_until(490);

        harness.press_and_tick();
        assert_eq!(harness.graph().phase(), GraphPhase::Move);

        harness.tick();
        assert_eq!(harness.graph().position().y, 265.0);

        harness.press_and_tick();
        assert_eq!(harness.graph().phase(), GraphPhase::Stopping);
        assert_eq!(harness.graph().position().y, 110.0);
        assert_eq!(harness.tasks().get_len::<TitleText>(), 1);
        assert!(!harness.scene.started());
    }

    #[test]
    fn keys_do_not_skip_the_opening() {
        let mut harness = Harness::new(TitleConfig::default());

        for _ in 0..10 {
            harness.press_and_tick();
        }

        assert_eq!(harness.tasks().get_len::<OpeningText>(), 1);
        assert!(!harness.scene.started());
    }

    #[test]
    fn shorter_fades_compress_the_timeline() {
        let config = TitleConfig::builder().fade_frames(4).build();
        let mut harness = Harness::new(config);

        harness.tick_until(9);
        assert_eq!(harness.tasks().get_len::<OpeningGraph>(), 1);

        harness.tick_until(19);
        assert_eq!(harness.tasks().get_len::<TitleGraph>(), 1);
    }

    #[test]
    fn assets_are_returned_to_the_context() {
        let mut harness = Harness::new(TitleConfig::default());
        harness.tick_until(242);

        assert!(harness.context.assets.font("font").is_some());
        assert_eq!(harness.context.assets.cached_textures(), 1);
        assert!(harness
            .context
            .canvas
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Texture { .. })));
    }

    #[test]
    fn exit_clears_tasks_and_observer() {
        let mut harness = Harness::new(TitleConfig::default());
        harness.tick();

        Scene::<Key>::on_exit(&mut harness.scene, &mut harness.context);

        assert!(harness.tasks().is_empty());
        assert!(harness.scene.subject.is_empty());
    }

    //--- Event Delivery ---------------------------------------------------

    #[test]
    fn follow_up_events_arrive_in_the_same_tick() {
        let (mut harness, seen) = Harness::relaying(TitleEvent::CreateTitleText, TitleEvent::Started);
        harness.scene.world.stage.raise(TitleEvent::CreateTitleText);

        harness.tick();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![TitleEvent::CreateTitleText, TitleEvent::Started]
        );
        assert!(harness.scene.started());
        assert!(harness.scene.world.stage.outbox.is_empty());
    }

    #[test]
    fn endless_relay_is_deferred_after_round_limit() {
        let (mut harness, seen) =
            Harness::relaying(TitleEvent::CreateTitleText, TitleEvent::CreateTitleText);
        harness.scene.world.stage.raise(TitleEvent::CreateTitleText);

        harness.tick();
        assert_eq!(seen.lock().unwrap().len(), MAX_DELIVERY_ROUNDS);
        assert_eq!(harness.scene.world.stage.outbox.len(), 1);

        harness.tick();
        assert_eq!(seen.lock().unwrap().len(), 2 * MAX_DELIVERY_ROUNDS);
        assert_eq!(harness.scene.world.stage.outbox.len(), 1);
    }
}
