//=========================================================================
// Saketsudukero — Library Root
//
// Title sequence runtime for a small arcade dodging game.
//
// Layers:
// - `task`: the scheduler game objects live in (bindings, keeps, lookups)
// - `title`: the opening credits and title screen, built on `task`
// - `core`: scenes, input state, observers, and the recording canvas
// - `platform` / `engine`: winit window and the fixed-rate tick thread
//
// ```no_run
// use saketsudukero::prelude::*;
// use saketsudukero::title::{TitleConfig, TitleScene};
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum GameScene { Title }
// impl SceneKey for GameScene {}
//
// EngineBuilder::<GameScene>::new()
//     .build()
//     .init(|systems, _| {
//         systems
//             .scene_manager
//             .register_default(GameScene::Title, TitleScene::new(TitleConfig::default()));
//     })
//     .run();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod prelude;
pub mod task;
pub mod title;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the OS window and must stay on the main thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
