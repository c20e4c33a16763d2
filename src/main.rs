use saketsudukero::prelude::*;
use saketsudukero::title::{TitleConfig, TitleScene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GameScene {
    Title,
}

impl SceneKey for GameScene {}

fn main() {
    env_logger::init();

    EngineBuilder::<GameScene>::new()
        .build()
        .init(|systems, _context| {
            systems
                .scene_manager
                .register_default(GameScene::Title, TitleScene::new(TitleConfig::default()));
        })
        .run();
}
