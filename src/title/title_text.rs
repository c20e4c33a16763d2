//=== Title Text ==========================================================
//
// "Press Start" prompt below the window centre. The first key press
// removes it and starts the game.

use log::warn;

use super::stage::{Stage, TitleWorld};
use super::{TitleConfig, TitleEvent};
use crate::core::render::{Canvas, Font, Vec2};
use crate::task::{CallId, Task, TaskContext, TaskId, DRAW};

pub struct TitleText {
    prompt: String,
    font: Font,
    offset: Vec2,
    update: CallId,
}

impl Task for TitleText {}

impl TitleText {
    pub(super) fn spawn(world: &mut TitleWorld, config: &TitleConfig) -> TaskId {
        let font = world.stage.assets.font_or_fallback(&config.font);

        world.tasks.create(|cx| {
            if let Err(e) = cx.register_get() {
                warn!("TitleText lookup unavailable: {}", e);
            }
            let update = cx.bind(Self::wait_for_key);
            cx.bind_with(Self::draw, DRAW, 0, true);

            Self {
                prompt: config.prompt.clone(),
                font,
                offset: Vec2::new(0.0, config.prompt_offset),
                update,
            }
        })
    }

    fn wait_for_key(&mut self, cx: &mut TaskContext<'_, Stage>) {
        if !cx.env().any_key_clicked {
            return;
        }

        cx.destroy_self();
        let update = self.update;
        cx.set_active(update, false);
        cx.env_mut().raise(TitleEvent::Started);
    }

    fn draw(&mut self, cx: &mut TaskContext<'_, Stage>) {
        let stage = cx.env_mut();
        let at = stage.center + self.offset;
        stage.canvas.draw_text_at(&self.font, &self.prompt, at, 1.0);
    }
}
