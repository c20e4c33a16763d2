//=== Opening Text ========================================================
//
// Legal line at the window centre. Fades in, fades out, then hands over
// to the logo.

use log::warn;

use super::stage::{fade_alpha, switch_to, Stage, TitleWorld};
use super::{TitleConfig, TitleEvent};
use crate::core::render::{Canvas, Font};
use crate::task::{CallId, Task, TaskContext, TaskId, DRAW};

pub struct OpeningText {
    text: String,
    font: Font,
    frames: u32,
    t: u32,
    alpha: f32,
    update: CallId,
}

impl Task for OpeningText {}

impl OpeningText {
    pub(super) fn spawn(world: &mut TitleWorld, config: &TitleConfig) -> TaskId {
        let font = world.stage.assets.font_or_fallback(&config.font);

        world.tasks.create(|cx| {
            if let Err(e) = cx.register_get() {
                warn!("OpeningText lookup unavailable: {}", e);
            }
            let update = cx.bind(Self::fade_in);
            cx.bind_with(Self::draw, DRAW, 0, true);

            Self {
                text: config.legal_text.clone(),
                font,
                frames: config.fade_frames,
                t: 0,
                alpha: 0.0,
                update,
            }
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    fn fade_in(&mut self, cx: &mut TaskContext<'_, Stage>) {
        let t = self.t;
        self.alpha = fade_alpha(t, self.frames);

        if t % self.frames + 1 >= self.frames {
            self.t = self.frames;
            switch_to(cx, self.update, Self::fade_out);
        } else {
            self.t = t + 1;
        }
    }

    fn fade_out(&mut self, cx: &mut TaskContext<'_, Stage>) {
        let t = self.t;
        self.alpha = fade_alpha(t, self.frames);

        if t == 0 {
            cx.destroy_self();
            let update = self.update;
            cx.set_active(update, false);
            cx.env_mut().raise(TitleEvent::CreateOpeningGraph);
        } else {
            self.t = t - 1;
        }
    }

    fn draw(&mut self, cx: &mut TaskContext<'_, Stage>) {
        let stage = cx.env_mut();
        let center = stage.center;
        stage.canvas.draw_text_at(&self.font, &self.text, center, self.alpha);
    }
}
