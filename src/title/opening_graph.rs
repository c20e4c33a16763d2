//=== Opening Graph =======================================================
//
// Studio logo at the window centre, same fade shape as the legal line.

use log::warn;

use super::stage::{fade_alpha, switch_to, Stage, TitleWorld};
use super::{TitleConfig, TitleEvent};
use crate::core::render::{Canvas, Texture};
use crate::task::{CallId, Task, TaskContext, TaskId, DRAW};

pub struct OpeningGraph {
    texture: Texture,
    frames: u32,
    t: u32,
    alpha: f32,
    update: CallId,
}

impl Task for OpeningGraph {}

impl OpeningGraph {
    pub(super) fn spawn(world: &mut TitleWorld, config: &TitleConfig) -> TaskId {
        let texture = world.stage.assets.texture(&config.logo_path);

        world.tasks.create(|cx| {
            if let Err(e) = cx.register_get() {
                warn!("OpeningGraph lookup unavailable: {}", e);
            }
            let update = cx.bind(Self::fade_in);
            cx.bind_with(Self::draw, DRAW, 0, true);

            Self {
                texture,
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

        if t >= self.frames {
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
            cx.env_mut().raise(TitleEvent::CreateTitleGraph);
        } else {
            self.t = t - 1;
        }
    }

    fn draw(&mut self, cx: &mut TaskContext<'_, Stage>) {
        let stage = cx.env_mut();
        let center = stage.center;
        stage.canvas.draw_texture_at(&self.texture, center, self.alpha);
    }
}
