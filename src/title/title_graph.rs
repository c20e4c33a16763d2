//=== Title Graph =========================================================
//
// Title artwork. Appears at the window centre, rises to its resting
// height, then stays there at full opacity. Any key skips ahead one phase.

use log::{debug, warn};

use super::stage::{fade_alpha, switch_to, Stage, TitleWorld};
use super::{TitleConfig, TitleEvent};
use crate::core::render::{Canvas, Texture, Vec2};
use crate::task::{CallId, Task, TaskContext, TaskId, DRAW};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphPhase {
    Appear,
    Move,
    Stopping,
}

pub struct TitleGraph {
    texture: Texture,
    position: Vec2,
    rest_y: f32,
    rise: f32,
    frames: u32,
    t: u32,
    alpha: f32,
    phase: GraphPhase,
    update: CallId,
}

impl Task for TitleGraph {}

impl TitleGraph {
    pub(super) fn spawn(world: &mut TitleWorld, config: &TitleConfig) -> TaskId {
        let texture = world.stage.assets.texture(&config.title_path);
        let position = world.stage.center;

        world.tasks.create(|cx| {
            if let Err(e) = cx.register_get() {
                warn!("TitleGraph lookup unavailable: {}", e);
            }
            let update = cx.bind(Self::appear);
            cx.bind_with(Self::draw, DRAW, 0, true);

            Self {
                texture,
                position,
                rest_y: config.rest_y,
                rise: config.rise,
                frames: config.fade_frames,
                t: 0,
                alpha: 0.0,
                phase: GraphPhase::Appear,
                update,
            }
        })
    }

    pub fn phase(&self) -> GraphPhase {
        self.phase
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    fn appear(&mut self, cx: &mut TaskContext<'_, Stage>) {
        let t = self.t;
        self.alpha = fade_alpha(t, self.frames);
        self.t = t + 1;

        if cx.env().any_key_clicked || t % self.frames + 1 >= self.frames {
            self.phase = GraphPhase::Move;
            switch_to(cx, self.update, Self::move_up);
        }
    }

    fn move_up(&mut self, cx: &mut TaskContext<'_, Stage>) {
        self.alpha = 1.0;
        self.position.y -= self.rise;

        if self.position.y <= self.rest_y || cx.env().any_key_clicked {
            self.position.y = self.rest_y;
            self.phase = GraphPhase::Stopping;

            let update = self.update;
            cx.set_active(update, false);
            debug!("Title artwork settled at y={}", self.rest_y);
            cx.env_mut().raise(TitleEvent::CreateTitleText);
        }
    }

    fn draw(&mut self, cx: &mut TaskContext<'_, Stage>) {
        cx.env_mut()
            .canvas
            .draw_texture_at(&self.texture, self.position, self.alpha);
    }
}
