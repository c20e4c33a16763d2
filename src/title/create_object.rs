//=== CreateObject ========================================================
//
// Observer that turns creation events into title tasks.

use log::debug;

use super::opening_graph::OpeningGraph;
use super::opening_text::OpeningText;
use super::stage::TitleWorld;
use super::title_graph::TitleGraph;
use super::title_text::TitleText;
use super::{TitleConfig, TitleEvent};
use crate::core::observer::Observer;

pub struct CreateObject {
    config: TitleConfig,
}

impl CreateObject {
    pub fn new(config: TitleConfig) -> Self {
        Self { config }
    }
}

impl Observer<TitleEvent, TitleWorld> for CreateObject {
    fn on_notify(&mut self, event: &TitleEvent, world: &mut TitleWorld) {
        let id = match event {
            TitleEvent::CreateOpeningText => OpeningText::spawn(world, &self.config),
            TitleEvent::CreateOpeningGraph => OpeningGraph::spawn(world, &self.config),
            TitleEvent::CreateTitleGraph => TitleGraph::spawn(world, &self.config),
            TitleEvent::CreateTitleText => TitleText::spawn(world, &self.config),
            TitleEvent::Started => return,
        };
        debug!("{:?} created {}", event, id);
    }
}
