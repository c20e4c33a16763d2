//=========================================================================
// Title Sequence
//=========================================================================
//
// Opening credits and title screen, built from four tasks that hand over
// to each other through events.
//
// Flow:
// ```text
//   CreateOpeningText  → OpeningText   fade in / fade out
//   CreateOpeningGraph → OpeningGraph  fade in / fade out
//   CreateTitleGraph   → TitleGraph    appear → rise → rest
//   CreateTitleText    → TitleText     wait for any key
//   Started
// ```
//
// Tasks raise events into the stage outbox while they run. TitleScene
// delivers them to the CreateObject observer after the dispatch pass.
//
//=========================================================================

//=== Module Declarations =================================================

mod config;
mod create_object;
mod event;
mod opening_graph;
mod opening_text;
mod scene;
mod stage;
mod title_graph;
mod title_text;

//=== Public API ==========================================================

pub use config::{TitleConfig, TitleConfigBuilder};
pub use create_object::CreateObject;
pub use event::TitleEvent;
pub use opening_graph::OpeningGraph;
pub use opening_text::OpeningText;
pub use scene::TitleScene;
pub use stage::{Stage, TitleWorld};
pub use title_graph::{GraphPhase, TitleGraph};
pub use title_text::TitleText;
