//=========================================================================
// Platform Bridge
//=========================================================================
//
// The only contact point between the window thread and the tick thread.
//
// Components:
// - `interface`: messages and errors crossing the channel
// - `event_collector`: tick-side draining of those messages
//
//=========================================================================

//=== Module Declarations =================================================

mod event_collector;
mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::{PlatformError, PlatformEvent};
