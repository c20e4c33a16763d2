//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages that cross from the window thread to the tick thread, and the
// errors the window thread can fail with.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::error::EventLoopError;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// One message from the window thread.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Input gathered between two redraws.
    ///
    /// `discrete` holds key and button edges in arrival order. `continuous`
    /// holds at most the last cursor position.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// The user (or the OS) closed the window.
    WindowClosed,
}

impl PlatformEvent {
    /// Number of input events carried, zero for control messages.
    pub(crate) fn input_count(&self) -> usize {
        match self {
            Self::Inputs { discrete, continuous } => discrete.len() + continuous.len(),
            Self::WindowClosed => 0,
        }
    }
}

//=== PlatformError =======================================================

#[derive(Debug)]
pub(crate) enum PlatformError {
    /// The OS refused to give us an event loop.
    EventLoopCreation(EventLoopError),

    /// The event loop stopped with an error.
    EventLoopExecution(EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
