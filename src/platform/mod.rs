//=========================================================================
// Platform Subsystem
//
// Owns the winit window on the main thread and forwards input to the tick
// thread through the bounded crossbeam channel.
//
// Architecture:
// ```text
//  Main Thread:                     Tick Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  winit event loop        │    │  EventCollector  │
//  │   ↓                      │    │   ↓              │
//  │  InputProcessor          │    │  StateTracker    │
//  │   ↓ Lane                 │    │   ↓              │
//  │  InputBuffer             │    │  Scenes / Tasks  │
//  │   ↓ RedrawRequested      │    └──────────────────┘
//  │  channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// RedrawRequested is the flush point. Empty buffers are not sent. A
// disconnected channel is logged and the window stays closable.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::globals::WindowInfo;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and input forwarder. Must stay on the main thread.
pub(crate) struct Platform {
    window: Option<Window>,
    window_info: WindowInfo,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, window_info: WindowInfo) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_info,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    /// Runs the winit event loop until the window closes.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    fn window_attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.window_info.title.clone())
            .with_inner_size(LogicalSize::new(self.window_info.width, self.window_info.height))
            .with_resizable(false)
    }

    /// Sends buffered input to the tick thread.
    fn flush_input_buffer(&mut self) {
        let buffered = self.buffer.len();
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        trace!(target: "platform::input", "Flushing {} input event(s)", buffered);

        let event = PlatformEvent::Inputs { discrete, continuous };
        let count = event.input_count();

        if self.event_sender.send(event).is_err() {
            warn!(target: "platform::input", "Channel disconnected, dropping {} event(s)", count);
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }
}

//=== winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists");
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }
            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            other => {
                if let Some(lane) = self.input_processor.translate(&other) {
                    self.buffer.push(lane);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
