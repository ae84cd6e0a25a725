//! Platform layer: window, event loop and frame pacing around the renderer.
//!
//! Design goals:
//! - Continuous redraws; the scene animates every frame.
//! - Proper handling of resize/close/surface loss.
//! - Startup failures surface as errors from [`run_with_renderer`], not panics.

pub mod keys;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use corelib::scene::Scene;
use renderer::{GpuState, ScenePaths};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::keys::HeldKeys;

pub const WINDOW_TITLE: &str = "Dither Light";

/// Everything the platform layer needs to start rendering.
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub paths: ScenePaths,
}

impl RunSettings {
    /// Requested window size; also the size the dither volume is generated at.
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }
}

struct App {
    settings: RunSettings,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Scene,
    keys: HeldKeys,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: RunSettings) -> Self {
        Self {
            settings,
            window: None,
            gpu: None,
            scene: Scene::default(),
            keys: HeldKeys::default(),
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(self.settings.size());
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to open window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.settings.backends,
            self.settings.size(),
            &self.settings.paths,
        ))?;

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.scene.update(dt, &self.keys.controls());

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(&self.scene) {
            Ok(()) => {}
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface lost/outdated; reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
            }
            Err(e) => log::warn!("Frame skipped: {e:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(false) => self.keys.clear(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                self.keys.set(code, state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

/// Open the window, build the scene and run until it is closed.
pub fn run_with_renderer(settings: RunSettings) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_size_comes_from_settings() {
        let settings = RunSettings {
            backends: wgpu::Backends::all(),
            width: 800,
            height: 600,
            paths: ScenePaths::in_dir("data"),
        };
        assert_eq!(settings.size(), PhysicalSize::new(800, 600));
    }
}
