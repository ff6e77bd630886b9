//! Session builder and window runner

use std::sync::Arc;
use std::time::Instant;

use glam::DVec3;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::gpu::GpuRenderer;
use crate::input::InputEvent;
use crate::lorenz::LorenzParams;
use crate::session::{Control, Mode, Renderer, Session};
use crate::time::FramePacer;

/// A Lorenz viewer session builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```no_run
/// use lorenz_viewer::{DVec3, Mode, Simulation};
///
/// Simulation::new(DVec3::new(0.0, 1.0, 1.05), Mode::Interactive)
///     .run()
///     .unwrap();
/// ```
pub struct Simulation {
    seed: DVec3,
    mode: Mode,
    params: LorenzParams,
    config: SessionConfig,
}

impl Simulation {
    /// Create a session with the standard Lorenz constants and default config.
    pub fn new(seed: DVec3, mode: Mode) -> Self {
        Self {
            seed,
            mode,
            params: LorenzParams::default(),
            config: SessionConfig::default(),
        }
    }

    /// Override the Lorenz constants and time step.
    pub fn with_params(mut self, params: LorenzParams) -> Self {
        self.params = params;
        self
    }

    /// Override the window, camera and pacing settings.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the session. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SessionError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        log::info!("Starting {:?} session at {}", self.mode, self.seed);

        let session = Session::new(self.seed, self.mode, self.params, self.config);
        let mut app: App = App::new(session);
        event_loop.run_app(&mut app)?;

        log::info!("Session ended after {} frames", app.pacer.frame());
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Owns the window and renderer for one session and paces its frames.
///
/// Frames run on `RedrawRequested`, which `about_to_wait` requests once the
/// pacer says one is due.
struct App<R = GpuRenderer> {
    session: Session,
    window: Option<Arc<Window>>,
    renderer: Option<R>,
    /// Events gathered since the last frame.
    pending: Vec<InputEvent>,
    pacer: FramePacer,
    error: Option<SessionError>,
}

impl<R: Renderer> App<R> {
    fn new(session: Session) -> Self {
        let pacer = FramePacer::new(session.config().frame_interval, Instant::now());
        Self {
            session,
            window: None,
            renderer: None,
            pending: Vec::new(),
            pacer,
            error: None,
        }
    }

    /// Drop the renderer, then the window it draws into. Safe to call twice.
    fn release(&mut self) {
        if self.renderer.take().is_some() {
            log::info!("Released GPU resources");
        }
        self.window = None;
    }

    fn fail(&mut self, error: SessionError) {
        log::error!("{}", error);
        self.error = Some(error);
        self.release();
    }

    /// Run one session frame with the buffered events.
    ///
    /// Returns `false` once the loop should stop, with resources already
    /// released.
    fn frame(&mut self, now: Instant) -> bool {
        let Some(renderer) = self.renderer.as_mut() else {
            return false;
        };

        match self.session.run_frame(self.pending.drain(..), renderer) {
            Ok(Control::Continue) => {
                if self.pacer.finish_frame(now) {
                    log::debug!(
                        "{:.1} fps, {} points",
                        self.pacer.fps(),
                        self.session.lorenz().len()
                    );
                }
                true
            }
            Ok(Control::Exit) => {
                log::info!("Quit requested");
                self.release();
                false
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Handle a redraw. The platform may send redraws of its own, so only
    /// one that arrives once the pacer is due runs a frame.
    fn redraw(&mut self, now: Instant) -> bool {
        if !self.pacer.is_due(now) {
            return self.renderer.is_some();
        }
        self.frame(now)
    }
}

impl App<GpuRenderer> {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SessionError> {
        let config = self.session.config();
        let (width, height) = config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let renderer = pollster::block_on(GpuRenderer::new(window.clone(), config))?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for App<GpuRenderer> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() && !self.session.is_finished() {
            if let Err(e) = self.init(event_loop) {
                self.fail(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.redraw(Instant::now()) {
                    event_loop.exit();
                }
            }
            other => {
                if let Some(input) = InputEvent::from_window_event(&other) {
                    self.pending.push(input);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        if self.pacer.is_due(Instant::now()) {
            window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.next_frame()));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::{Mat4, Vec3};

    use super::*;
    use crate::error::RenderError;
    use crate::input::MouseButton;

    /// Counts draws and how many times it has been dropped.
    struct DropCounter {
        draws: Rc<Cell<usize>>,
        drops: Rc<Cell<usize>>,
    }

    impl Renderer for DropCounter {
        fn draw(&mut self, _points: &[DVec3], _colors: &[Vec3], _view: Mat4) -> Result<(), RenderError> {
            self.draws.set(self.draws.get() + 1);
            Ok(())
        }
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn app_with_counter() -> (App<DropCounter>, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let session = Session::new(
            DVec3::new(0.0, 1.0, 1.05),
            Mode::Interactive,
            LorenzParams::default(),
            SessionConfig::default(),
        );
        let draws = Rc::new(Cell::new(0));
        let drops = Rc::new(Cell::new(0));

        let mut app = App::new(session);
        app.renderer = Some(DropCounter {
            draws: draws.clone(),
            drops: drops.clone(),
        });
        (app, draws, drops)
    }

    #[test]
    fn test_quit_releases_renderer_once() {
        let (mut app, draws, drops) = app_with_counter();
        let now = Instant::now();

        assert!(app.frame(now));
        assert_eq!(draws.get(), 1);

        app.pending.push(InputEvent::ButtonPressed(MouseButton::Left));
        app.pending.push(InputEvent::Quit);
        assert!(!app.frame(now));

        assert!(app.renderer.is_none());
        assert!(app.pending.is_empty());
        assert_eq!(drops.get(), 1);
        assert_eq!(draws.get(), 1);

        // What `exiting` does after the loop stops.
        app.release();
        app.release();
        assert_eq!(drops.get(), 1);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_early_redraw_does_not_step() {
        let (mut app, draws, _drops) = app_with_counter();
        let start = Instant::now();
        let interval = app.session.config().frame_interval;

        assert!(app.redraw(start));
        assert_eq!(draws.get(), 1);

        // Before the deadline: nothing happens, the loop keeps going.
        assert!(app.redraw(start + interval / 2));
        assert_eq!(draws.get(), 1);
        assert_eq!(app.session.lorenz().len(), 2);

        assert!(app.redraw(start + interval));
        assert_eq!(draws.get(), 2);
        assert_eq!(app.session.lorenz().len(), 3);
    }

    #[test]
    fn test_frame_without_renderer_stops() {
        let (mut app, _draws, drops) = app_with_counter();
        app.release();

        assert!(!app.frame(Instant::now()));
        assert_eq!(drops.get(), 1);
        assert_eq!(app.session.lorenz().len(), 1);
    }

    #[test]
    fn test_failed_frame_releases_and_keeps_error() {
        let session = Session::new(
            DVec3::ONE,
            Mode::Interactive,
            LorenzParams::new(f64::INFINITY, 28.0, 8.0 / 3.0, 0.01),
            SessionConfig::default(),
        );
        let drops = Rc::new(Cell::new(0));
        let mut app = App::new(session);
        app.renderer = Some(DropCounter {
            draws: Rc::new(Cell::new(0)),
            drops: drops.clone(),
        });

        let now = Instant::now();
        let mut frames = 0;
        while app.frame(now) {
            frames += 1;
            assert!(frames < 100, "degenerate run never failed");
        }

        assert!(matches!(app.error, Some(SessionError::Integration(_))));
        assert_eq!(drops.get(), 1);
        app.release();
        assert_eq!(drops.get(), 1);
    }
}
