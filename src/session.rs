//! The per-frame session protocol.
//!
//! A [`Session`] owns the integrator, the camera and the pointer state. The
//! window layer buffers [`InputEvent`]s as they arrive and hands them to
//! [`Session::run_frame`] once per frame, together with a [`Renderer`]. One
//! frame does, in order:
//!
//! 1. drain the buffered events, stopping on [`InputEvent::Quit`]
//! 2. camera handling: auto-rotation in [`Mode::Viewer`], drag rotation in
//!    [`Mode::Interactive`]
//! 3. exactly one integration step
//! 4. one draw of the whole trajectory
//! 5. in viewer mode, a full rewrite of the text dump
//!
//! Nothing here touches a window or a GPU, so the protocol runs headless in
//! tests.

use glam::{DVec2, DVec3, Mat4, Vec3};

use crate::camera::Camera;
use crate::config::SessionConfig;
use crate::error::{RenderError, SessionError};
use crate::export::ExportFormat;
use crate::input::{InputEvent, Pointer};
use crate::lorenz::{Lorenz, LorenzParams};

/// How the session drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Constant auto-rotation, and the trajectory is dumped to disk every frame.
    Viewer,
    /// Left-drag rotates the scene.
    Interactive,
}

impl Mode {
    /// Parse the startup answer: `v` or `i`, case-insensitive, surrounding
    /// whitespace ignored. Anything else is `None`.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim().to_lowercase().as_str() {
            "v" => Some(Mode::Viewer),
            "i" => Some(Mode::Interactive),
            _ => None,
        }
    }
}

/// Whether the loop should keep going after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// A quit was requested. The caller should release its resources.
    Exit,
}

/// Rendering collaborator.
///
/// `points` and `colors` have equal length. `view` is the camera transform;
/// the renderer supplies its own projection.
pub trait Renderer {
    /// Draw the whole trajectory once.
    fn draw(&mut self, points: &[DVec3], colors: &[Vec3], view: Mat4) -> Result<(), RenderError>;
}

/// One run of the viewer: integrator, camera and pointer state for a mode.
pub struct Session {
    mode: Mode,
    config: SessionConfig,
    lorenz: Lorenz,
    camera: Camera,
    pointer: Pointer,
    finished: bool,
}

impl Session {
    /// Start at `seed` with a camera at `config.camera_translation`.
    pub fn new(seed: DVec3, mode: Mode, params: LorenzParams, config: SessionConfig) -> Self {
        Self {
            mode,
            lorenz: Lorenz::with_params(seed, params),
            camera: Camera::new(config.camera_translation),
            pointer: Pointer::new(),
            config,
            finished: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn lorenz(&self) -> &Lorenz {
        &self.lorenz
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// `true` once a quit event has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one frame with the events gathered since the previous one.
    ///
    /// Returns [`Control::Exit`] when a quit event is among `events`, in which
    /// case nothing is stepped or drawn. Once finished, further calls do nothing.
    pub fn run_frame<R, I>(&mut self, events: I, renderer: &mut R) -> Result<Control, SessionError>
    where
        R: Renderer + ?Sized,
        I: IntoIterator<Item = InputEvent>,
    {
        if self.finished {
            return Ok(Control::Exit);
        }

        for event in events {
            if event == InputEvent::Quit {
                self.finished = true;
                return Ok(Control::Exit);
            }
            self.handle_event(&event);
        }

        if self.mode == Mode::Viewer {
            self.camera
                .rotate(self.config.auto_rotation_angle, self.config.auto_rotation_axis);
        }

        self.lorenz.try_step()?;

        renderer.draw(self.lorenz.points(), self.lorenz.colors(), self.camera.view_matrix())?;

        if self.mode == Mode::Viewer {
            self.lorenz.export(&self.config.export_path, ExportFormat::Text)?;
        }

        Ok(Control::Continue)
    }

    fn handle_event(&mut self, event: &InputEvent) {
        let delta = self.pointer.handle(event);
        if self.mode != Mode::Interactive {
            return;
        }
        if let Some(delta) = delta {
            self.apply_drag(delta);
        }
    }

    /// Horizontal motion turns about the vertical axis, vertical motion about
    /// the horizontal axis.
    fn apply_drag(&mut self, delta: DVec2) {
        let speed = self.config.rotation_speed;
        self.camera.rotate(delta.x as f32 * speed, Vec3::Y);
        self.camera.rotate(delta.y as f32 * speed, Vec3::X);
    }
}
