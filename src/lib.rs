//! # lorenz-viewer
//!
//! Forward-Euler integration of the Lorenz system, rendered as a growing,
//! rainbow-colored point cloud.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lorenz_viewer::prelude::*;
//!
//! fn main() -> Result<(), SessionError> {
//!     Simulation::new(DVec3::new(0.0, 1.0, 1.05), Mode::Viewer)
//!         .with_config(SessionConfig::default().with_window_size(1280, 720))
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Integrator
//!
//! [`Lorenz`] holds the trajectory. Each [`Lorenz::step`] appends one point
//!
//! ```text
//! x' = x + σ(y − x)Δt
//! y' = y + (x(ρ − z) − y)Δt
//! z' = z + (xy − βz)Δt
//! ```
//!
//! and one color whose hue cycles every 1000 points. The integrator has no
//! window or GPU dependencies and can be used on its own:
//!
//! ```
//! use lorenz_viewer::{DVec3, ExportFormat, Lorenz};
//!
//! let mut lorenz = Lorenz::new(DVec3::new(0.0, 1.0, 1.05));
//! lorenz.step_n(1000);
//!
//! let mut csv = Vec::new();
//! lorenz_viewer::export::write_points(&mut csv, lorenz.points(), ExportFormat::Csv).unwrap();
//! assert!(csv.starts_with(b"x,y,z\n"));
//! ```
//!
//! ### Sessions
//!
//! A [`Simulation`] opens a window and runs one [`Session`] frame roughly
//! every 20 ms: drain input, move the camera, step once, draw everything.
//!
//! | Mode | Camera | Side effect |
//! |------|--------|-------------|
//! | [`Mode::Viewer`] | constant auto-rotation | rewrites `lorenz_points.txt` every frame |
//! | [`Mode::Interactive`] | left-drag rotates | none |

pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
mod gpu;
pub mod input;
pub mod lorenz;
pub mod prompt;
pub mod session;
mod shader;
mod simulation;
pub mod time;

pub use config::SessionConfig;
pub use error::{
    ExportError, GpuError, ImportError, IntegrationError, PromptError, RenderError, SessionError,
};
pub use export::ExportFormat;
pub use glam::{DVec2, DVec3, Mat4, Vec3};
pub use gpu::GpuRenderer;
pub use lorenz::{Lorenz, LorenzParams, Trajectory};
pub use session::{Control, Mode, Renderer, Session};
pub use simulation::Simulation;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use lorenz_viewer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::error::SessionError;
    pub use crate::export::ExportFormat;
    pub use crate::lorenz::{Lorenz, LorenzParams};
    pub use crate::session::Mode;
    pub use crate::simulation::Simulation;
    pub use crate::{DVec3, Vec3};
}
