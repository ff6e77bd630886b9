//! Error types for the Lorenz viewer.
//!
//! This module provides error types for startup input, trajectory export and
//! import, integration, GPU initialization, rendering, and the session loop.

use std::fmt;
use std::io;
use std::path::PathBuf;

use glam::DVec3;

/// Errors that can occur while reading the startup prompt.
#[derive(Debug)]
pub enum PromptError {
    /// Reading from or writing to the terminal failed.
    Io(io::Error),
    /// Input ended before every answer was given.
    UnexpectedEof,
    /// A seed coordinate was not a number.
    InvalidNumber {
        axis: char,
        input: String,
        source: std::num::ParseFloatError,
    },
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Io(e) => write!(f, "Failed to read input: {}", e),
            PromptError::UnexpectedEof => write!(f, "Input ended before the prompt was answered"),
            PromptError::InvalidNumber { axis, input, .. } => {
                write!(f, "Invalid {} value {:?}: expected a real number", axis, input)
            }
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Io(e) => Some(e),
            PromptError::InvalidNumber { source, .. } => Some(source),
            PromptError::UnexpectedEof => None,
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::Io(e)
    }
}

/// Failure to write a trajectory dump.
#[derive(Debug)]
pub struct ExportError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to export points to {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Errors that can occur when reading a trajectory dump back.
#[derive(Debug)]
pub enum ImportError {
    /// Failed to read from the source.
    Io(io::Error),
    /// A tabular dump was malformed, for example a row with the wrong number
    /// of fields.
    Csv(csv::Error),
    /// A tabular dump did not start with the `x,y,z` header.
    MissingHeader,
    /// A row did not hold three real numbers.
    Parse { line: usize, content: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "Failed to read points: {}", e),
            ImportError::Csv(e) => write!(f, "Malformed CSV: {}", e),
            ImportError::MissingHeader => write!(f, "Missing `x,y,z` header"),
            ImportError::Parse { line, content } => {
                write!(f, "Line {}: expected three numbers, got {:?}", line, content)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(e) => Some(e),
            ImportError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ImportError {
    fn from(e: io::Error) -> Self {
        ImportError::Io(e)
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Csv(e)
    }
}

/// Errors raised by the integrator's guarded step.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// The next point overflowed or became NaN. `step` is the index it would
    /// have had in the trajectory.
    Degenerate { step: usize, point: DVec3 },
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationError::Degenerate { step, point } => {
                write!(f, "Degenerate state at step {}: {}", step, point)
            }
        }
    }
}

impl std::error::Error for IntegrationError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter(e) => write!(f, "No compatible GPU adapter found: {}", e),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::NoAdapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors reported by a renderer for a single frame.
#[derive(Debug)]
pub enum RenderError {
    /// The surface could not provide a frame and cannot be recovered.
    Surface(wgpu::SurfaceError),
    /// Any other renderer failure.
    Other(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Surface(e) => write!(f, "Surface error: {}", e),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Surface(e) => Some(e),
            RenderError::Other(_) => None,
        }
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

/// Errors that can occur when running a session.
#[derive(Debug)]
pub enum SessionError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// A frame could not be drawn.
    Render(RenderError),
    /// The viewer's per-frame dump could not be written.
    Export(ExportError),
    /// The trajectory degenerated.
    Integration(IntegrationError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SessionError::Window(e) => write!(f, "Failed to create window: {}", e),
            SessionError::Gpu(e) => write!(f, "GPU error: {}", e),
            SessionError::Render(e) => write!(f, "{}", e),
            SessionError::Export(e) => write!(f, "{}", e),
            SessionError::Integration(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::EventLoop(e) => Some(e),
            SessionError::Window(e) => Some(e),
            SessionError::Gpu(e) => Some(e),
            SessionError::Render(e) => Some(e),
            SessionError::Export(e) => Some(e),
            SessionError::Integration(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for SessionError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SessionError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SessionError {
    fn from(e: winit::error::OsError) -> Self {
        SessionError::Window(e)
    }
}

impl From<GpuError> for SessionError {
    fn from(e: GpuError) -> Self {
        SessionError::Gpu(e)
    }
}

impl From<RenderError> for SessionError {
    fn from(e: RenderError) -> Self {
        SessionError::Render(e)
    }
}

impl From<ExportError> for SessionError {
    fn from(e: ExportError) -> Self {
        SessionError::Export(e)
    }
}

impl From<IntegrationError> for SessionError {
    fn from(e: IntegrationError) -> Self {
        SessionError::Integration(e)
    }
}
