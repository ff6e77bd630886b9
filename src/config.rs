//! Fixed session configuration.
//!
//! Window size, projection, camera placement, rotation speeds, pacing and the
//! viewer's dump path. Nothing here changes once a session starts.
//!
//! ```
//! use lorenz_viewer::SessionConfig;
//! use std::time::Duration;
//!
//! let config = SessionConfig::default()
//!     .with_window_size(1280, 720)
//!     .with_frame_interval(Duration::from_millis(16));
//! assert_eq!(config.window_size, (1280, 720));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub window_size: (u32, u32),
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera translation.
    pub camera_translation: Vec3,
    /// Degrees of rotation per pixel of drag.
    pub rotation_speed: f32,
    /// Degrees the viewer turns the scene every frame.
    pub auto_rotation_angle: f32,
    pub auto_rotation_axis: Vec3,
    /// Diameter of a rendered point in physical pixels.
    pub point_size: f32,
    /// Pause between the end of one frame and the start of the next.
    pub frame_interval: Duration,
    /// File the viewer rewrites with the full trajectory every frame.
    pub export_path: PathBuf,
    pub background: [f64; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            title: "Lorenz Attractor".to_string(),
            window_size: (1920, 1080),
            fov_y: 45.0,
            near: 0.1,
            far: 1000.0,
            camera_translation: Vec3::new(1.0, 1.0, -100.0),
            rotation_speed: 0.2,
            auto_rotation_angle: 1.0,
            auto_rotation_axis: Vec3::new(2.0, 3.0, 1.0),
            point_size: 2.0,
            frame_interval: Duration::from_millis(20),
            export_path: PathBuf::from("lorenz_points.txt"),
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl SessionConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Set the perspective projection.
    pub fn with_perspective(mut self, fov_y: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y;
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_camera_translation(mut self, translation: Vec3) -> Self {
        self.camera_translation = translation;
        self
    }

    pub fn with_rotation_speed(mut self, degrees_per_pixel: f32) -> Self {
        self.rotation_speed = degrees_per_pixel;
        self
    }

    /// Set the per-frame rotation used in viewer mode.
    pub fn with_auto_rotation(mut self, degrees: f32, axis: Vec3) -> Self {
        self.auto_rotation_angle = degrees;
        self.auto_rotation_axis = axis;
        self
    }

    pub fn with_point_size(mut self, pixels: f32) -> Self {
        self.point_size = pixels;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    pub fn with_background(mut self, rgb: [f64; 3]) -> Self {
        self.background = rgb;
        self
    }
}
