//! Point shader source and the GPU-side data layouts it reads.

use bytemuck::{Pod, Zeroable};

/// WGSL for the instanced point pipeline (`vs_main`, `fs_main`).
pub const POINT_SHADER: &str = include_str!("points.wgsl");

/// Per-instance vertex data: one per trajectory point.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Per-frame uniforms. `viewport` is in physical pixels and `point_size` is
/// the disc diameter in the same unit.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub _padding: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_point_shader_validates() {
        validate_wgsl(POINT_SHADER).unwrap();
    }

    #[test]
    fn test_point_shader_entry_points() {
        let module = naga::front::wgsl::parse_str(POINT_SHADER).unwrap();
        let names: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn test_layouts_match_shader() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 24);
        // mat4 + vec2 + f32 + f32, a multiple of 16.
        assert_eq!(std::mem::size_of::<Uniforms>(), 80);
    }
}
