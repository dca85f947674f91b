use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Combined model-view-projection matrix; rewritten on window resize.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformUniform {
    pub mvp: Mat4,
}

/// Kinematic displacement, published on each animation tick. Only `xyz` is
/// meaningful; the fourth lane pads the struct to uniform alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DisplacementUniform {
    pub delta: Vec4,
}

impl DisplacementUniform {
    pub fn new(delta: Vec3) -> Self {
        Self {
            delta: delta.extend(0.0),
        }
    }
}

/// Constant object color, written once at startup.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ColorUniform {
    pub color: Vec4,
}

/// Fixed-function lighting block: written once, immutable for the process
/// lifetime. Field order matches the uniform block in the fragment shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightParameters {
    pub diffuse_intensity: Vec4,
    pub ambient_intensity: Vec4,
    pub light_direction: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_the_wgsl_declarations() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
        assert_eq!(std::mem::size_of::<DisplacementUniform>(), 16);
        assert_eq!(std::mem::size_of::<ColorUniform>(), 16);
        assert_eq!(std::mem::size_of::<LightParameters>(), 48);
    }

    #[test]
    fn displacement_pads_to_a_full_lane() {
        let uniform = DisplacementUniform::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(uniform.delta, Vec4::new(1.0, 2.0, 3.0, 0.0));
    }

    #[test]
    fn light_parameters_lay_out_in_field_order() {
        let params = LightParameters {
            diffuse_intensity: Vec4::new(0.4, 0.4, 0.4, 1.0),
            ambient_intensity: Vec4::new(0.3, 0.3, 0.3, 1.0),
            light_direction: Vec4::new(0.0, -1.0, 0.5, 1.0),
        };
        let bytes = bytemuck::bytes_of(&params);
        assert_eq!(&bytes[0..16], bytemuck::bytes_of(&params.diffuse_intensity));
        assert_eq!(
            &bytes[16..32],
            bytemuck::bytes_of(&params.ambient_intensity)
        );
        assert_eq!(&bytes[32..48], bytemuck::bytes_of(&params.light_direction));
    }
}
