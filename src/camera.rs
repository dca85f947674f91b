use glam::{Mat4, Vec3};

/// Fixed orthographic camera for the scene.
///
/// The model-view transform is set once at startup. The projection bounds are
/// constants, deliberately independent of the window size, so non-square
/// windows stretch the scene instead of refitting it.
#[derive(Debug, Clone, Copy)]
pub struct SceneCamera {
    modelview: Mat4,
}

impl SceneCamera {
    pub fn new() -> Self {
        Self {
            modelview: Mat4::from_translation(Vec3::new(-2.0, -2.0, -5.0)),
        }
    }

    /// The combined model-view-projection matrix. Recomputed on every resize,
    /// yielding the same matrix each time.
    pub fn view_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(-2.5, 2.5, -2.5, 2.5, 3.5, 20.0) * self.modelview
    }
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::new()
    }
}
