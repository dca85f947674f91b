use std::time::Instant;

use glam::Vec3;

/// Launch parameters for the sphere: start a little above the baseline,
/// moving up and to the right, decelerating vertically.
pub const SPHERE_LAUNCH: KinematicMotion = KinematicMotion {
    initial_position: Vec3::new(0.0, 0.5, 0.0),
    initial_velocity: Vec3::new(0.8, 0.8, 0.0),
    acceleration: Vec3::new(0.0, -0.4, 0.0),
};

/// Constant-acceleration motion evaluated in closed form.
#[derive(Debug, Clone, Copy)]
pub struct KinematicMotion {
    pub initial_position: Vec3,
    pub initial_velocity: Vec3,
    pub acceleration: Vec3,
}

impl KinematicMotion {
    /// Displacement after `t` seconds: `p0 + t*v0 + 0.5*t^2*a`.
    pub fn displacement(&self, t: f32) -> Vec3 {
        self.initial_position + t * self.initial_velocity + 0.5 * t * t * self.acceleration
    }

    /// The displacement to publish for this tick, or `None` while the
    /// vertical component is non-positive. The guard is re-evaluated on
    /// every tick; nothing is latched.
    pub fn publishable_displacement(&self, t: f32) -> Option<Vec3> {
        let delta = self.displacement(t);
        (delta.y > 0.0).then_some(delta)
    }
}

/// Ties a [`KinematicMotion`] to wall-clock time. The start timestamp is
/// captured exactly once, when the clock is created.
#[derive(Debug, Clone, Copy)]
pub struct MotionClock {
    motion: KinematicMotion,
    started: Instant,
}

impl MotionClock {
    pub fn start(motion: KinematicMotion) -> Self {
        Self {
            motion,
            started: Instant::now(),
        }
    }

    /// Samples the motion at the current elapsed time.
    pub fn sample(&self) -> Option<Vec3> {
        self.motion
            .publishable_displacement(self.started.elapsed().as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn displacement_at_zero_is_the_initial_position() {
        assert_eq!(
            SPHERE_LAUNCH.displacement(0.0),
            SPHERE_LAUNCH.initial_position
        );
    }

    #[test]
    fn displacement_matches_the_closed_form() {
        // y(t) = 0.5 + 0.8 t - 0.2 t^2
        let d = SPHERE_LAUNCH.displacement(1.0);
        assert!((d.x - 0.8).abs() < TOLERANCE);
        assert!((d.y - 1.1).abs() < TOLERANCE);
        assert_eq!(d.z, 0.0);

        let d = SPHERE_LAUNCH.displacement(2.0);
        assert!((d.x - 1.6).abs() < TOLERANCE);
        assert!((d.y - 1.3).abs() < TOLERANCE);
    }

    #[test]
    fn publish_guard_suppresses_non_positive_height() {
        // The vertical component crosses zero near t = 4.55; at t = 5 it is -0.5.
        assert!(SPHERE_LAUNCH.publishable_displacement(1.0).is_some());
        assert!(SPHERE_LAUNCH.displacement(5.0).y < 0.0);
        assert!(SPHERE_LAUNCH.publishable_displacement(5.0).is_none());
    }

    #[test]
    fn publish_guard_is_per_tick_not_latched() {
        let motion = SPHERE_LAUNCH;
        assert!(motion.publishable_displacement(5.0).is_none());
        assert!(motion.publishable_displacement(1.0).is_some());
    }

    #[test]
    fn clock_samples_from_its_own_start() {
        let clock = MotionClock::start(SPHERE_LAUNCH);
        // The sphere starts at y = 0.5 and rises for the first few seconds,
        // so an immediate sample must publish.
        let delta = clock.sample().expect("sphere starts above the baseline");
        assert!(delta.y >= 0.5 - TOLERANCE);
    }
}
