//! Math utilities and types
//!
//! Provides the fundamental math types for the placement engine: vector
//! and quaternion aliases over nalgebra, the rigid [`Pose`] used for shape
//! transforms, and right-angle rotation quantization.

pub use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// A rigid transform: position plus orientation, no scale.
///
/// Shapes are rigid bodies, so unlike a general scene transform there is
/// no scale component to keep consistent during snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in world space
    pub position: Vec3,

    /// Orientation as a unit quaternion
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Pose {
    /// Create a new identity pose at the origin
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a pose with only a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a pose with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Map a local offset into world space through this pose
    pub fn transform_offset(&self, offset: Vec3) -> Vec3 {
        self.position + self.rotation * offset
    }
}

/// Snap an angle in degrees to the nearest multiple of 90, wrapped to
/// `[0, 360)`.
///
/// 44 snaps down to 0, 46 up to 90, 134 down to 90, 136 up to 180.
pub fn snap_angle_degrees(degrees: f32) -> f32 {
    ((degrees / 90.0).round() * 90.0).rem_euclid(360.0)
}

/// Quantize an orientation to axis-aligned 90-degree multiples.
///
/// Each Euler component is rounded independently, matching the grid's
/// notion of a "straight" shape. The result is always one of the 24
/// axis-aligned cube orientations.
pub fn quantize_right_angles(rotation: &Quat) -> Quat {
    let (roll, pitch, yaw) = rotation.euler_angles();
    Quat::from_euler_angles(
        snap_angle_degrees(roll.to_degrees()).to_radians(),
        snap_angle_degrees(pitch.to_degrees()).to_radians(),
        snap_angle_degrees(yaw.to_degrees()).to_radians(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_snap_angle_rounding() {
        assert_relative_eq!(snap_angle_degrees(44.0), 0.0);
        assert_relative_eq!(snap_angle_degrees(46.0), 90.0);
        assert_relative_eq!(snap_angle_degrees(134.0), 90.0);
        assert_relative_eq!(snap_angle_degrees(136.0), 180.0);
    }

    #[test]
    fn test_snap_angle_wraps_at_360() {
        assert_relative_eq!(snap_angle_degrees(359.0), 0.0);
        assert_relative_eq!(snap_angle_degrees(271.0), 270.0);
        assert_relative_eq!(snap_angle_degrees(-44.0), 0.0);
        assert_relative_eq!(snap_angle_degrees(-91.0), 270.0);
    }

    #[test]
    fn test_quantize_identity_stays_identity() {
        let q = quantize_right_angles(&Quat::identity());
        assert_relative_eq!(q.angle(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_quantize_near_right_angle() {
        // 87 degrees about Y should land exactly on 90
        let nearly = Quat::from_euler_angles(0.0, 87.0_f32.to_radians(), 0.0);
        let snapped = quantize_right_angles(&nearly);
        let expected = Quat::from_euler_angles(0.0, 90.0_f32.to_radians(), 0.0);
        assert_relative_eq!(snapped.angle_to(&expected), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_quantized_rotation_maps_unit_offsets_onto_axes() {
        let snapped = quantize_right_angles(&Quat::from_euler_angles(
            0.02,
            91.0_f32.to_radians(),
            -0.01,
        ));
        let rotated = snapped * Vec3::new(1.0, 0.0, 0.0);
        // A unit offset under a right-angle rotation must land on a unit axis
        assert_relative_eq!(rotated.x.abs() + rotated.y.abs() + rotated.z.abs(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_pose_transform_offset() {
        let pose = Pose::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_euler_angles(0.0, 90.0_f32.to_radians(), 0.0),
        );
        let world = pose.transform_offset(Vec3::new(1.0, 0.0, 0.0));
        // +X rotated 90 degrees about Y points down -Z
        assert_relative_eq!(world.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(world.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(world.z, 2.0, epsilon = 1e-5);
    }
}
