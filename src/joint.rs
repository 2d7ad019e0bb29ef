//! Joint model - 31-bone motion-capture skeleton
//!
//! Joint positions arrive as world-space points per frame. Every bone is
//! reduced to its distance from the root bone, so only the point type and
//! the bone catalogue live here.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use core::ops::Sub;

/// Number of tracked bones in a recording
pub const BONE_COUNT: usize = 31;

/// Index of the root bone (reference for all distances)
pub const ROOT_BONE: usize = 0;

/// 3D point for joint positions (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3k {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3k {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        sqrt(self.length_sq())
    }

    /// Euclidean distance between two joint positions
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl Sub for Vec3k {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

/// Correctly rounded square root, `libm` when built without `std`
#[cfg(feature = "std")]
pub(crate) fn sqrt(x: f32) -> f32 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
pub(crate) fn sqrt(x: f32) -> f32 {
    libm::sqrtf(x)
}

const BONE_NAMES: [&str; BONE_COUNT] = [
    "Root",
    "Left Hip Joint",
    "Left Femur",
    "Upper Back",
    "Thorax",
    "Left Hand",
    "Left Fingers",
    "Left Thumb",
    "Left Tibia",
    "Left Foot",
    "Left Toes",
    "Right Hip Joint",
    "Right Femur",
    "Right Tibia",
    "Lower Neck",
    "Upper Neck",
    "Head",
    "Left Clavicle",
    "Left Humerus",
    "Right Foot",
    "Right Toes",
    "Lower Back",
    "Left Radius",
    "Left Wrist",
    "Right Clavicle",
    "Right Humerus",
    "Right Radius",
    "Right Wrist",
    "Right Hand",
    "Right Fingers",
    "Right Thumb",
];

/// Display name for a bone index ("Not Found" when out of range)
pub fn bone_name(bone: usize) -> &'static str {
    BONE_NAMES.get(bone).copied().unwrap_or("Not Found")
}
