//! Fixed camera presets and the orthographic projection.
//!
//! The demo uses four canned viewpoints, all looking at the world origin
//! from a distance of [`VP_DISTANCE`], selected by the number keys. The
//! projection is orthographic and sized so the whole board fits regardless
//! of aspect ratio.

use glam::{Mat4, Vec3};

/// Distance from the origin to every preset eye position, and the half
/// extent of the orthographic view volume.
pub const VP_DISTANCE: f32 = 12.0;

/// One of the four fixed viewpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPreset {
    /// Eye at `(d, d, d)`, the default three-quarter view.
    Isometric,
    /// Eye straight above the board.
    TopDown,
    /// Eye on the +X axis.
    Side,
    /// Eye on the +Z axis.
    Front,
}

impl CameraPreset {
    /// Eye position for this preset.
    pub fn eye(self) -> Vec3 {
        match self {
            CameraPreset::Isometric => Vec3::splat(VP_DISTANCE),
            CameraPreset::TopDown => Vec3::new(0.0, VP_DISTANCE, 0.0),
            CameraPreset::Side => Vec3::new(VP_DISTANCE, 0.0, 0.0),
            CameraPreset::Front => Vec3::new(0.0, 0.0, VP_DISTANCE),
        }
    }

    /// Up vector for this preset.
    ///
    /// Top-down looks along -Y, so its up vector lies in the board plane.
    pub fn up(self) -> Vec3 {
        match self {
            CameraPreset::TopDown => Vec3::X,
            _ => Vec3::Y,
        }
    }

    /// View matrix: a right-handed look-at toward the origin.
    pub fn view_matrix(self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, self.up())
    }
}

/// Orthographic projection covering the whole scene.
///
/// Spans `[-d*aspect, d*aspect]` horizontally and `[-d, d]` vertically with
/// a deep `[-3d, 3d]` clip range, so no part of the board or tank is ever
/// clipped from any preset. Uses 0..1 depth for wgpu.
pub fn projection_matrix(aspect: f32) -> Mat4 {
    let d = VP_DISTANCE;
    Mat4::orthographic_rh(-d * aspect, d * aspect, -d, d, -3.0 * d, 3.0 * d)
}
