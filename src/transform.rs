//! The matrix stack at the heart of hierarchical scene traversal.
//!
//! A [`TransformStack`] maintains a single active model-view matrix plus a
//! save/restore stack of prior values. Scene nodes compose their local
//! placement onto the active matrix with the right-multiplying operations
//! ([`translate`](TransformStack::translate), [`rotate`](TransformStack::rotate),
//! [`scale`](TransformStack::scale)), and bracket their subtree with
//! [`push`](TransformStack::push) / [`pop`](TransformStack::pop) so the
//! caller's frame is intact when they return.
//!
//! # Discipline
//!
//! - At the start and end of a full scene traversal the save stack is empty.
//! - Every `push` during a frame is matched by exactly one `pop`.
//! - `pop` with nothing saved is a structural bug in the scene graph, not a
//!   runtime condition: it returns [`StackUnderflow`] so the frame can abort
//!   loudly instead of drawing garbage.
//!
//! # Example
//!
//! ```
//! use phalanx::{Axis, TransformStack};
//!
//! let mut stack = TransformStack::new();
//! let before = stack.current();
//!
//! stack.push();
//! stack.translate(1.0, 0.0, 0.0);
//! stack.rotate(Axis::Z, 90.0);
//! // ... draw something in the local frame ...
//! stack.pop().unwrap();
//!
//! assert_eq!(stack.current(), before);
//! ```

use glam::{Mat4, Vec3};

/// A rotation axis for [`TransformStack::rotate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// `pop()` was called with no matching `push()`.
///
/// This signals a broken save/restore pairing in the scene graph. It is a
/// programming-contract violation: callers should abort the current frame's
/// traversal rather than continue with an undefined transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackUnderflow;

impl std::fmt::Display for StackUnderflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transform stack underflow: pop() without a matching push()")
    }
}

impl std::error::Error for StackUnderflow {}

/// Accumulator for hierarchical model-view transforms.
///
/// Holds the active transform separately from the saved snapshots, so the
/// save stack itself is empty whenever traversal is balanced. The active
/// transform starts as the identity; a render loop typically installs the
/// camera view matrix once per frame with [`load`](Self::load) before
/// traversal begins.
#[derive(Clone, Debug)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Creates a stack with the identity as the active transform.
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Returns the active transform.
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Replaces the active transform.
    ///
    /// Used once per frame to install the camera view matrix before the
    /// scene is traversed. Does not touch the save stack.
    pub fn load(&mut self, transform: Mat4) {
        self.current = transform;
    }

    /// Saves a copy of the active transform.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the most recently saved transform and removes it.
    ///
    /// # Errors
    ///
    /// Returns [`StackUnderflow`] if nothing is saved. The caller should
    /// treat this as fatal for the frame.
    pub fn pop(&mut self) -> Result<(), StackUnderflow> {
        self.current = self.saved.pop().ok_or(StackUnderflow)?;
        Ok(())
    }

    /// Number of saved snapshots. Zero whenever traversal is balanced.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Right-multiplies the active transform by a translation.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.current *= Mat4::from_translation(Vec3::new(dx, dy, dz));
    }

    /// Right-multiplies the active transform by a rotation about `axis`.
    ///
    /// The angle is in degrees, matching the scene's authored constants.
    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        let radians = degrees.to_radians();
        let rotation = match axis {
            Axis::X => Mat4::from_rotation_x(radians),
            Axis::Y => Mat4::from_rotation_y(radians),
            Axis::Z => Mat4::from_rotation_z(radians),
        };
        self.current *= rotation;
    }

    /// Right-multiplies the active transform by a non-uniform scale.
    ///
    /// There is no automatic normalization: a scale set by a parent shapes
    /// every descendant draw, which is how compound parts (like the board's
    /// cells) are given their dimensions with one call. Zero factors are
    /// permitted; only forward transforms are ever computed from the stack.
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        self.current *= Mat4::from_scale(Vec3::new(sx, sy, sz));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_restores_exactly_what_push_saved() {
        let mut stack = TransformStack::new();
        stack.translate(3.0, -1.0, 0.5);
        stack.rotate(Axis::Y, 37.0);
        let before = stack.current();

        stack.push();
        stack.scale(2.0, 0.5, 1.0);
        stack.rotate(Axis::X, 90.0);
        stack.translate(0.0, 4.0, 0.0);
        assert_ne!(stack.current(), before);

        stack.pop().unwrap();
        // push stores a copy, so restoration is bitwise exact
        assert_eq!(stack.current(), before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn nested_brackets_unwind_in_order() {
        let mut stack = TransformStack::new();
        let root = stack.current();

        stack.push();
        stack.translate(1.0, 0.0, 0.0);
        let child = stack.current();

        stack.push();
        stack.rotate(Axis::Z, 45.0);
        assert_eq!(stack.depth(), 2);

        stack.pop().unwrap();
        assert_eq!(stack.current(), child);
        stack.pop().unwrap();
        assert_eq!(stack.current(), root);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn pop_on_empty_stack_is_an_error() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.pop(), Err(StackUnderflow));

        stack.push();
        assert!(stack.pop().is_ok());
        assert_eq!(stack.pop(), Err(StackUnderflow));
    }

    #[test]
    fn composition_order_is_right_multiplication() {
        // translate-then-rotate must differ from rotate-then-translate
        let mut a = TransformStack::new();
        a.translate(1.0, 0.0, 0.0);
        a.rotate(Axis::Z, 90.0);

        let mut b = TransformStack::new();
        b.rotate(Axis::Z, 90.0);
        b.translate(1.0, 0.0, 0.0);

        assert_ne!(a.current(), b.current());

        // translate-then-rotate keeps the origin of the local frame at (1,0,0)
        let origin = a.current().transform_point3(glam::Vec3::ZERO);
        assert!((origin - glam::Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);

        // rotate-then-translate carries the translation through the rotation
        let origin = b.current().transform_point3(glam::Vec3::ZERO);
        assert!((origin - glam::Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn rotate_uses_degrees() {
        let mut stack = TransformStack::new();
        stack.rotate(Axis::X, 360.0);
        assert!(stack.current().abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn degenerate_scale_is_permitted() {
        let mut stack = TransformStack::new();
        stack.scale(1.0, 0.0, 1.0);
        assert_eq!(stack.current().determinant(), 0.0);
        // still usable for forward transforms
        let p = stack.current().transform_point3(Vec3::new(2.0, 5.0, -1.0));
        assert_eq!(p, Vec3::new(2.0, 0.0, -1.0));
    }

    #[test]
    fn load_installs_a_view_matrix_without_touching_saves() {
        let mut stack = TransformStack::new();
        stack.push();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        stack.load(view);
        assert_eq!(stack.current(), view);
        assert_eq!(stack.depth(), 1);
        stack.pop().unwrap();
        assert_eq!(stack.current(), Mat4::IDENTITY);
    }
}
