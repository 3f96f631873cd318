//! The scene tree and its interpreter.
//!
//! Instead of encoding the part hierarchy as nested function calls, the
//! scene is plain data: a tree of [`Node`]s, where each node carries the
//! transform operations that establish its local frame, an optional flat
//! color, and (for leaves) the primitive to draw. A generic interpreter,
//! [`resolve`], walks the tree against a [`TransformStack`] and produces the
//! frame's ordered list of [`ResolvedDraw`]s.
//!
//! Making the hierarchy data buys two things:
//!
//! - The whole tree's resolved transforms can be snapshot-tested without a
//!   live GPU.
//! - The interpreter brackets every node with `push`/`pop` itself, so a
//!   scene built from these types cannot unbalance the stack.
//!
//! Children are visited in declaration order, so repeated resolves of the
//! same tree yield identical draw sequences.

use glam::Mat4;

use crate::transform::{Axis, StackUnderflow, TransformStack};

/// A flat RGBA color, applied uniformly to a primitive's surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
}

/// The primitive meshes a leaf can draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Cube,
    Cylinder,
    Sphere,
    Torus,
}

/// One composer operation in a node's local-frame setup.
///
/// Operations apply in the order written, each relative to the frame
/// established by the preceding ones (right-multiplication). Rotation
/// angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(f32, f32, f32),
    Rotate(Axis, f32),
    Scale(f32, f32, f32),
}

impl TransformOp {
    /// Applies this operation to the stack's active transform.
    pub fn apply(&self, stack: &mut TransformStack) {
        match *self {
            TransformOp::Translate(dx, dy, dz) => stack.translate(dx, dy, dz),
            TransformOp::Rotate(axis, degrees) => stack.rotate(axis, degrees),
            TransformOp::Scale(sx, sy, sz) => stack.scale(sx, sy, sz),
        }
    }
}

/// One node of the scene tree.
///
/// A `Group` establishes a shared local frame (and optionally a color) for
/// an ordered sequence of children. A `Leaf` establishes its own frame and
/// draws exactly one primitive. Leaves without a color inherit the
/// innermost ancestor color, falling back to white.
#[derive(Clone, Debug)]
pub enum Node {
    Group {
        ops: Vec<TransformOp>,
        color: Option<Color>,
        children: Vec<Node>,
    },
    Leaf {
        ops: Vec<TransformOp>,
        color: Option<Color>,
        primitive: Primitive,
    },
}

impl Node {
    /// Creates a group node from local-frame operations and children.
    pub fn group(ops: impl Into<Vec<TransformOp>>, children: Vec<Node>) -> Self {
        Node::Group {
            ops: ops.into(),
            color: None,
            children,
        }
    }

    /// Creates a leaf node drawing `primitive` in its local frame.
    pub fn leaf(primitive: Primitive, ops: impl Into<Vec<TransformOp>>) -> Self {
        Node::Leaf {
            ops: ops.into(),
            color: None,
            primitive,
        }
    }

    /// Sets this node's flat color (inherited by uncolored descendants).
    pub fn color(mut self, value: Color) -> Self {
        match &mut self {
            Node::Group { color, .. } | Node::Leaf { color, .. } => *color = Some(value),
        }
        self
    }
}

/// One draw produced by resolving the scene tree: the model-view matrix at
/// the leaf, the effective flat color, and the primitive to issue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedDraw {
    pub primitive: Primitive,
    pub model_view: Mat4,
    pub color: Color,
}

/// Resolves a scene tree into its ordered draw list.
///
/// The stack's active transform is taken as the root frame; load the camera
/// view matrix first to get model-view matrices out, or leave the identity
/// in place to get world transforms. On return the active transform and
/// save depth are exactly as they were on entry.
///
/// # Errors
///
/// Propagates [`StackUnderflow`] from the stack. Trees built through
/// [`Node`]'s constructors are bracketed by construction, so an error here
/// indicates the stack was handed over mid-frame with corrupted state.
pub fn resolve(root: &Node, stack: &mut TransformStack) -> Result<Vec<ResolvedDraw>, StackUnderflow> {
    let mut draws = Vec::new();
    visit(root, stack, None, &mut draws)?;
    Ok(draws)
}

fn visit(
    node: &Node,
    stack: &mut TransformStack,
    inherited: Option<Color>,
    draws: &mut Vec<ResolvedDraw>,
) -> Result<(), StackUnderflow> {
    match node {
        Node::Group { ops, color, children } => {
            stack.push();
            for op in ops {
                op.apply(stack);
            }
            let effective = color.or(inherited);
            for child in children {
                visit(child, stack, effective, draws)?;
            }
            stack.pop()
        }
        Node::Leaf { ops, color, primitive } => {
            stack.push();
            for op in ops {
                op.apply(stack);
            }
            draws.push(ResolvedDraw {
                primitive: *primitive,
                model_view: stack.current(),
                color: color.or(inherited).unwrap_or(Color::WHITE),
            });
            stack.pop()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn two_level_tree() -> Node {
        Node::group(
            [TransformOp::Translate(0.0, 1.0, 0.0)],
            vec![
                Node::leaf(Primitive::Cube, [TransformOp::Scale(2.0, 1.0, 1.0)]),
                Node::group(
                    [TransformOp::Rotate(Axis::Y, 90.0)],
                    vec![Node::leaf(
                        Primitive::Sphere,
                        [TransformOp::Translate(3.0, 0.0, 0.0)],
                    )],
                )
                .color(Color::rgb(0.0, 1.0, 1.0)),
            ],
        )
    }

    #[test]
    fn resolve_leaves_the_stack_as_it_found_it() {
        let mut stack = TransformStack::new();
        stack.translate(5.0, 0.0, 0.0);
        let before = stack.current();

        let draws = resolve(&two_level_tree(), &mut stack).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(stack.current(), before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn resolve_is_deterministic() {
        let tree = two_level_tree();
        let a = resolve(&tree, &mut TransformStack::new()).unwrap();
        let b = resolve(&tree, &mut TransformStack::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn group_transforms_compose_onto_children() {
        let tree = two_level_tree();
        let draws = resolve(&tree, &mut TransformStack::new()).unwrap();

        // Cube: translated up by the group, stretched by its own scale.
        let cube_origin = draws[0].model_view.transform_point3(Vec3::ZERO);
        assert!((cube_origin - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);

        // Sphere: group translate, then rotate Y 90, then local translate
        // (3,0,0), which lands on the -Z axis.
        let sphere_origin = draws[1].model_view.transform_point3(Vec3::ZERO);
        assert!((sphere_origin - Vec3::new(0.0, 1.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn color_inherits_from_innermost_group() {
        let draws = resolve(&two_level_tree(), &mut TransformStack::new()).unwrap();
        assert_eq!(draws[0].color, Color::WHITE);
        assert_eq!(draws[1].color, Color::rgb(0.0, 1.0, 1.0));
    }

    #[test]
    fn leaf_color_overrides_inherited() {
        let tree = Node::group(
            [],
            vec![
                Node::leaf(Primitive::Torus, []).color(Color::rgb(1.0, 0.0, 0.0)),
            ],
        )
        .color(Color::rgb(0.0, 0.0, 1.0));

        let draws = resolve(&tree, &mut TransformStack::new()).unwrap();
        assert_eq!(draws[0].color, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn view_matrix_threads_through_to_draws() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let mut stack = TransformStack::new();
        stack.load(view);

        let tree = Node::leaf(Primitive::Cube, [TransformOp::Translate(1.0, 2.0, 3.0)]);
        let draws = resolve(&tree, &mut stack).unwrap();

        let expected = view * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(draws[0].model_view, expected);
    }
}
