//! Scene construction: the checkerboard field and the tank.
//!
//! Each function here builds one named part of the hierarchy as a
//! [`Node`] subtree; [`scene`] assembles the whole frame's tree from the
//! current [`SimState`]. The hierarchy is fixed at compile time — only the
//! transform parameters read from the state vary between frames.
//!
//! The tank sits at the world origin (shifted along X by its displacement)
//! on a 20x20 board of unit cells. One non-uniform scale on the board group
//! flattens every cell to half height; this deliberate scale inheritance is
//! how compound parts are dimensioned throughout.

use glam::Mat4;

use crate::scene::{Color, Node, Primitive, TransformOp};
use crate::state::SimState;
use crate::transform::{Axis, TransformStack};

/// Cells per board side.
pub const BOARD_SIZE: usize = 20;

/// World-space spacing between adjacent cell centers.
pub const CELL_STEP: f32 = 1.0;

/// Half the board's side length; the board spans `[-BOARD_HALF, BOARD_HALF]`.
pub const BOARD_HALF: f32 = BOARD_SIZE as f32 * CELL_STEP / 2.0;

/// Half the hull's length along X, used to clamp travel at the board edge.
pub const TANK_HALF_LENGTH: f32 = 3.0;

/// Outer radius of a wheel torus; the effective rolling radius.
pub const WHEEL_RADIUS: f32 = 0.5;

/// Distance from the cannon pivot to the muzzle along the barrel.
pub const CANNON_LENGTH: f32 = 1.8;

const WHEEL_CENTER_Y: f32 = 0.75;
const WHEELS_PER_SIDE: usize = 4;
const WHEEL_SPACING: f32 = 1.5;
const WHEEL_TRACK_Z: f32 = 1.25;

const BOARD_LIGHT: Color = Color::rgb(0.85, 0.85, 0.78);
const BOARD_DARK: Color = Color::rgb(0.18, 0.28, 0.18);
const WHEEL_COLOR: Color = Color::rgb(0.0, 1.0, 1.0);
const AXLE_COLOR: Color = Color::rgb(1.0, 0.5, 0.7);
const HULL_COLOR: Color = Color::rgb(0.35, 0.42, 0.22);
const TURRET_COLOR: Color = Color::rgb(0.30, 0.36, 0.19);
const PROJECTILE_COLOR: Color = Color::rgb(0.8, 0.8, 0.9);

/// Checkerboard parity: cells with even `row + col` are light.
pub fn cell_color(row: usize, col: usize) -> Color {
    if (row + col) % 2 == 0 {
        BOARD_LIGHT
    } else {
        BOARD_DARK
    }
}

/// The checkerboard field, centered on the world origin.
///
/// One scale on the group flattens all cells to half height; each cell is
/// then a unit cube stepped out from the grid origin by its indices.
pub fn board() -> Node {
    let origin = -(BOARD_SIZE as f32 - 1.0) * CELL_STEP / 2.0;
    let mut cells = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            cells.push(
                Node::leaf(
                    Primitive::Cube,
                    [TransformOp::Translate(
                        origin + col as f32 * CELL_STEP,
                        0.0,
                        origin + row as f32 * CELL_STEP,
                    )],
                )
                .color(cell_color(row, col)),
            );
        }
    }
    Node::group([TransformOp::Scale(1.0, 0.5, 1.0)], cells)
}

/// X offsets of the four wheel stations, symmetric about the hull center.
fn wheel_stations() -> [f32; WHEELS_PER_SIDE] {
    let mut stations = [0.0; WHEELS_PER_SIDE];
    let first = -(WHEELS_PER_SIDE as f32 - 1.0) * WHEEL_SPACING / 2.0;
    for (i, station) in stations.iter_mut().enumerate() {
        *station = first + i as f32 * WHEEL_SPACING;
    }
    stations
}

/// Eight torus wheels in two rows of four, all rolled by the shared angle.
///
/// The torus is authored flat (axis along Y); standing it up with the X
/// rotation puts its axis along Z, so the roll applies about Z first.
fn wheels(wheel_angle: f32) -> Node {
    let mut children = Vec::with_capacity(2 * WHEELS_PER_SIDE);
    for z in [WHEEL_TRACK_Z, -WHEEL_TRACK_Z] {
        for x in wheel_stations() {
            children.push(Node::leaf(
                Primitive::Torus,
                [
                    TransformOp::Translate(x, WHEEL_CENTER_Y, z),
                    TransformOp::Rotate(Axis::Z, -wheel_angle),
                    TransformOp::Rotate(Axis::X, 90.0),
                ],
            ));
        }
    }
    Node::group([], children).color(WHEEL_COLOR)
}

/// Four cylinder axles joining each wheel pair across the hull.
fn axles() -> Node {
    let children = wheel_stations()
        .into_iter()
        .map(|x| {
            Node::leaf(
                Primitive::Cylinder,
                [
                    TransformOp::Translate(x, WHEEL_CENTER_Y, 0.0),
                    TransformOp::Rotate(Axis::X, 90.0),
                    TransformOp::Scale(0.16, 2.0 * WHEEL_TRACK_Z, 0.16),
                ],
            )
        })
        .collect();
    Node::group([], children).color(AXLE_COLOR)
}

fn hull() -> Node {
    Node::leaf(
        Primitive::Cube,
        [
            TransformOp::Translate(0.0, 1.4, 0.0),
            TransformOp::Scale(2.0 * TANK_HALF_LENGTH * 0.75, 0.8, 2.0),
        ],
    )
    .color(HULL_COLOR)
}

/// Local frame of the turret: mounted on the hull roof, swung by yaw.
fn turret_ops(state: &SimState) -> Vec<TransformOp> {
    vec![
        TransformOp::Translate(0.0, 2.0, 0.0),
        TransformOp::Rotate(Axis::Y, state.yaw),
    ]
}

/// Local frame of the cannon pivot: forward of the dome, elevated by pitch.
///
/// Positive pitch rotates the +X barrel upward (about Z).
fn cannon_ops(state: &SimState) -> Vec<TransformOp> {
    vec![
        TransformOp::Translate(0.6, 0.25, 0.0),
        TransformOp::Rotate(Axis::Z, state.pitch),
    ]
}

/// Turret dome, barrel, and muzzle tip, driven by yaw and pitch.
fn turret(state: &SimState) -> Node {
    let dome = Node::leaf(Primitive::Sphere, [TransformOp::Scale(1.6, 1.0, 1.6)]);
    let barrel = Node::leaf(
        Primitive::Cylinder,
        [
            TransformOp::Translate(CANNON_LENGTH / 2.0, 0.0, 0.0),
            TransformOp::Rotate(Axis::Z, -90.0),
            TransformOp::Scale(0.24, CANNON_LENGTH, 0.24),
        ],
    );
    let tip = Node::leaf(
        Primitive::Sphere,
        [
            TransformOp::Translate(CANNON_LENGTH, 0.0, 0.0),
            TransformOp::Scale(0.3, 0.3, 0.3),
        ],
    );
    let cannon = Node::group(cannon_ops(state), vec![barrel, tip]);
    Node::group(turret_ops(state), vec![dome, cannon]).color(TURRET_COLOR)
}

/// Local frame of the whole tank: displaced along X by linear travel.
fn tank_ops(state: &SimState) -> Vec<TransformOp> {
    vec![TransformOp::Translate(state.displacement, 0.0, 0.0)]
}

/// The tank subtree: wheels, axles, hull, turret.
pub fn tank(state: &SimState) -> Node {
    Node::group(
        tank_ops(state),
        vec![
            wheels(state.wheel_angle),
            axles(),
            hull(),
            turret(state),
        ],
    )
}

/// In-flight rounds, drawn in world space.
fn projectiles(state: &SimState) -> Vec<Node> {
    state
        .projectiles
        .iter()
        .map(|round| {
            Node::leaf(
                Primitive::Sphere,
                [
                    TransformOp::Translate(round.position.x, round.position.y, round.position.z),
                    TransformOp::Scale(0.22, 0.22, 0.22),
                ],
            )
            .color(PROJECTILE_COLOR)
        })
        .collect()
}

/// The full frame tree: board, tank, then any in-flight rounds.
pub fn scene(state: &SimState) -> Node {
    let mut children = vec![board(), tank(state)];
    children.extend(projectiles(state));
    Node::group([], children)
}

/// World transform of the muzzle, composed from exactly the op lists the
/// scene tree uses (tank, turret, cannon pivot, barrel length). Fired
/// rounds spawn here; local +X is the firing direction.
pub fn muzzle_transform(state: &SimState) -> Mat4 {
    let mut stack = TransformStack::new();
    for op in tank_ops(state)
        .iter()
        .chain(turret_ops(state).iter())
        .chain(cannon_ops(state).iter())
    {
        op.apply(&mut stack);
    }
    stack.translate(CANNON_LENGTH, 0.0, 0.0);
    stack.current()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::resolve;
    use glam::Vec3;

    #[test]
    fn checkerboard_parity_holds_over_the_whole_grid() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let expected = if (row + col) % 2 == 0 {
                    BOARD_LIGHT
                } else {
                    BOARD_DARK
                };
                assert_eq!(cell_color(row, col), expected, "cell ({row},{col})");
            }
        }
        // Adjacent cells always differ.
        assert_ne!(cell_color(0, 0), cell_color(0, 1));
        assert_ne!(cell_color(0, 0), cell_color(1, 0));
    }

    #[test]
    fn board_is_centered_on_the_origin() {
        let draws = resolve(&board(), &mut TransformStack::new()).unwrap();
        assert_eq!(draws.len(), BOARD_SIZE * BOARD_SIZE);

        let xs: Vec<f32> = draws
            .iter()
            .map(|d| d.model_view.transform_point3(Vec3::ZERO).x)
            .collect();
        let min = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!((min + max).abs() < 1e-4);
        assert!((max - min - (BOARD_SIZE as f32 - 1.0) * CELL_STEP).abs() < 1e-4);
    }

    #[test]
    fn board_scale_flattens_every_cell() {
        let draws = resolve(&board(), &mut TransformStack::new()).unwrap();
        for draw in &draws {
            // A unit Y vector in cell space comes out half length.
            let up = draw.model_view.transform_vector3(Vec3::Y);
            assert!((up.length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn scene_resolve_is_deterministic() {
        let mut state = SimState::new();
        state.displacement = 2.5;
        state.yaw = 33.0;
        state.pitch = 7.0;

        let a = resolve(&scene(&state), &mut TransformStack::new()).unwrap();
        let b = resolve(&scene(&state), &mut TransformStack::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn scene_draw_count_is_fixed_plus_projectiles() {
        let mut state = SimState::new();
        let base = resolve(&scene(&state), &mut TransformStack::new())
            .unwrap()
            .len();
        // 400 cells + 8 wheels + 4 axles + hull + dome + barrel + tip
        assert_eq!(base, BOARD_SIZE * BOARD_SIZE + 8 + 4 + 4);

        state.apply(crate::state::InputEvent::FireOnce);
        state.advance(0.01);
        let with_round = resolve(&scene(&state), &mut TransformStack::new())
            .unwrap()
            .len();
        assert_eq!(with_round, base + 1);
    }

    #[test]
    fn displacement_shifts_the_tank_but_not_the_board() {
        let at_rest = SimState::new();
        let mut moved = SimState::new();
        moved.displacement = 3.0;

        let a = resolve(&scene(&at_rest), &mut TransformStack::new()).unwrap();
        let b = resolve(&scene(&moved), &mut TransformStack::new()).unwrap();

        let cells = BOARD_SIZE * BOARD_SIZE;
        // Board cells are identical.
        assert_eq!(a[..cells], b[..cells]);
        // The first wheel moved by exactly the displacement.
        let wheel_a = a[cells].model_view.transform_point3(Vec3::ZERO);
        let wheel_b = b[cells].model_view.transform_point3(Vec3::ZERO);
        assert!((wheel_b - wheel_a - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn muzzle_points_forward_at_rest() {
        let state = SimState::new();
        let dir = muzzle_transform(&state).transform_vector3(Vec3::X);
        assert!((dir.normalize() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn muzzle_follows_yaw_and_pitch() {
        let mut state = SimState::new();
        state.yaw = 90.0;
        let dir = muzzle_transform(&state).transform_vector3(Vec3::X).normalize();
        // +90 degrees about Y swings +X onto -Z.
        assert!((dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        state.yaw = 0.0;
        state.pitch = 15.0;
        let dir = muzzle_transform(&state).transform_vector3(Vec3::X).normalize();
        assert!(dir.y > 0.2);
        assert!(dir.x > 0.9);
    }

    #[test]
    fn muzzle_rides_with_the_hull() {
        let mut near = SimState::new();
        let mut far = SimState::new();
        near.displacement = -1.0;
        far.displacement = 4.0;

        let p_near = muzzle_transform(&near).transform_point3(Vec3::ZERO);
        let p_far = muzzle_transform(&far).transform_point3(Vec3::ZERO);
        assert!((p_far.x - p_near.x - 5.0).abs() < 1e-5);
        assert_eq!(p_near.y, p_far.y);
    }
}
