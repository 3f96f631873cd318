//! Animation and interaction state.
//!
//! All per-session mutable state lives in one [`SimState`] owned by the
//! render loop: camera preset, render mode, the tank's pose, and the list
//! of in-flight projectiles. Discrete named [`InputEvent`]s are the only
//! way the state changes in response to input; [`SimState::advance`] is the
//! only per-frame evolution. Event handlers and the frame run strictly
//! interleaved on one thread, so there is no locking anywhere.
//!
//! No transition can fail: out-of-range adjustments saturate at their
//! clamp, everything else is an unconditional assignment.

use glam::Vec3;

use crate::camera::CameraPreset;
use crate::tank;

/// Increment applied to the tank's displacement per [`InputEvent::AdvanceLinear`].
pub const MOVE_STEP: f32 = 0.1;

/// Lower travel bound: half the board plus a margin of one cell, so the
/// tank can poke just past the near edge.
pub const TRAVEL_MIN: f32 = -(tank::BOARD_HALF + tank::CELL_STEP);

/// Upper travel bound: half the board minus the tank's own half length,
/// keeping the hull on the far edge.
pub const TRAVEL_MAX: f32 = tank::BOARD_HALF - tank::TANK_HALF_LENGTH;

/// Increment applied to the turret pitch per [`InputEvent::AdjustPitch`], degrees.
pub const PITCH_STEP: f32 = 1.0;

/// Turret pitch clamp range, degrees. The cannon rests level and elevates up.
pub const PITCH_MIN: f32 = 0.0;
pub const PITCH_MAX: f32 = 15.0;

/// Increment applied to the turret yaw per [`InputEvent::AdjustYaw`], degrees.
pub const YAW_STEP: f32 = 2.0;

/// Muzzle exit speed of a fired round, world units per second.
pub const MUZZLE_SPEED: f32 = 8.0;

/// Downward acceleration applied to in-flight rounds.
pub const GRAVITY: f32 = 9.8;

/// Rounds older than this are retired.
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// Wireframe or filled triangles, applied globally to the frame's draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Filled,
}

/// Direction of a stepped adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    fn signum(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// What to do with turret yaw as it accumulates.
///
/// The reference behavior leaves yaw unclamped; whether it should wrap at
/// a full turn is a policy choice, so both are offered rather than guessed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YawPolicy {
    /// Yaw accumulates without bound.
    #[default]
    Unbounded,
    /// Yaw wraps into the open interval (-360, 360).
    Wrap,
}

/// A discrete named input event, abstracted from physical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    SetRenderMode(RenderMode),
    SetCameraPreset(CameraPreset),
    /// Move the tank along X by one step, rolling the wheels to match.
    AdvanceLinear(Direction),
    /// Elevate or lower the cannon by one step, clamped.
    AdjustPitch(Direction),
    /// Swing the turret by one step.
    AdjustYaw(Direction),
    /// Request a single projectile spawn on the next frame.
    FireOnce,
}

/// A round in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

/// The explicit context object threaded through event handling and the
/// per-frame traversal. Owned by the render loop; never global.
#[derive(Clone, Debug)]
pub struct SimState {
    pub camera: CameraPreset,
    pub render_mode: RenderMode,
    /// Linear travel of the tank along X, clamped to
    /// `[TRAVEL_MIN, TRAVEL_MAX]`.
    pub displacement: f32,
    /// Wheel roll angle in degrees, derived from displacement so the wheels
    /// visually track linear travel.
    pub wheel_angle: f32,
    /// Cannon elevation in degrees, clamped to `[PITCH_MIN, PITCH_MAX]`.
    pub pitch: f32,
    /// Turret swing in degrees; range governed by `yaw_policy`.
    pub yaw: f32,
    pub yaw_policy: YawPolicy,
    /// One-shot spawn flag, consumed by the next `advance`.
    pub fire_pending: bool,
    pub projectiles: Vec<Projectile>,
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimState {
    pub fn new() -> Self {
        Self {
            camera: CameraPreset::Isometric,
            render_mode: RenderMode::Wireframe,
            displacement: 0.0,
            wheel_angle: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            yaw_policy: YawPolicy::default(),
            fire_pending: false,
            projectiles: Vec::new(),
        }
    }

    /// Applies one input event. Never fails; out-of-range motion saturates.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::SetRenderMode(mode) => self.render_mode = mode,
            InputEvent::SetCameraPreset(preset) => self.camera = preset,
            InputEvent::AdvanceLinear(dir) => {
                let target = self.displacement + dir.signum() * MOVE_STEP;
                let clamped = target.clamp(TRAVEL_MIN, TRAVEL_MAX);
                let delta = clamped - self.displacement;
                self.displacement = clamped;
                // Roll the wheels by the exact circumference ratio, using
                // the post-clamp delta so a pinned tank has still wheels.
                self.wheel_angle +=
                    360.0 * delta / (std::f32::consts::TAU * tank::WHEEL_RADIUS);
            }
            InputEvent::AdjustPitch(dir) => {
                self.pitch =
                    (self.pitch + dir.signum() * PITCH_STEP).clamp(PITCH_MIN, PITCH_MAX);
            }
            InputEvent::AdjustYaw(dir) => {
                self.yaw += dir.signum() * YAW_STEP;
                if self.yaw_policy == YawPolicy::Wrap {
                    self.yaw %= 360.0;
                }
            }
            InputEvent::FireOnce => self.fire_pending = true,
        }
    }

    /// Advances the per-frame simulation by `dt` seconds.
    ///
    /// Consumes a pending fire request by spawning a round at the muzzle's
    /// current world transform, then integrates in-flight rounds under
    /// gravity, retiring them when they time out or drop below the board.
    pub fn advance(&mut self, dt: f32) {
        if self.fire_pending {
            let muzzle = tank::muzzle_transform(self);
            self.projectiles.push(Projectile {
                position: muzzle.transform_point3(Vec3::ZERO),
                velocity: muzzle.transform_vector3(Vec3::X).normalize() * MUZZLE_SPEED,
                age: 0.0,
            });
            self.fire_pending = false;
        }

        for round in &mut self.projectiles {
            round.velocity.y -= GRAVITY * dt;
            round.position += round.velocity * dt;
            round.age += dt;
        }
        self.projectiles
            .retain(|round| round.age < PROJECTILE_LIFETIME && round.position.y > -2.0);
    }
}
