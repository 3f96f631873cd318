//! # Phalanx
//!
//! **A hierarchical 3D scene demo built on a hand-rolled matrix stack.**
//!
//! A checkerboard field and a drivable tank — hull, eight rolling wheels,
//! axles, turret, cannon — assembled entirely from four primitive meshes
//! and a stack of affine transforms. The scene hierarchy is explicit data
//! (a tree of [`Node`]s) interpreted against a [`TransformStack`] once per
//! frame, so everything up to the draw list is headless and testable.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() {
//!     phalanx::run();
//! }
//! ```
//!
//! Drive with `A`/`D`, aim with the arrow keys, fire with `Space`, switch
//! cameras with `1`–`4`, and toggle wireframe/filled with `W`/`S`.
//!
//! ## Architecture
//!
//! - [`transform`] — the save/restore matrix stack and its composer ops.
//! - [`scene`] — the scene tree and the interpreter that resolves it into
//!   an ordered list of flat-colored draws.
//! - [`tank`] — construction of the board and tank hierarchy from state.
//! - [`state`] — the per-session context: camera, render mode, tank pose,
//!   projectiles; mutated only by named input events and the frame tick.
//! - [`camera`] / [`geometry`] — presets and procedural primitives.
//! - [`gpu`] / [`mesh`] / [`scene_pass`] / [`app`] — the wgpu/winit layer
//!   that turns resolved draws into pixels.

mod app;
pub mod camera;
pub mod geometry;
mod gpu;
mod input;
pub mod mesh;
pub mod scene;
mod scene_pass;
pub mod state;
pub mod tank;
pub mod transform;

pub use app::run;
pub use camera::{CameraPreset, VP_DISTANCE};
pub use gpu::{GpuContext, GpuError};
pub use input::Input;
pub use mesh::{Mesh, MeshLibrary, Vertex3d};
pub use scene::{Color, Node, Primitive, ResolvedDraw, TransformOp, resolve};
pub use scene_pass::ScenePass;
pub use state::{Direction, InputEvent, RenderMode, SimState, YawPolicy};
pub use transform::{Axis, StackUnderflow, TransformStack};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3, Vec4};

// Re-export the key codes the demo binds
pub use winit::keyboard::KeyCode;
