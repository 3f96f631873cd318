//! The windowed demo driver.
//!
//! [`run`] opens a window and drives the frame loop: apply the frame's
//! input events to the [`SimState`], advance the simulation, rebuild and
//! resolve the scene tree, and hand the draw list to the [`ScenePass`].
//! Input handlers and the frame body run interleaved on the event-loop
//! thread, so the state is never touched concurrently.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::camera::projection_matrix;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh::MeshLibrary;
use crate::scene::resolve;
use crate::scene_pass::ScenePass;
use crate::state::SimState;
use crate::tank;
use crate::transform::TransformStack;

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    pass: Option<ScenePass>,
    meshes: Option<MeshLibrary>,
    input: Input,
    state: SimState,
    last_frame: Instant,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            pass: None,
            meshes: None,
            input: Input::new(),
            state: SimState::new(),
            last_frame: Instant::now(),
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(pass), Some(meshes)) =
            (self.gpu.as_ref(), self.pass.as_mut(), self.meshes.as_ref())
        else {
            return;
        };

        // Cap dt so a dragged window doesn't catapult the projectiles.
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        for event in self.input.events() {
            self.state.apply(event);
        }
        self.input.begin_frame();
        self.state.advance(dt);

        // Traverse: view matrix in, ordered draw list out.
        let mut stack = TransformStack::new();
        stack.load(self.state.camera.view_matrix());
        let draws = match resolve(&tank::scene(&self.state), &mut stack) {
            Ok(draws) => draws,
            Err(err) => {
                // A broken save/restore pairing is a structural bug; skip
                // the frame rather than draw with a corrupted transform.
                eprintln!("aborting frame: {err}");
                return;
            }
        };
        debug_assert_eq!(stack.depth(), 0);

        pass.prepare(gpu, projection_matrix(gpu.aspect()), &draws);

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err) => {
                match surface_error_action(&err) {
                    // A lost or outdated swapchain shows up during live
                    // resizes; reconfigure and pick up on the next frame.
                    SurfaceAction::Reconfigure => {
                        gpu.surface.configure(&gpu.device, &gpu.config);
                    }
                    SurfaceAction::Skip => {}
                    SurfaceAction::Fatal => {
                        eprintln!("fatal surface error: {err}");
                        event_loop.exit();
                    }
                }
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.render(&mut render_pass, meshes, self.state.render_mode, &draws);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// How to respond to a failed swapchain acquire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SurfaceAction {
    /// The swapchain no longer matches the window; reconfigure and retry
    /// next frame.
    Reconfigure,
    /// Transient; drop the frame and carry on.
    Skip,
    /// Unrecoverable; shut the demo down.
    Fatal,
}

fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
        wgpu::SurfaceError::Timeout => SurfaceAction::Skip,
        wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other => SurfaceAction::Fatal,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("Phalanx"))
                .unwrap(),
        );

        let gpu = match GpuContext::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(err) => {
                eprintln!("failed to bring up the gpu: {err}");
                event_loop.exit();
                return;
            }
        };
        self.pass = Some(ScenePass::new(&gpu));
        self.meshes = Some(MeshLibrary::new(&gpu));
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

/// Opens the demo window and runs until closed.
pub fn run() {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_class_surface_errors_reconfigure_instead_of_aborting() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Lost),
            SurfaceAction::Reconfigure
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Outdated),
            SurfaceAction::Reconfigure
        );
    }

    #[test]
    fn timeouts_drop_the_frame_and_oom_is_fatal() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Timeout),
            SurfaceAction::Skip
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::OutOfMemory),
            SurfaceAction::Fatal
        );
    }
}
