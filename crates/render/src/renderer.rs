use cubefall_common::WindowConfig;
use cubefall_kernel::{DrawList, MaterialKind, Viewer};
use glam::{Mat4, Vec3};
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_viewer(
            &Viewer::new(Vec3::new(0.0, 6.0, 25.0), Vec3::NEG_Z),
            &WindowConfig::default(),
        )
    }
}

impl RenderView {
    /// View matching the window's projection settings.
    pub fn from_viewer(viewer: &Viewer, window: &WindowConfig) -> Self {
        Self {
            eye: viewer.position,
            forward: viewer.forward,
            fov_degrees: window.fov_degrees,
            aspect: window.width as f32 / window.height.max(1) as f32,
            near: window.near,
            far: window.far,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.eye + self.forward
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes the frame loop's draw list and a view. It holds no
/// reference to the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, draws: &DrawList, view: &RenderView) -> Self::Output;
}

fn material_name(material: MaterialKind) -> &'static str {
    match material {
        MaterialKind::Crate => "crate",
        MaterialKind::Projectile => "projectile",
        MaterialKind::Floor => "floor",
        MaterialKind::Marker => "marker",
    }
}

/// Produces a human-readable listing of a draw list.
///
/// Used by the headless CLI, in logs, and to test the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, draws: &DrawList, view: &RenderView) -> String {
        self.frames += 1;
        tracing::trace!(frame = self.frames, draws = draws.len(), "text frame");
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (draws={}) ===",
            self.frames,
            draws.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) forward=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.forward.x,
            view.forward.y,
            view.forward.z,
            view.fov_degrees
        );

        for item in draws.iter() {
            let p = item.transform.position;
            let tag = match item.entity {
                Some(id) => id.short(),
                None => "static".to_string(),
            };
            let _ = writeln!(
                out,
                "  [{tag:>8}] {:<10} {:?} pos=({:.2}, {:.2}, {:.2}) scale={:.2}",
                material_name(item.material),
                item.mesh,
                p.x,
                p.y,
                p.z,
                item.transform.scale.x
            );
        }

        out
    }
}
