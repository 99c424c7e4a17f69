use cubefall_common::WindowConfig;
use cubefall_input::FrameInput;
use cubefall_kernel::Viewer;
use cubefall_render::RenderView;
use glam::Vec3;

const SPRINT_MULTIPLIER: f32 = 3.0;

/// First-person fly camera. Camera motion is driven by input every frame
/// and is not part of the simulation; the frame loop only mirrors its
/// position into the kinematic camera collider.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_config(&WindowConfig::default())
    }
}

impl FlyCamera {
    /// Camera at `camera_start` looking down -Z.
    pub fn from_config(window: &WindowConfig) -> Self {
        Self {
            position: window.camera_start,
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            fov_degrees: window.fov_degrees,
            aspect: window.width as f32 / window.height.max(1) as f32,
            near: window.near,
            far: window.far,
            speed: window.camera_speed,
            sensitivity: 0.003,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Move along the view basis: `movement.z` forward, `x` right, `y` up.
    pub fn apply_input(&mut self, input: &FrameInput, dt: f32) {
        let speed = if input.sprint {
            self.speed * SPRINT_MULTIPLIER
        } else {
            self.speed
        };
        let m = input.movement;
        let delta = self.forward() * m.z + self.right() * m.x + Vec3::Y * m.y;
        self.position += delta * speed * dt;
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(
            -89.0_f32.to_radians(),
            89.0_f32.to_radians(),
        );
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.position, self.forward())
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.position,
            forward: self.forward(),
            fov_degrees: self.fov_degrees,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }
}
