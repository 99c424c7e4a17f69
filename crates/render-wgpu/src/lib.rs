//! wgpu render backend for cubefall.
//!
//! Draws the coordinate axes, a floor grid and textured, instanced cubes and
//! spheres from the frame loop's draw list. The fly camera is driven by
//! input and lives outside the simulation.
//!
//! # Invariants
//! - The renderer only reads the draw list.
//! - Render frame rate is independent of the simulation step.

mod batch;
mod camera;
mod gpu;
mod mesh;
mod shaders;
mod texture;

pub use batch::{Batch, InstanceBatcher, InstanceData};
pub use camera::FlyCamera;
pub use gpu::WgpuRenderer;
pub use mesh::{LineVertex, MeshData, Vertex, axis_lines, cube_mesh, floor_grid, sphere_mesh};
pub use texture::{TextureError, TextureImage, material_image};
