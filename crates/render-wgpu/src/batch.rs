use bytemuck::{Pod, Zeroable};
use cubefall_kernel::{DrawList, MaterialKind, MeshKind};
use cubefall_render::{RenderView, Renderer};
use glam::Mat4;
use std::collections::BTreeMap;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
}

impl From<Mat4> for InstanceData {
    fn from(model: Mat4) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
        }
    }
}

/// Instances sharing one mesh and one texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub mesh: MeshKind,
    pub material: MaterialKind,
    pub instances: Vec<InstanceData>,
}

/// Groups a draw list into one instanced draw per (mesh, material).
#[derive(Debug, Default)]
pub struct InstanceBatcher;

impl Renderer for InstanceBatcher {
    type Output = Vec<Batch>;

    fn render(&mut self, draws: &DrawList, _view: &RenderView) -> Vec<Batch> {
        let mut grouped: BTreeMap<(MeshKind, MaterialKind), Vec<InstanceData>> = BTreeMap::new();
        for item in draws.iter() {
            grouped
                .entry((item.mesh, item.material))
                .or_default()
                .push(InstanceData::from(item.transform.matrix()));
        }
        grouped
            .into_iter()
            .map(|((mesh, material), instances)| Batch {
                mesh,
                material,
                instances,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefall_common::{EntityId, Transform};
    use cubefall_kernel::DrawItem;
    use glam::Vec3;

    fn item(mesh: MeshKind, material: MaterialKind, x: f32) -> DrawItem {
        DrawItem {
            entity: Some(EntityId::new()),
            mesh,
            material,
            transform: Transform {
                position: Vec3::new(x, 0.0, 0.0),
                ..Transform::default()
            },
        }
    }

    #[test]
    fn groups_by_mesh_and_material() {
        let draws = DrawList {
            items: vec![
                item(MeshKind::Cube, MaterialKind::Crate, 1.0),
                item(MeshKind::Sphere, MaterialKind::Projectile, 2.0),
                item(MeshKind::Cube, MaterialKind::Crate, 3.0),
                item(MeshKind::Cube, MaterialKind::Floor, 0.0),
            ],
        };
        let batches = InstanceBatcher.render(&draws, &RenderView::default());
        assert_eq!(batches.len(), 3);
        let crates = batches
            .iter()
            .find(|b| b.material == MaterialKind::Crate)
            .unwrap();
        assert_eq!(crates.instances.len(), 2);
        // Submission order is kept inside a batch.
        assert_eq!(crates.instances[0].model_3, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(crates.instances[1].model_3, [3.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_list_gives_no_batches() {
        let batches = InstanceBatcher.render(&DrawList::default(), &RenderView::default());
        assert!(batches.is_empty());
    }

    #[test]
    fn instance_carries_scale() {
        let transform = Transform {
            scale: Vec3::splat(2.0),
            ..Transform::default()
        };
        let data = InstanceData::from(transform.matrix());
        assert_eq!(data.model_0[0], 2.0);
        assert_eq!(data.model_1[1], 2.0);
        assert_eq!(data.model_2[2], 2.0);
    }
}
