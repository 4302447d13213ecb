use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::utils::{create_cube_mesh, MeshBuffer};

/// Per-instance uniform consumed by both the depth and lighting shaders.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub reverse_normals: f32,
    pub _pad: [f32; 3],
}

struct SceneInstance {
    bind_group: wgpu::BindGroup,
}

/// The demo scene: a large room cube drawn from the inside plus a handful
/// of boxes floating in it. Geometry and per-instance uniforms are built
/// once; drawing only binds and issues indexed draws, so the same scene
/// can be replayed into the depth pass and the lighting pass.
pub struct Scene {
    cube: MeshBuffer,
    instances: Vec<SceneInstance>,
    pub model_layout: wgpu::BindGroupLayout,
}

/// Model transforms of the demo scene, paired with the reverse-normals
/// flag (set only for the room, which is viewed from the inside).
pub fn instance_transforms() -> Vec<(Mat4, bool)> {
    vec![
        // Room: one big cube, lit on its interior faces
        (Mat4::from_scale(Vec3::splat(5.0)), true),
        (
            Mat4::from_translation(Vec3::new(4.0, -3.5, 0.0)) * Mat4::from_scale(Vec3::splat(0.5)),
            false,
        ),
        (
            Mat4::from_translation(Vec3::new(2.0, 3.0, 1.0)) * Mat4::from_scale(Vec3::splat(0.75)),
            false,
        ),
        (
            Mat4::from_translation(Vec3::new(-3.0, -1.0, 0.0)) * Mat4::from_scale(Vec3::splat(0.5)),
            false,
        ),
        (
            Mat4::from_translation(Vec3::new(-1.5, 1.0, 1.5)) * Mat4::from_scale(Vec3::splat(0.5)),
            false,
        ),
        (
            Mat4::from_translation(Vec3::new(-1.5, 2.0, -3.0))
                * Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), 60f32.to_radians())
                * Mat4::from_scale(Vec3::splat(0.75)),
            false,
        ),
    ]
}

impl Scene {
    pub fn new(device: &wgpu::Device) -> Self {
        let cube = create_cube_mesh().upload(device);

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let instances = instance_transforms()
            .into_iter()
            .map(|(model, reverse_normals)| {
                let uniform = ModelUniform {
                    model: model.to_cols_array_2d(),
                    reverse_normals: if reverse_normals { 1.0 } else { 0.0 },
                    _pad: [0.0; 3],
                };
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("model_buffer"),
                    contents: bytemuck::bytes_of(&uniform),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("model_bind_group"),
                    layout: &model_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                SceneInstance { bind_group }
            })
            .collect();

        Self {
            cube,
            instances,
            model_layout,
        }
    }

    /// Draw every instance into `pass`. The caller has already set a
    /// pipeline and its frame-level bind group(s); this binds group 1
    /// (the model uniform) per instance.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));
        pass.set_index_buffer(self.cube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for instance in &self.instances {
            pass.set_bind_group(1, &instance.bind_group, &[]);
            pass.draw_indexed(0..self.cube.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_has_room_and_five_boxes() {
        let transforms = instance_transforms();
        assert_eq!(transforms.len(), 6);
        assert!(transforms[0].1, "room is drawn inside-out");
        assert!(transforms[1..].iter().all(|(_, rev)| !rev));
    }

    #[test]
    fn test_room_spans_ten_units() {
        let (room, _) = instance_transforms()[0];
        let corner = room.transform_point3(Vec3::ONE);
        assert_eq!(corner, Vec3::splat(5.0));
    }

    #[test]
    fn test_box_translations() {
        let transforms = instance_transforms();
        let centers: Vec<Vec3> = transforms[1..]
            .iter()
            .map(|(m, _)| m.transform_point3(Vec3::ZERO))
            .collect();
        assert!((centers[0] - Vec3::new(4.0, -3.5, 0.0)).length() < 1e-6);
        assert!((centers[1] - Vec3::new(2.0, 3.0, 1.0)).length() < 1e-6);
        assert!((centers[4] - Vec3::new(-1.5, 2.0, -3.0)).length() < 1e-6);
    }

    #[test]
    fn test_rotated_box_preserves_scale() {
        // The tilted box rotates about a diagonal axis; scale stays uniform
        let (tilted, _) = instance_transforms()[5];
        let x = tilted.transform_vector3(Vec3::X).length();
        let y = tilted.transform_vector3(Vec3::Y).length();
        assert!((x - 0.75).abs() < 1e-5);
        assert!((y - 0.75).abs() < 1e-5);
    }
}
