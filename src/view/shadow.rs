use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::utils::Vertex;

pub const FACE_COUNT: usize = 6;
pub const DEFAULT_RESOLUTION: u32 = 1024;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 25.0;

/// (look direction, up) per cube face, indexed +X, -X, +Y, -Y, +Z, -Z.
/// The up vector flips on the Y faces to keep the winding consistent
/// across the cube.
const FACES: [(Vec3, Vec3); FACE_COUNT] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

/// Runtime-tunable shadow parameters.
#[derive(Debug, Clone, Copy)]
pub struct ShadowSettings {
    pub enabled: bool,
    /// Acne bias in linear-distance units. The depth map stores
    /// light-to-surface distance (not clip-space z), so one constant
    /// serves every face.
    pub bias: f32,
    /// When set, ambient light still reaches shadowed surfaces.
    pub lit_ambient: bool,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bias: 0.05,
            lit_ambient: true,
        }
    }
}

impl ShadowSettings {
    /// The comparison the lighting shader performs, host-side: a fragment
    /// is occluded when its distance from the light exceeds the stored
    /// occluder distance by more than the bias.
    pub fn occluded(&self, stored_distance: f32, actual_distance: f32) -> bool {
        actual_distance - self.bias > stored_distance
    }
}

/// Six view-projection matrices surrounding `light`, one per cube face:
/// a 90 degree, aspect-1 projection paired with a look-at down each axis.
pub fn face_transforms(light: Vec3, near: f32, far: f32) -> [Mat4; FACE_COUNT] {
    let proj = Mat4::perspective_rh(90f32.to_radians(), 1.0, near, far);
    FACES.map(|(dir, up)| proj * Mat4::look_at_rh(light, light + dir, up))
}

/// Per-face uniform for the depth pass.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FaceUniform {
    view_proj: [[f32; 4]; 4],
    light_pos: [f32; 3],
    far_plane: f32,
}

/// Renders scene depth into a cube map around a point light.
///
/// The cube target is allocated once; the six face transforms are
/// recomputed only when the light position or clip planes change. The
/// cube map is written exclusively by `encode_depth_pass` and read-only
/// for the lighting pass that samples `cube_view`.
pub struct ShadowPipeline {
    light_position: Vec3,
    near: f32,
    far: f32,
    transforms: [Mat4; FACE_COUNT],
    pipeline: wgpu::RenderPipeline,
    face_views: [wgpu::TextureView; FACE_COUNT],
    face_buffers: [wgpu::Buffer; FACE_COUNT],
    face_bind_groups: [wgpu::BindGroup; FACE_COUNT],
    pub cube_view: wgpu::TextureView,
    pub settings: ShadowSettings,
}

impl ShadowPipeline {
    pub fn new(
        device: &wgpu::Device,
        model_layout: &wgpu::BindGroupLayout,
        resolution: u32,
        near: f32,
        far: f32,
    ) -> Self {
        let light_position = Vec3::ZERO;
        let transforms = face_transforms(light_position, near, far);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_cube_texture"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: FACE_COUNT as u32,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("shadow_cube_view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let face_views = std::array::from_fn(|face| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("shadow_face_view"),
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: face as u32,
                array_layer_count: Some(1),
                ..Default::default()
            })
        });

        let face_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_face_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let face_buffers: [wgpu::Buffer; FACE_COUNT] = std::array::from_fn(|face| {
            let uniform = FaceUniform {
                view_proj: transforms[face].to_cols_array_2d(),
                light_pos: light_position.to_array(),
                far_plane: far,
            };
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("shadow_face_buffer"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        });
        let face_bind_groups = std::array::from_fn(|face| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("shadow_face_bind_group"),
                layout: &face_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: face_buffers[face].as_entire_binding(),
                }],
            })
        });

        let shader_src = include_str!("../shaders/shadow_depth.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_depth_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pipeline_layout"),
            bind_group_layouts: &[&face_layout, model_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_depth_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            // Depth only: the fragment stage exists solely to write the
            // linearized light distance, no color targets
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The room cube is rendered from the inside
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
            cache: None,
        });

        Self {
            light_position,
            near,
            far,
            transforms,
            pipeline,
            face_views,
            face_buffers,
            face_bind_groups,
            cube_view,
            settings: ShadowSettings::default(),
        }
    }

    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn transforms(&self) -> &[Mat4; FACE_COUNT] {
        &self.transforms
    }

    /// Move the point light. Face transforms and uniforms are refreshed
    /// only when the position actually changed.
    pub fn move_light(&mut self, queue: &wgpu::Queue, position: Vec3) {
        if position == self.light_position {
            return;
        }
        self.light_position = position;
        self.refresh_transforms(queue);
    }

    /// Change the shadow clip planes (the far plane doubles as the
    /// distance normalization factor in both shaders).
    pub fn set_clip_planes(&mut self, queue: &wgpu::Queue, near: f32, far: f32) {
        if near == self.near && far == self.far {
            return;
        }
        self.near = near;
        self.far = far;
        self.refresh_transforms(queue);
    }

    fn refresh_transforms(&mut self, queue: &wgpu::Queue) {
        self.transforms = face_transforms(self.light_position, self.near, self.far);
        for face in 0..FACE_COUNT {
            let uniform = FaceUniform {
                view_proj: self.transforms[face].to_cols_array_2d(),
                light_pos: self.light_position.to_array(),
                far_plane: self.far,
            };
            queue.write_buffer(&self.face_buffers[face], 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Encode the depth pass: one render pass per face, each clearing its
    /// face of the cube to the far plane and replaying `draw_scene` with
    /// that face's transform bound. A callback that draws nothing leaves
    /// the cube all-far, which renders as "everything lit" downstream.
    pub fn encode_depth_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        mut draw_scene: impl FnMut(&mut wgpu::RenderPass<'_>),
    ) {
        for face in 0..FACE_COUNT {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_depth_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.face_views[face],
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.face_bind_groups[face], &[]);
            draw_scene(&mut pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    const FACE_AXES: [Vec3; FACE_COUNT] = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];

    #[test]
    fn test_face_table_is_orthogonal() {
        for (dir, up) in FACES {
            assert!((dir.length() - 1.0).abs() < 1e-6);
            assert!((up.length() - 1.0).abs() < 1e-6);
            assert_eq!(dir.dot(up), 0.0);
        }
    }

    #[test]
    fn test_each_face_looks_down_its_axis() {
        let light = Vec3::new(1.0, -2.0, 0.5);
        let transforms = face_transforms(light, 1.0, 25.0);
        for (face, axis) in FACE_AXES.iter().enumerate() {
            let probe = light + *axis * 10.0;
            let clip = transforms[face] * probe.extend(1.0);
            assert!(clip.w > 0.0, "face {face}: probe behind the camera");
            let ndc = clip.xyz() / clip.w;
            assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "face {face}: probe off-center: {ndc:?}");
            assert!(ndc.z > 0.0 && ndc.z < 1.0, "face {face}: probe outside depth range: {}", ndc.z);
        }
    }

    #[test]
    fn test_faces_do_not_see_each_other_targets() {
        // The +X face must not have the +Y probe in front of it
        let light = Vec3::ZERO;
        let transforms = face_transforms(light, 1.0, 25.0);
        let probe = Vec3::Y * 10.0;
        let clip = transforms[0] * probe.extend(1.0);
        let centered = clip.w > 0.0
            && (clip.x / clip.w).abs() < 1e-4
            && (clip.y / clip.w).abs() < 1e-4;
        assert!(!centered);
    }

    #[test]
    fn test_transforms_follow_the_light() {
        let a = face_transforms(Vec3::ZERO, 1.0, 25.0);
        let b = face_transforms(Vec3::ZERO, 1.0, 25.0);
        let moved = face_transforms(Vec3::new(0.0, 0.0, 3.0), 1.0, 25.0);
        assert_eq!(a, b, "same light, same transforms");
        assert_ne!(a, moved, "moving the light must change the transforms");
    }

    #[test]
    fn test_occlusion_threshold() {
        let settings = ShadowSettings::default();
        // Fragment at distance 10, stored occluder also at 10: lit
        assert!(!settings.occluded(10.0, 10.0));
        // Occluder stored at distance 5: shadowed
        assert!(settings.occluded(5.0, 10.0));
        // Within the bias band: still lit
        assert!(!settings.occluded(10.0, 10.0 + settings.bias));
    }
}
