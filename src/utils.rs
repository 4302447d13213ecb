use bytemuck::NoUninit;
use glam::Vec3;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
                wgpu::VertexAttribute { offset: 24, shader_location: 2, format: wgpu::VertexFormat::Float32x2 },
            ],
        }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Create a cube mesh spanning [-1, 1] on every axis (position/normal/uv).
///
/// Four vertices per face so normals and uvs stay per-face sharp.
pub fn create_cube_mesh() -> Mesh {
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut mesh = Mesh::empty();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        let corners = [
            (normal - u - v, [0.0, 0.0]),
            (normal + u - v, [1.0, 0.0]),
            (normal + u + v, [1.0, 1.0]),
            (normal - u + v, [0.0, 1.0]),
        ];
        for (pos, uv) in corners {
            mesh.vertices.push(Vertex {
                pos: pos.to_array(),
                normal: normal.to_array(),
                uv,
            });
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_mesh_shape() {
        let mesh = create_cube_mesh();
        assert_eq!(mesh.vertices.len(), 24, "4 vertices per face, 6 faces");
        assert_eq!(mesh.indices.len(), 36, "2 triangles per face, 6 faces");
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_cube_mesh_normals_unit_and_axis_aligned() {
        let mesh = create_cube_mesh();
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            // Every normal points down exactly one axis
            let nonzero = v.normal.iter().filter(|c| c.abs() > 0.0).count();
            assert_eq!(nonzero, 1);
        }
    }

    #[test]
    fn test_cube_mesh_positions_on_surface() {
        let mesh = create_cube_mesh();
        for v in &mesh.vertices {
            assert!(v.pos.iter().any(|c| c.abs() == 1.0));
            assert!(v.pos.iter().all(|c| c.abs() <= 1.0));
        }
    }
}
