//! GPU vertex buffers built from [`asset::mesh::MeshData`].

use asset::mesh::{FLOATS_PER_VERTEX, MeshData};
use wgpu::{BufferUsages, Device, VertexBufferLayout, VertexStepMode, util::DeviceExt};

/// Bytes between consecutive vertices: position(3) + uv(2) + normal(3) floats.
pub const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

/// Interleaved layout: 0 = position, 1 = uv, 2 = normal.
pub const VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: VERTEX_STRIDE,
    step_mode: VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3],
};

/// Non-indexed triangle list living on the GPU.
pub struct GpuMesh {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub triangle_count: u32,
}

impl GpuMesh {
    /// Upload and drop the CPU copy.
    pub fn upload(device: &Device, label: &str, mesh: MeshData) -> Self {
        let data = mesh.interleaved();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data),
            usage: BufferUsages::VERTEX,
        });
        let vertex_count = mesh.vertex_count() as u32;
        log::info!(
            "Created vertex buffer '{}' with {} tris.",
            label,
            mesh.triangle_count()
        );
        Self {
            buffer,
            vertex_count,
            triangle_count: vertex_count / 3,
        }
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        // Empty buffer slices are rejected by wgpu.
        if self.vertex_count == 0 {
            return;
        }
        rpass.set_vertex_buffer(0, self.buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_interleaved_mesh() {
        assert_eq!(VERTEX_STRIDE, 32);
        let offsets: Vec<u64> = VERTEX_LAYOUT.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20]);
    }
}
