//! A drawable: mesh + texture + its own model-matrix uniform, bound explicitly per draw.
//!
//! The bind group keeps the texture alive, so only the mesh is stored.

use glam::Mat4;
use wgpu::{
    BindGroup, BindGroupLayout, BindingResource, Buffer, BufferUsages, Device, Queue, Sampler,
    TextureView, util::DeviceExt,
};

use crate::{mesh::GpuMesh, texture::GpuTexture2d, uniforms::ObjectUniform};

pub struct SceneObject {
    pub mesh: GpuMesh,
    uniform_buf: Buffer,
    bind_group: BindGroup,
}

impl SceneObject {
    /// `null_view` is bound in place of a texture that failed to load.
    pub fn new(
        device: &Device,
        layout: &BindGroupLayout,
        label: &str,
        mesh: GpuMesh,
        texture: &GpuTexture2d,
        null_view: &TextureView,
        sampler: &Sampler,
    ) -> Self {
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&ObjectUniform::new(Mat4::IDENTITY)),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(texture.view_or(null_view)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        });
        Self {
            mesh,
            uniform_buf,
            bind_group,
        }
    }

    pub fn set_model(&self, queue: &Queue, model: Mat4) {
        queue.write_buffer(
            &self.uniform_buf,
            0,
            bytemuck::bytes_of(&ObjectUniform::new(model)),
        );
    }

    /// Bind group 1 and draw; group 0 must already be set by the caller.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(rpass);
    }
}
