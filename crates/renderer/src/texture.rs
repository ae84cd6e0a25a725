//! Texture uploads: RGBA8 2D images and the R8 dither volume.

use std::path::Path;

use asset::{dither::DitherVolume, texture::TextureData};
use wgpu::{
    AddressMode, Device, Extent3d, FilterMode, Queue, Sampler, SamplerDescriptor,
    TexelCopyBufferLayout, TexelCopyTextureInfo, TextureDescriptor, TextureDimension,
    TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
};

/// Colour a null texture samples as (an unbound unit reads black).
pub const NULL_TEXEL: [u8; 4] = [0, 0, 0, 255];

/// Linear min/mag filtering; default (clamp-to-edge) addressing.
pub fn linear_sampler(device: &Device, label: &str) -> Sampler {
    device.create_sampler(&SamplerDescriptor {
        label: Some(label),
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    })
}

/// Linear filtering, clamp-to-edge on all three axes.
pub fn clamped_volume_sampler(device: &Device, label: &str) -> Sampler {
    device.create_sampler(&SamplerDescriptor {
        label: Some(label),
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        address_mode_w: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    })
}

/// Colour textures are sampled as stored bytes, with no sRGB decode, so lighting and the
/// dither multiply happen on the encoded values.
pub const COLOR_TEXTURE_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// Decode a PNG, logging instead of failing when it is missing, corrupt or empty.
pub fn decode_or_warn(path: &Path) -> Option<TextureData> {
    match TextureData::load_png(path) {
        Ok(data) if data.is_valid() => Some(data),
        Ok(_) => {
            log::warn!("Texture \"{}\" has no pixels", path.display());
            None
        }
        Err(e) => {
            log::warn!("Unable to load texture \"{}\": {}", path.display(), e);
            None
        }
    }
}

/// Size the GPU texture will report; `(0, 0)` is the null texture.
pub fn upload_extent(decoded: Option<&TextureData>) -> (u32, u32) {
    decoded.map_or((0, 0), |data| (data.width, data.height))
}

/// 2D RGBA texture. A failed load yields the null texture (0x0, no GPU object).
pub struct GpuTexture2d {
    view: Option<TextureView>,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture2d {
    pub const fn null() -> Self {
        Self {
            view: None,
            width: 0,
            height: 0,
        }
    }

    /// Decode `path` and upload; logs and returns the null texture on failure.
    pub fn load(device: &Device, queue: &Queue, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let decoded = decode_or_warn(path);
        let (width, height) = upload_extent(decoded.as_ref());
        let label = path.display().to_string();
        Self {
            view: decoded.map(|data| upload_rgba8(device, queue, &label, &data)),
            width,
            height,
        }
    }

    pub fn is_null(&self) -> bool {
        self.view.is_none()
    }

    /// View to bind, falling back to `null_view` for a null texture.
    pub fn view_or<'a>(&'a self, null_view: &'a TextureView) -> &'a TextureView {
        self.view.as_ref().unwrap_or(null_view)
    }
}

/// 1x1 [`NULL_TEXEL`] view bound wherever a null texture is drawn.
pub fn null_view(device: &Device, queue: &Queue) -> TextureView {
    upload_rgba8(device, queue, "Null Texture", &TextureData::solid(1, 1, NULL_TEXEL))
}

fn upload_rgba8(device: &Device, queue: &Queue, label: &str, data: &TextureData) -> TextureView {
    let size = Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: COLOR_TEXTURE_FORMAT,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.data,
        TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(data.bytes_per_row()),
            rows_per_image: Some(data.height),
        },
        size,
    );
    texture.create_view(&TextureViewDescriptor::default())
}

/// Single-channel 3D texture holding the dither volume.
pub struct GpuTexture3d {
    pub view: TextureView,
}

impl GpuTexture3d {
    pub fn upload(device: &Device, queue: &Queue, label: &str, volume: &DitherVolume) -> Self {
        let size = Extent3d {
            width: volume.width,
            height: volume.height,
            depth_or_array_layers: volume.depth,
        };
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D3,
            format: TextureFormat::R8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &volume.data,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(volume.width),
                rows_per_image: Some(volume.height),
            },
            size,
        );
        log::info!(
            "Created dither volume {}x{}x{}",
            volume.width,
            volume.height,
            volume.depth
        );

        Self {
            view: texture.create_view(&TextureViewDescriptor::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_texture_has_no_size() {
        let tex = GpuTexture2d::null();
        assert!(tex.is_null());
        assert_eq!((tex.width, tex.height), (0, 0));
    }

    #[test]
    fn missing_png_degrades_to_a_null_texture() {
        let path = std::env::temp_dir().join("renderer-texture-test-does-not-exist.png");
        let decoded = decode_or_warn(&path);
        assert!(decoded.is_none());
        assert_eq!(upload_extent(decoded.as_ref()), (0, 0));
    }

    #[test]
    fn decoded_texture_keeps_its_size() {
        let data = TextureData::solid(4, 2, [255, 128, 0, 255]);
        assert_eq!(upload_extent(Some(&data)), (4, 2));
    }

    #[test]
    fn colour_textures_are_not_gamma_decoded() {
        assert!(!COLOR_TEXTURE_FORMAT.is_srgb());
    }
}
