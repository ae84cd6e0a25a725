//! Texture loading and data structures.
//! PNG decode is delegated to the `image` crate; output is always RGBA8.

use std::path::Path;

use image::ImageReader;

use crate::error::{AssetError, AssetResult};

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Load texture from PNG file.
    pub fn load_png<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| AssetError::io(path, e))?;
        let img = reader.decode().map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Ok(Self::new_rgba8(width, height, data))
    }

    /// Single-colour texture.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba.repeat((width * height) as usize);
        Self::new_rgba8(width, height, data)
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * self.bytes_per_pixel()
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_png_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = TextureData::load_png(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }), "{err}");
    }

    #[test]
    fn garbage_png_is_an_image_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").expect("write");
        let err = TextureData::load_png(&path).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }), "{err}");
    }

    #[test]
    fn decodes_png_to_rgba8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tiny.png");
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        img.save(&path).expect("save png");

        let tex = TextureData::load_png(&path).expect("load png");
        assert_eq!((tex.width, tex.height), (3, 2));
        assert!(tex.is_valid());
        assert_eq!(&tex.data[..4], &[10, 20, 30, 255]);
        assert_eq!(tex.bytes_per_row(), 12);
    }

    #[test]
    fn solid_texture_is_valid() {
        let tex = TextureData::solid(1, 1, [0, 0, 0, 255]);
        assert!(tex.is_valid());
        assert_eq!(tex.data, vec![0, 0, 0, 255]);
    }
}
