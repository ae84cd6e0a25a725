//! Asset loading/parsers (meshes, textures, shaders, dither patterns).
//! Everything here is CPU-side; GPU upload lives in `renderer`.

pub mod dither;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod text;
pub mod texture;

pub use error::{AssetError, AssetResult};
