//! Command-line settings. Every flag is optional; defaults match the stock demo.

use std::path::PathBuf;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// Accepts `--gpu-backend=`, `--size=WxH`, `--width=`, `--height=`, `--data-dir=`.
    /// Unknown or malformed flags are logged and ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if let Some(val) = arg.strip_prefix("--gpu-backend=") {
                cfg.backends = parse_backend(val);
            } else if let Some(v) = arg.strip_prefix("--size=") {
                match parse_size(v) {
                    Some((w, h)) => {
                        cfg.width = w;
                        cfg.height = h;
                    }
                    None => log::warn!("Ignoring malformed --size '{}'", v),
                }
            } else if let Some(v) = arg.strip_prefix("--width=") {
                match v.parse::<u32>() {
                    Ok(w) => cfg.width = w,
                    Err(_) => log::warn!("Ignoring malformed --width '{}'", v),
                }
            } else if let Some(v) = arg.strip_prefix("--height=") {
                match v.parse::<u32>() {
                    Ok(h) => cfg.height = h,
                    Err(_) => log::warn!("Ignoring malformed --height '{}'", v),
                }
            } else if let Some(v) = arg.strip_prefix("--data-dir=") {
                cfg.data_dir = PathBuf::from(v);
            } else {
                log::warn!("Unknown argument '{}'", arg);
            }
        }
        cfg.width = cfg.width.max(1);
        cfg.height = cfg.height.max(1);
        cfg
    }
}

/// auto|vulkan|dx12|metal|gl; anything else falls back to auto.
fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn parse_size(v: &str) -> Option<(u32, u32)> {
    let (sw, sh) = v.split_once('x').or_else(|| v.split_once('X'))?;
    Some((sw.parse().ok()?, sh.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_gives_stock_demo() {
        let cfg = AppConfig::from_args(Vec::<String>::new());
        assert_eq!(cfg, AppConfig::default());
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn parses_all_flags() {
        let cfg = AppConfig::from_args([
            "--gpu-backend=Vulkan",
            "--size=1024x768",
            "--data-dir=/tmp/assets",
        ]);
        assert_eq!(cfg.backends, wgpu::Backends::VULKAN);
        assert_eq!((cfg.width, cfg.height), (1024, 768));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/assets"));
    }

    #[test]
    fn later_flags_win_and_zero_is_clamped() {
        let cfg = AppConfig::from_args(["--size=640X480", "--width=0", "--height=300"]);
        assert_eq!((cfg.width, cfg.height), (1, 300));
    }

    #[test]
    fn bad_values_are_ignored() {
        let cfg = AppConfig::from_args(["--gpu-backend=glide", "--size=big", "--width=-4", "--fps"]);
        assert_eq!(cfg, AppConfig::default());
    }
}
