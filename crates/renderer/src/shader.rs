//! Shader stages compiled from line lists, with diagnostics logged rather than fatal.

use std::path::Path;

use wgpu::{Device, ErrorFilter, ShaderModule, ShaderModuleDescriptor, ShaderSource};

/// Compile one WGSL stage from `lines` (see [`asset::text::load_lines`]).
///
/// Validation errors are logged with the full diagnostic; the returned module may be
/// unusable, in which case pipeline creation reports it again.
pub fn compile_stage(device: &Device, label: &str, lines: &[String]) -> ShaderModule {
    if lines.is_empty() {
        log::warn!("Shader '{}' has empty source", label);
    }
    let source = asset::text::join_lines(lines);

    device.push_error_scope(ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(label),
        source: ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        log::error!("Shader compilation failed!");
        log::error!("Shader compilation log:\n{}", err);
    }
    module
}

/// Read and compile a stage from disk; a missing file compiles as empty source.
pub fn load_stage(device: &Device, path: &Path) -> ShaderModule {
    let lines = asset::text::load_lines(path);
    compile_stage(device, &path.display().to_string(), &lines)
}

/// Run `build` under a validation scope and log any failure as a link error.
pub fn checked_link<T>(device: &Device, label: &str, build: impl FnOnce() -> T) -> T {
    device.push_error_scope(ErrorFilter::Validation);
    let out = build();
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        log::error!("Shader link failed!");
        log::error!("Shader link log for '{}':\n{}", label, err);
    }
    out
}
