use std::path::Path;

use crate::error::{BenchError, CrateResult};

pub const BUILTIN_SHADER: &str = include_str!("shaders.wgsl");

pub fn read_shader_source(path: &Path) -> CrateResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn load_shader_module(device: &wgpu::Device, path: &Path) -> CrateResult<wgpu::ShaderModule> {
    let source = read_shader_source(path)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Loaded Shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(BenchError::ShaderCompile {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

pub fn draw_shader_module(device: &wgpu::Device, path: Option<&Path>) -> wgpu::ShaderModule {
    if let Some(path) = path {
        match load_shader_module(device, path) {
            Ok(module) => {
                log::info!("using shader {}", path.display());
                return module;
            }
            Err(e) => log::warn!("{e}, using built-in shader"),
        }
    }

    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Shader"),
        source: wgpu::ShaderSource::Wgsl(BUILTIN_SHADER.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn builtin_shader_has_draw_entry_points() {
        assert!(BUILTIN_SHADER.contains("fn vs_main"));
        assert!(BUILTIN_SHADER.contains("fn fs_main"));
        assert!(BUILTIN_SHADER.contains("@group(0) @binding(0)"));
    }

    #[test]
    fn missing_shader_file_is_an_io_error() {
        let path = std::env::temp_dir().join("tribench-no-such-shader.wgsl");
        let err = read_shader_source(&path).unwrap_err();
        assert!(matches!(err, BenchError::Io(_)));
    }

    #[test]
    fn shader_source_is_read_verbatim() {
        let path = std::env::temp_dir().join(format!("tribench-shader-{}.wgsl", std::process::id()));
        std::fs::write(&path, BUILTIN_SHADER).unwrap();
        let source = read_shader_source(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(source, BUILTIN_SHADER);
    }
}
