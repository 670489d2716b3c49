// SPDX-License-Identifier: CEPL-1.0
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{CompileError, CompileJob, ShaderCompiler, Stage};

/// Compiles in process through libshaderc; no external tool required.
pub struct ShadercCompiler {
    compiler: shaderc::Compiler,
}

impl ShadercCompiler {
    pub fn new() -> Result<Self, CompileError> {
        let compiler =
            shaderc::Compiler::new().map_err(|e| CompileError::Shaderc(e.to_string()))?;
        Ok(ShadercCompiler { compiler })
    }

    /// Compile GLSL text to SPIR-V bytes.
    pub fn compile_source(
        &self,
        source: &str,
        stage: Stage,
        file_name: &str,
    ) -> Result<Vec<u8>, CompileError> {
        let mut opts =
            shaderc::CompileOptions::new().map_err(|e| CompileError::Shaderc(e.to_string()))?;
        opts.set_target_env(
            shaderc::TargetEnv::Vulkan,
            shaderc::EnvVersion::Vulkan1_0 as u32,
        );
        opts.set_optimization_level(shaderc::OptimizationLevel::Performance);

        let kind = match stage {
            Stage::Vertex => shaderc::ShaderKind::Vertex,
            Stage::Fragment => shaderc::ShaderKind::Fragment,
        };

        let artifact = self
            .compiler
            .compile_into_spirv(source, kind, file_name, "main", Some(&opts))
            .map_err(|e| CompileError::Shaderc(e.to_string()))?;

        if artifact.get_num_warnings() > 0 {
            debug!("{file_name}: {}", artifact.get_warning_messages());
        }
        Ok(artifact.as_binary_u8().to_vec())
    }
}

impl ShaderCompiler for ShadercCompiler {
    fn name(&self) -> &str {
        "shaderc"
    }

    fn compile(&self, dir: &Path, job: &CompileJob) -> Result<(), CompileError> {
        let src_path = dir.join(&job.source);
        let src = fs::read_to_string(&src_path).map_err(|source| CompileError::Read {
            path: src_path.clone(),
            source,
        })?;

        let spv = self.compile_source(&src, job.stage, &job.source)?;

        let out_path = dir.join(&job.output);
        fs::write(&out_path, spv).map_err(|source| CompileError::Write {
            path: out_path,
            source,
        })
    }
}
