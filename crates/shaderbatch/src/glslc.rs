// SPDX-License-Identifier: CEPL-1.0
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::{CompileError, CompileJob, ShaderCompiler};

/// Runs an external `glslc`-compatible compiler, one process per job.
///
/// The child runs inside the batch directory, so source and output are passed
/// as bare names: `<program> -fshader-stage=<vert|frag> <source> -o <output>`.
/// Its stdout and stderr are inherited.
#[derive(Clone, Debug)]
pub struct GlslcCompiler {
    program: String,
    extra_args: Vec<String>,
}

impl GlslcCompiler {
    /// A bare name like `glslc` is looked up on `PATH`. A relative path such
    /// as `tools/glslc` is anchored to the current directory here, since the
    /// child runs inside the batch directory.
    pub fn new(program: impl Into<String>) -> Self {
        GlslcCompiler {
            program: anchor_program(program.into()),
            extra_args: Vec::new(),
        }
    }

    /// Arguments appended after the fixed ones, e.g. `--target-env=vulkan1.2`.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list for `job`, without the program itself.
    pub fn args(&self, job: &CompileJob) -> Vec<String> {
        let mut args = vec![
            format!("-fshader-stage={}", job.stage.flag()),
            job.source.clone(),
            "-o".to_owned(),
            job.output.clone(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

fn anchor_program(program: String) -> String {
    let path = Path::new(&program);
    if path.is_absolute() || path.components().count() < 2 {
        return program;
    }
    match std::path::absolute(path) {
        Ok(abs) => abs.to_str().map(str::to_owned).unwrap_or(program),
        Err(e) => {
            warn!("cannot resolve compiler path {program}: {e}");
            program
        }
    }
}

impl Default for GlslcCompiler {
    fn default() -> Self {
        GlslcCompiler::new(crate::DEFAULT_COMPILER)
    }
}

impl ShaderCompiler for GlslcCompiler {
    fn name(&self) -> &str {
        &self.program
    }

    fn compile(&self, dir: &Path, job: &CompileJob) -> Result<(), CompileError> {
        let args = self.args(job);
        debug!("{} {} (in {})", self.program, args.join(" "), dir.display());

        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(dir)
            .status()
            .map_err(|source| CompileError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CompileError::Status {
                program: self.program.clone(),
                status,
            })
        }
    }
}
