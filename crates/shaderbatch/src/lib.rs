// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
//! Batch compilation of `.glsl` sources into SPIR-V.
//!
//! A [`BatchCompiler`] lists one directory, turns every `*.glsl` entry into a
//! [`CompileJob`] and hands each job to a [`ShaderCompiler`] backend. Jobs run
//! one after another and a failing job never stops the batch.

use std::fmt;
use std::path::Path;

mod batch;
mod error;
mod glslc;
mod naming;
#[cfg(feature = "shaderc")]
mod shaderc_backend;

pub use batch::{
    BatchCompiler, BatchConfig, BatchReport, Collision, JobOutcome, DEFAULT_COMPILER,
};
pub use error::{BatchError, CompileError};
pub use glslc::GlslcCompiler;
pub use naming::{derive_output_name, infer_stage, is_candidate};
#[cfg(feature = "shaderc")]
pub use shaderc_backend::ShadercCompiler;

/// Pipeline stage a source file is compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// Short spelling used in `-fshader-stage=` and in output file names.
    pub fn flag(self) -> &'static str {
        match self {
            Stage::Vertex => "vert",
            Stage::Fragment => "frag",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// One source file to compile. Both names are relative to the batch directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileJob {
    pub source: String,
    pub stage: Stage,
    pub output: String,
}

impl CompileJob {
    /// Build the job for `name`, or `None` when it is not a `.glsl` entry.
    pub fn for_entry(name: &str) -> Option<Self> {
        if !is_candidate(name) {
            return None;
        }
        let stage = infer_stage(name);
        Some(CompileJob {
            source: name.to_owned(),
            stage,
            output: derive_output_name(name, stage),
        })
    }
}

/// A way of turning one GLSL source into SPIR-V.
pub trait ShaderCompiler {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Compile `dir/job.source` into `dir/job.output`.
    fn compile(&self, dir: &Path, job: &CompileJob) -> Result<(), CompileError>;
}

impl<C: ShaderCompiler + ?Sized> ShaderCompiler for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(&self, dir: &Path, job: &CompileJob) -> Result<(), CompileError> {
        (**self).compile(dir, job)
    }
}
