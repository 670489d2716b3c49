// SPDX-License-Identifier: CEPL-1.0
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::{BatchError, CompileError, CompileJob, GlslcCompiler, ShaderCompiler};

pub const DEFAULT_COMPILER: &str = "glslc";

/// Where to compile and with which external program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// External compiler program. Defaults to `glslc`.
    pub compiler: String,
    /// Directory that is listed and written to. Defaults to the directory of
    /// the running executable, or `.` when that cannot be determined.
    pub directory: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            compiler: DEFAULT_COMPILER.to_owned(),
            directory: executable_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

fn executable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

#[derive(Debug)]
pub struct JobOutcome {
    pub job: CompileJob,
    pub result: Result<(), CompileError>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Two sources in one run that map to the same output. The later one wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collision {
    pub output: String,
    pub first: String,
    pub second: String,
}

/// Everything that happened during one [`BatchCompiler::run`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
    /// Entries that are not `.glsl` sources.
    pub skipped: Vec<String>,
    pub collisions: Vec<Collision>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}

/// Compiles every `.glsl` entry of one directory, sequentially.
pub struct BatchCompiler<C> {
    dir: PathBuf,
    compiler: C,
}

impl BatchCompiler<GlslcCompiler> {
    pub fn from_config(cfg: &BatchConfig) -> Self {
        BatchCompiler::new(cfg.directory.clone(), GlslcCompiler::new(cfg.compiler.clone()))
    }
}

impl<C: ShaderCompiler> BatchCompiler<C> {
    pub fn new(dir: impl Into<PathBuf>, compiler: C) -> Self {
        BatchCompiler {
            dir: dir.into(),
            compiler,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Names of every entry in the directory, files and subdirectories alike,
    /// in the order the filesystem returns them.
    pub fn list_entries(&self) -> Result<Vec<String>, BatchError> {
        let list_err = |source| BatchError::ListDir {
            dir: self.dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("skipping non UTF-8 entry {raw:?}"),
            }
        }
        Ok(names)
    }

    /// Compile one job and log how it went.
    pub fn compile(&self, job: &CompileJob) -> Result<(), CompileError> {
        info!("compiling shader: {} ({})", job.source, job.stage);
        let res = self.compiler.compile(&self.dir, job);
        match &res {
            Ok(()) => info!("\tcreated spv file: {}", job.output),
            Err(e) => error!("{}: {e}", job.source),
        }
        res
    }

    /// List, filter and compile. Only a listing failure is returned as `Err`;
    /// job failures are collected in the report and never stop the loop.
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        info!(
            "compiling shaders in {} with {}",
            self.dir.display(),
            self.compiler.name()
        );

        let mut report = BatchReport::default();
        let mut seen: HashMap<String, String> = HashMap::new();

        for name in self.list_entries()? {
            let Some(job) = CompileJob::for_entry(&name) else {
                debug!("skipping {name}");
                report.skipped.push(name);
                continue;
            };

            if let Some(first) = seen.insert(job.output.clone(), job.source.clone()) {
                warn!(
                    "{} and {} both compile to {}; the latter overwrites",
                    first, job.source, job.output
                );
                report.collisions.push(Collision {
                    output: job.output.clone(),
                    first,
                    second: job.source.clone(),
                });
            }

            let result = self.compile(&job);
            report.outcomes.push(JobOutcome { job, result });
        }

        info!(
            "{} compiled, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped.len()
        );
        Ok(report)
    }
}
