// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use anyhow::{bail, Context, Result};
use clap::Parser;
use shaderbatch::{BatchCompiler, BatchConfig, GlslcCompiler, ShaderCompiler};
use shaderbatch_core::init_tracing;
use tracing::{info, warn};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the .glsl sources; outputs land next to them
    #[arg(long)]
    dir: Option<PathBuf>,
    /// External compiler program (glslc backend)
    #[arg(long)]
    compiler: Option<String>,
    /// Choose compiler backend: glslc | shaderc
    #[arg(long)]
    backend: Option<String>,
    /// Config file; missing or malformed means defaults
    #[arg(long, default_value = "shaderbatch.toml")]
    config: PathBuf,
    /// Exit with an error when any shader fails to compile
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
enum Backend {
    #[default]
    Glslc,
    Shaderc,
}

impl Backend {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "glslc" => Ok(Backend::Glslc),
            "shaderc" => Ok(Backend::Shaderc),
            other => bail!("unknown backend `{other}` (expected glslc | shaderc)"),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct BatchCfg {
    #[serde(default)]
    compiler: Option<String>,
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default)]
    backend: Backend,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    extra_args: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct AppCfg {
    #[serde(default)]
    batch: BatchCfg,
}

fn load_cfg(path: &Path) -> AppCfg {
    match fs::read_to_string(path) {
        Ok(s) => toml::from_str::<AppCfg>(&s).unwrap_or_else(|e| {
            warn!("ignoring {}: {e}", path.display());
            AppCfg::default()
        }),
        Err(_) => AppCfg::default(),
    }
}

/// CLI flags over config file over built-in defaults.
#[derive(Debug)]
struct Settings {
    batch: BatchConfig,
    backend: Backend,
    strict: bool,
    extra_args: Vec<String>,
    /// Neither `--dir` nor the config file named a directory.
    default_dir: bool,
}

fn resolve(args: Args, cfg: AppCfg) -> Result<Settings> {
    let defaults = BatchConfig::default();
    let backend = match args.backend.as_deref() {
        Some(s) => Backend::parse(s)?,
        None => cfg.batch.backend,
    };

    let default_dir = args.dir.is_none() && cfg.batch.directory.is_none();

    Ok(Settings {
        batch: BatchConfig {
            compiler: args
                .compiler
                .or(cfg.batch.compiler)
                .unwrap_or(defaults.compiler),
            directory: args
                .dir
                .or(cfg.batch.directory)
                .unwrap_or(defaults.directory),
        },
        backend,
        strict: args.strict || cfg.batch.strict,
        extra_args: cfg.batch.extra_args,
        default_dir,
    })
}

fn make_compiler(settings: &Settings) -> Result<Box<dyn ShaderCompiler>> {
    match settings.backend {
        Backend::Glslc => Ok(Box::new(
            GlslcCompiler::new(settings.batch.compiler.clone())
                .with_extra_args(settings.extra_args.iter().cloned()),
        )),
        #[cfg(feature = "shaderc")]
        Backend::Shaderc => Ok(Box::new(
            shaderbatch::ShadercCompiler::new().context("shaderc init")?,
        )),
        #[cfg(not(feature = "shaderc"))]
        Backend::Shaderc => bail!("shaderbatch was built without the `shaderc` feature"),
    }
}

fn run(settings: Settings) -> Result<()> {
    if settings.default_dir {
        info!(
            "no shader directory given; using executable directory {}",
            settings.batch.directory.display()
        );
    }
    info!("backend = {:?}", settings.backend);
    let compiler = make_compiler(&settings)?;
    let batch = BatchCompiler::new(settings.batch.directory, compiler);

    let report = batch
        .run()
        .with_context(|| format!("compiling shaders in {}", batch.directory().display()))?;

    if settings.strict && report.failed() > 0 {
        bail!(
            "{} of {} shaders failed to compile",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing("info");
    let args = Args::parse();
    let cfg = load_cfg(&args.config);
    run(resolve(args, cfg)?)
}
