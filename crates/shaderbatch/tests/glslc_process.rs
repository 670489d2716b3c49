// SPDX-License-Identifier: CEPL-1.0
#![cfg(unix)]
//! Drives the real process backend against stub compilers written as shell scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use shaderbatch::{BatchCompiler, BatchConfig, CompileError, GlslcCompiler};
use tempfile::TempDir;

fn write_stub(tools: &Path, name: &str, body: &str) -> PathBuf {
    let path = tools.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stub that records its arguments and creates the `-o` target.
fn recording_stub(tools: &Path, log: &Path) -> PathBuf {
    write_stub(
        tools,
        "fake-glslc",
        &format!(
            "printf '%s\\n' \"$*\" >> '{}'\ntouch \"$4\"",
            log.display()
        ),
    )
}

fn shader_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for n in names {
        fs::write(dir.path().join(n), "#version 450\nvoid main() {}\n").unwrap();
    }
    dir
}

fn logged_calls(log: &Path) -> Vec<String> {
    let mut lines: Vec<String> = fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect();
    lines.sort();
    lines
}

#[test]
fn invokes_compiler_once_per_glsl_file() {
    let tools = tempfile::tempdir().unwrap();
    let log = tools.path().join("calls.log");
    let stub = recording_stub(tools.path(), &log);
    let shaders = shader_dir(&["a.vert.glsl", "b.frag.glsl", "readme.md"]);

    let cfg = BatchConfig {
        compiler: stub.display().to_string(),
        directory: shaders.path().to_path_buf(),
    };
    let report = BatchCompiler::from_config(&cfg).run().unwrap();

    assert_eq!(
        logged_calls(&log),
        [
            "-fshader-stage=frag b.frag.glsl -o b.frag.spv",
            "-fshader-stage=vert a.vert.glsl -o a.vert.spv",
        ]
    );
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.skipped, ["readme.md"]);
    assert!(shaders.path().join("a.vert.spv").exists());
    assert!(shaders.path().join("b.frag.spv").exists());
    assert!(!shaders.path().join("readme.vert.spv").exists());
    assert!(!shaders.path().join("readme.frag.spv").exists());
}

#[test]
fn failing_compiler_still_visits_every_candidate() {
    let tools = tempfile::tempdir().unwrap();
    let log = tools.path().join("calls.log");
    let stub = write_stub(
        tools.path(),
        "broken-glslc",
        &format!("echo \"$2\" >> '{}'\nexit 1", log.display()),
    );
    let shaders = shader_dir(&["a.vert.glsl", "b.frag.glsl", "c.glsl", "notes.txt"]);

    let batch = BatchCompiler::new(shaders.path(), GlslcCompiler::new(stub.display().to_string()));
    let report = batch.run().unwrap();

    assert_eq!(logged_calls(&log), ["a.vert.glsl", "b.frag.glsl", "c.glsl"]);
    assert_eq!(report.failed(), 3);
    for outcome in report.failures() {
        match &outcome.result {
            Err(CompileError::Status { status, .. }) => assert_eq!(status.code(), Some(1)),
            other => panic!("unexpected outcome for {}: {other:?}", outcome.job.source),
        }
    }
}

#[test]
fn missing_compiler_fails_each_job_without_aborting() {
    let shaders = shader_dir(&["a.vert.glsl", "b.frag.glsl"]);
    let missing = shaders.path().join("no-such-glslc");

    let batch = BatchCompiler::new(
        shaders.path(),
        GlslcCompiler::new(missing.display().to_string()),
    );
    let report = batch.run().unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o.result, Err(CompileError::Spawn { .. }))));
}

/// Same file, spelled relative to the test's working directory.
fn relative_to_cwd(path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap();
    let mut rel = PathBuf::new();
    for _ in cwd.components().skip(1) {
        rel.push("..");
    }
    rel.join(path.strip_prefix("/").unwrap())
}

#[test]
fn relative_compiler_path_resolves_from_caller_directory() {
    let tools = tempfile::tempdir().unwrap();
    let log = tools.path().join("calls.log");
    let stub = recording_stub(tools.path(), &log);
    let shaders = shader_dir(&["a.vert.glsl"]);

    let rel = relative_to_cwd(&stub);
    assert!(rel.is_relative());
    let compiler = GlslcCompiler::new(rel.display().to_string());
    let report = BatchCompiler::new(shaders.path(), compiler).run().unwrap();

    assert_eq!(report.failed(), 0, "{:?}", report.outcomes);
    assert_eq!(
        logged_calls(&log),
        ["-fshader-stage=vert a.vert.glsl -o a.vert.spv"]
    );
    assert!(shaders.path().join("a.vert.spv").exists());
}

#[test]
fn extra_args_reach_the_compiler() {
    let tools = tempfile::tempdir().unwrap();
    let log = tools.path().join("calls.log");
    let stub = recording_stub(tools.path(), &log);
    let shaders = shader_dir(&["quad.glsl"]);

    let compiler = GlslcCompiler::new(stub.display().to_string())
        .with_extra_args(["--target-env=vulkan1.2"]);
    BatchCompiler::new(shaders.path(), compiler).run().unwrap();

    assert_eq!(
        logged_calls(&log),
        ["-fshader-stage=frag quad.glsl -o quad.frag.spv --target-env=vulkan1.2"]
    );
}
