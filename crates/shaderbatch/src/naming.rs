// SPDX-License-Identifier: CEPL-1.0
use std::path::Path;

use crate::Stage;

const SOURCE_EXTENSION: &str = "glsl";
const OUTPUT_SUFFIX: &str = "spv";

fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
}

/// True when the text after the last `.` is exactly `glsl`.
///
/// A name without any `.` is compared whole, so a bare `glsl` entry counts.
pub fn is_candidate(name: &str) -> bool {
    name.rsplit('.').next() == Some(SOURCE_EXTENSION)
}

/// `Vertex` when the file name contains `vert` anywhere, otherwise `Fragment`.
///
/// This is a plain substring test: `inverted.glsl` is a vertex shader.
pub fn infer_stage(name: &str) -> Stage {
    if base_name(name).contains("vert") {
        Stage::Vertex
    } else {
        Stage::Fragment
    }
}

/// First dot-delimited segment of the file name plus `.<stage>.spv`.
pub fn derive_output_name(name: &str, stage: Stage) -> String {
    let stem = base_name(name).split('.').next().unwrap_or_default();
    format!("{stem}.{}.{OUTPUT_SUFFIX}", stage.flag())
}
