// SPDX-License-Identifier: CEPL-1.0
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to list shader directory {}", dir.display())]
    ListDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a single job. Recorded in the report, never fatal to the batch.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Status { program: String, status: ExitStatus },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shaderc: {0}")]
    Shaderc(String),
}
