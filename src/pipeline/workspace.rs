//! Input and output directory resolution.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Container fallback for the input directory.
pub const FALLBACK_INPUT_DIR: &str = "/app/input";

/// Container fallback for the output directory.
pub const FALLBACK_OUTPUT_DIR: &str = "/app/output";

/// Name of the report file written to the output directory.
pub const REPORT_FILE_NAME: &str = "analysis.json";

/// Where documents are read from and the report is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Workspace {
    /// Use explicit directories.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Resolve directories relative to `base`.
    ///
    /// Each directory is `base/input` (or `base/output`) when it exists, the
    /// container fallback when that exists instead, and `base/input` otherwise.
    pub fn resolve<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            input_dir: first_existing(base.join("input"), FALLBACK_INPUT_DIR),
            output_dir: first_existing(base.join("output"), FALLBACK_OUTPUT_DIR),
        }
    }

    /// Create the output directory if needed.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Path of a named document.
    pub fn document_path(&self, filename: &str) -> PathBuf {
        self.input_dir.join(filename)
    }

    /// Names from `filenames` with no file in the input directory, in order.
    pub fn missing_documents<S: AsRef<str>>(&self, filenames: &[S]) -> Vec<String> {
        filenames
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.document_path(name).is_file())
            .map(str::to_string)
            .collect()
    }

    /// Path of the report file.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }
}

fn first_existing(local: PathBuf, fallback: &str) -> PathBuf {
    if local.is_dir() {
        return local;
    }
    let fallback = PathBuf::from(fallback);
    if fallback.is_dir() {
        fallback
    } else {
        local
    }
}
