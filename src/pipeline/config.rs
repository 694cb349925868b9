//! Run configuration: who is reading, what they need, and which documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Persona role used when the configuration names none.
pub const DEFAULT_PERSONA: &str = "General Researcher";

/// Task used when the configuration names none.
pub const DEFAULT_TASK: &str = "Summarize key insights from documents";

/// The persona the analysis is performed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default = "default_role")]
    pub role: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            role: default_role(),
        }
    }
}

/// The task sections are ranked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobToBeDone {
    #[serde(default = "default_task")]
    pub task: String,
}

impl Default for JobToBeDone {
    fn default() -> Self {
        Self {
            task: default_task(),
        }
    }
}

fn default_role() -> String {
    DEFAULT_PERSONA.to_string()
}

fn default_task() -> String {
    DEFAULT_TASK.to_string()
}

/// A document named by the configuration.
///
/// Accepts either a bare file name or an object with `filename` and an
/// optional `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DocumentForm")]
pub struct DocumentEntry {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentForm {
    Name(String),
    Entry {
        filename: String,
        #[serde(default)]
        title: Option<String>,
    },
}

impl From<DocumentForm> for DocumentEntry {
    fn from(form: DocumentForm) -> Self {
        match form {
            DocumentForm::Name(filename) => DocumentEntry::new(filename),
            DocumentForm::Entry { filename, title } => DocumentEntry { filename, title },
        }
    }
}

impl DocumentEntry {
    /// Create an entry without a title.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: None,
        }
    }
}

/// Parsed run configuration. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub job_to_be_done: JobToBeDone,
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
}

impl AnalysisConfig {
    /// Build a configuration in code.
    pub fn new<I, S>(persona: impl Into<String>, task: impl Into<String>, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            persona: Persona {
                role: persona.into(),
            },
            job_to_be_done: JobToBeDone { task: task.into() },
            documents: documents.into_iter().map(DocumentEntry::new).collect(),
        }
    }

    /// Load a configuration file.
    ///
    /// Fails with [`Error::ConfigNotFound`] if the file does not exist and
    /// [`Error::Config`] if it is not valid JSON of the expected shape.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Persona role.
    pub fn persona_role(&self) -> &str {
        &self.persona.role
    }

    /// Task description.
    pub fn task(&self) -> &str {
        &self.job_to_be_done.task
    }

    /// Document file names in configuration order.
    pub fn document_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}
