//! Error types for the pdfrank library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting and ranking sections.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The run configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The run configuration exists but could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// One or more documents named in the configuration are absent.
    #[error("Missing PDF files: {}", .0.join(", "))]
    MissingDocuments(Vec<String>),

    /// A single document could not be opened or parsed.
    #[error("Failed to read document {document}: {reason}")]
    DocumentRead {
        /// Document file name
        document: String,
        /// Underlying failure
        reason: String,
    },

    /// Nothing left to rank.
    #[error("No content to rank: {0}")]
    EmptyCorpus(String),

    /// Every text in the corpus consisted only of stop words or single characters.
    #[error("Empty vocabulary: corpus contains no indexable terms")]
    EmptyVocabulary,

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error while serializing or writing the report.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error aborts a whole run.
    ///
    /// Only per-document read failures are survivable; the batch continues
    /// with zero sections for that document.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::DocumentRead { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
