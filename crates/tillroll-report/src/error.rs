//! Error types for file codecs and report rendering.

use thiserror::Error;

/// Errors raised while importing records from a file.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file extension maps to no supported codec.
    #[error("unsupported file type '{0}', expected .csv or .xlsx")]
    UnsupportedFile(String),

    /// The header row lacks one or more required columns.
    #[error("file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The file could not be decoded as its claimed format.
    #[error("could not read file: {0}")]
    Container(String),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while exporting records to a file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The file could not be encoded or written.
    #[error("could not write file: {0}")]
    Container(String),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while assembling the PDF report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A supplied logo image could not be decoded.
    #[error("could not decode logo image: {0}")]
    Logo(String),

    /// PDF assembly failed.
    #[error("pdf assembly failed: {0}")]
    Pdf(String),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
