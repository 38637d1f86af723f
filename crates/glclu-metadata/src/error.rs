//! Error types for GLCLU metadata generation.

use thiserror::Error;

/// Result type alias using MetadataError.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Primary error type for metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    // === Href template errors ===
    #[error("Href template missing required parameters: {}. Required parameters are: version, year", .missing.join(", "))]
    MissingPlaceholders { missing: Vec<String> },

    #[error("Invalid href template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Could not parse the provided href ({href}) using the href template: {template}")]
    HrefMismatch { href: String, template: String },

    #[error("No matching collection found for href: {0}")]
    NoMatchingCollection(String),

    #[error(
        "The year field cannot be parsed into either the annual or change format: {0}. \
         Accepted formats: a 4-digit year (e.g. 2000) or <start>-<end>change (e.g. 2000-2020change)"
    )]
    YearFormat(String),

    // === Media type errors ===
    #[error("Either provide a media type or a sample asset href in order to determine the media type")]
    MediaTypeUnresolvable,

    #[error("Could not identify media type for {href}: {message}")]
    MediaTypeDetection { href: String, message: String },

    // === Classification table errors ===
    #[error("Classification table line {line}: {message}")]
    ClassificationTable { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
