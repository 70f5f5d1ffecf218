use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failures surfaced by the loading and analysis layers.
///
/// Unparseable numeric cells are never an error: they become missing
/// values during coercion.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file does not exist or could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing header or a row whose field count differs from the header.
    #[error("malformed CSV {}: {message}", .path.display())]
    Format { path: PathBuf, message: String },

    /// A column name that is not part of the table schema.
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// Two columns that must be index-aligned have different lengths.
    #[error("column length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Empty sample, zero window and similar caller mistakes.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Standardization of a constant sample.
    #[error("division by zero: {0} of a zero-variance sample")]
    DivisionByZero(&'static str),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
