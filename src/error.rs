//! Error types.
//!
//! Two layers:
//!
//! - [`OlsError`]: typed failures of the matrix engine, the fit pipeline and
//!   dataset parsing. Library callers match on these.
//! - [`AppError`]: what the binary reports. It carries the process exit code
//!   and a rendered message.

use thiserror::Error;

/// Exit code for unreadable or malformed input files.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for training/test attribute count disagreement.
pub const EXIT_SCHEMA: u8 = 3;
/// Exit code for numerical failures (shapes, singular Gram matrix, non-finite output).
pub const EXIT_NUMERIC: u8 = 4;

/// Failures of the regression core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OlsError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {op}: {detail}")]
    DimensionMismatch { op: &'static str, detail: String },

    /// The test dataset does not declare the same attribute count as the training dataset.
    #[error(
        "schema mismatch: training data has {training} attribute(s) but test data has {test}"
    )]
    SchemaMismatch { training: usize, test: usize },

    /// Gauss-Jordan elimination hit a zero or near-zero pivot.
    #[error("singular matrix: pivot at row {pivot_row} is {value:e} (tolerance {tolerance:e})")]
    SingularMatrix {
        pivot_row: usize,
        value: f64,
        tolerance: f64,
    },

    /// An input file is missing tokens or holds values that do not parse.
    #[error("malformed input '{source_name}': {message}")]
    MalformedInput {
        source_name: String,
        message: String,
    },

    /// A failure annotated with the pipeline step that produced it.
    #[error("{step}: {source}")]
    InStep {
        step: &'static str,
        #[source]
        source: Box<OlsError>,
    },
}

impl OlsError {
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        OlsError::MalformedInput {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Attach the name of the pipeline step that failed.
    pub fn in_step(self, step: &'static str) -> Self {
        OlsError::InStep {
            step,
            source: Box::new(self),
        }
    }

    /// The underlying failure with any step annotations stripped.
    pub fn root(&self) -> &OlsError {
        match self {
            OlsError::InStep { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            OlsError::MalformedInput { .. } => EXIT_INPUT,
            OlsError::SchemaMismatch { .. } => EXIT_SCHEMA,
            OlsError::DimensionMismatch { .. } | OlsError::SingularMatrix { .. } => EXIT_NUMERIC,
            OlsError::InStep { source, .. } => source.exit_code(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<OlsError> for AppError {
    fn from(err: OlsError) -> Self {
        AppError::new(err.exit_code(), format!("error: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
