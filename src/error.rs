use std::num::ParseIntError;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum WebinError {
    #[error("invalid sample id: {0:?}")]
    InvalidSampleId(String),

    #[error("config file not found: {0}")]
    MissingConfig(PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid Webin base URI: {0}")]
    InvalidBaseUri(String),

    #[error("missing Webin credentials (set WEBIN_USERNAME and WEBIN_PASSWORD)")]
    #[diagnostic(help("credentials may also be given as username/password in the config file"))]
    MissingCredentials,

    #[error("Webin client setup failed: {0}")]
    WebinHttp(String),

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Unable to validate unknown sample: {sample_id}")]
    SampleServiceValidation {
        sample_id: String,
        #[source]
        source: SampleError,
    },
}

impl WebinError {
    pub fn sample_service(sample_id: impl Into<String>, source: SampleError) -> Self {
        WebinError::SampleServiceValidation {
            sample_id: sample_id.into(),
            source,
        }
    }
}

/// Root causes behind a failed sample lookup.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Webin returned server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Webin service unreachable: {0}")]
    Unreachable(String),

    #[error("Webin returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Webin request failed: {0}")]
    Request(String),

    #[error("empty sample XML response")]
    EmptyResponse,

    #[error("malformed sample XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("SAMPLE_ATTRIBUTE element has no TAG")]
    MissingTag,

    #[error("invalid TAXON_ID {value:?}")]
    InvalidTaxId {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl SampleError {
    /// Server-side errors and network failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, SampleError::Server { .. } | SampleError::Unreachable(_))
    }
}
