//! use spid_certs::error::SpidError;

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpidError>;

/// Represents errors that can occur while generating or validating
/// SPID certificates.
///
/// Generation errors are fatal and abort the remaining pipeline steps;
/// validation collects every nonconformity and surfaces them all through
/// [`SpidError::ValidationFailure`].
#[derive(Debug, Error, Clone)]
pub enum SpidError {
    /// The requested sector is neither `public` nor `private`.
    #[error("Invalid value for sector ({0})")]
    InvalidSector(String),

    /// The request is malformed and was rejected before any I/O.
    #[error("{0}")]
    Configuration(String),

    /// The private key output path already exists.
    #[error("File {} already exists", .0.display())]
    FileExists(PathBuf),

    /// The input is not a well-formed certificate envelope.
    #[error("Invalid certificate format: {0}")]
    Format(String),

    /// The crypto provider rejected a signing request.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The organization code registry could not confirm the code.
    #[error("{0}")]
    ExternalLookup(String),

    /// One or more compliance checks failed.
    #[error("The certificate does not match {sector} sector specifications ({} failures)", .diagnostics.len())]
    ValidationFailure {
        sector: String,
        diagnostics: Vec<String>,
    },

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Error while encoding or decoding ASN.1 DER.
    #[error("DER error: {0}")]
    Der(String),

    /// Error from RSA PKCS1 operations.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1(String),

    /// Error reading or writing an artifact.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<der::Error> for SpidError {
    fn from(err: der::Error) -> Self {
        SpidError::Der(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for SpidError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        SpidError::RsaPkcs1(err.to_string())
    }
}

impl From<std::io::Error> for SpidError {
    fn from(err: std::io::Error) -> Self {
        SpidError::Io(err.to_string())
    }
}
