//! use pki_fixtures::error::FixtureError;

use thiserror::Error;

/// Represents errors that can occur while building the fixture set.
///
/// Every variant is fatal for the generator binary.
#[derive(Debug, Error, Clone)]
pub enum FixtureError {
    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while constructing or signing a certificate.
    #[error("Certificate error: {0}")]
    CertificateError(String),

    /// A signature did not verify.
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),

    /// Error from RSA PKCS1 operations.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1Error(String),

    /// Error while sealing or opening a PKCS#12 archive.
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// An output file could not be created.
    #[error("Failed to create {path}: {message}")]
    FileCreateError { path: String, message: String },

    /// Writing to an output file failed.
    #[error("Failed to write {path}: {message}")]
    FileWriteError { path: String, message: String },

    /// Flushing or closing an output file failed.
    #[error("Failed to close {path}: {message}")]
    FileCloseError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, FixtureError>;

impl From<der::Error> for FixtureError {
    /// Converts a `der::Error` into a `FixtureError`.
    fn from(err: der::Error) -> Self {
        FixtureError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for FixtureError {
    fn from(err: rsa::Error) -> Self {
        FixtureError::RsaError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for FixtureError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        FixtureError::RsaPkcs1Error(err.to_string())
    }
}

impl From<rsa::pkcs8::spki::Error> for FixtureError {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        FixtureError::EncodingError(err.to_string())
    }
}

impl From<pem::PemError> for FixtureError {
    fn from(err: pem::PemError) -> Self {
        FixtureError::DecodingError(err.to_string())
    }
}

impl From<openssl::error::ErrorStack> for FixtureError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        FixtureError::ArchiveError(err.to_string())
    }
}
