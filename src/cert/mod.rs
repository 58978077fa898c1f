pub mod extensions;
pub mod params;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use der::{Any, Encode};
use x509_cert::certificate::CertificateInner;
use x509_cert::request::CertReq;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::error::{Result, SpidError};
use crate::oid;
use crate::pem_utils;

/// Represents the digest algorithms the profile allows for signatures.
///
/// Signatures are always RSA PKCS#1 v1.5; this enum maps the digest to the
/// matching signature algorithm OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// SHA-256 with RSA encryption.
    #[default]
    Sha256,
    /// SHA-512 with RSA encryption.
    Sha512,
}

impl DigestAlgorithm {
    /// The digest name as reported by the validator (`sha256`, `sha512`).
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SpidError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            other => Err(SpidError::Configuration(format!(
                "Invalid value for digest algorithm ({other})"
            ))),
        }
    }
}

impl From<DigestAlgorithm> for AlgorithmIdentifierOwned {
    /// Converts a `DigestAlgorithm` into the sha*WithRSAEncryption identifier.
    ///
    /// RSA PKCS#1 signature identifiers carry explicit NULL parameters.
    fn from(value: DigestAlgorithm) -> Self {
        let oid = match value {
            DigestAlgorithm::Sha256 => oid::SHA256_WITH_RSA,
            DigestAlgorithm::Sha512 => oid::SHA512_WITH_RSA,
        };
        AlgorithmIdentifierOwned {
            oid,
            parameters: Some(Any::null()),
        }
    }
}

/// Represents a signed X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    pub const PEM_LABEL: &'static str = "CERTIFICATE";

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.to_der()?)
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, Self::PEM_LABEL))
    }

    /// Writes the PEM encoding to `path`, replacing any existing file.
    pub fn write_pem(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_pem()?)?;
        Ok(())
    }
}

/// Represents a signed PKCS#10 certificate signing request.
#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub inner: CertReq,
}

impl CertificateRequest {
    pub const PEM_LABEL: &'static str = "CERTIFICATE REQUEST";

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.to_der()?)
    }

    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, Self::PEM_LABEL))
    }

    pub fn write_pem(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_pem()?)?;
        Ok(())
    }
}
