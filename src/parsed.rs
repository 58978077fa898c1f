//! Read-only view over a decoded certificate or signing request.
//!
//! The checks never look at raw ASN.1; they only see the fields collected
//! here.

use const_oid::ObjectIdentifier;
use der::{Decode, Encode};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::traits::PublicKeyParts;
use x509_cert::certificate::CertificateInner;
use x509_cert::request::{CertReq, ExtensionReq};
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::cert::params::{DistinguishedName, ExtensionSpec, SubjectAttribute};
use crate::error::{Result, SpidError};
use crate::oid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Certificate,
    Request,
}

impl ArtifactKind {
    pub fn pem_label(&self) -> &'static str {
        match self {
            ArtifactKind::Certificate => crate::cert::Certificate::PEM_LABEL,
            ArtifactKind::Request => crate::cert::CertificateRequest::PEM_LABEL,
        }
    }

    pub fn from_pem_label(label: &str) -> Option<Self> {
        [ArtifactKind::Certificate, ArtifactKind::Request]
            .into_iter()
            .find(|kind| kind.pem_label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Other(ObjectIdentifier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    pub algorithm: KeyAlgorithm,
    /// Modulus size, known for RSA keys only.
    pub bits: Option<usize>,
}

impl PublicKeyInfo {
    fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Self {
        if spki.algorithm.oid != oid::RSA_ENCRYPTION {
            return Self {
                algorithm: KeyAlgorithm::Other(spki.algorithm.oid),
                bits: None,
            };
        }
        let bits = RsaPublicKey::from_pkcs1_der(spki.subject_public_key.raw_bytes())
            .ok()
            .map(|key| key.n().bits());
        Self {
            algorithm: KeyAlgorithm::Rsa,
            bits,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedCertificate {
    pub kind: ArtifactKind,
    pub public_key: PublicKeyInfo,
    /// Digest name of the signature algorithm (`sha256`), or the algorithm
    /// OID when no digest is known for it.
    pub digest_algorithm: String,
    pub subject: Vec<SubjectAttribute>,
    pub extensions: Vec<ExtensionSpec>,
}

impl ParsedCertificate {
    pub fn from_certificate(cert: &CertificateInner) -> Self {
        let tbs = &cert.tbs_certificate;
        Self {
            kind: ArtifactKind::Certificate,
            public_key: PublicKeyInfo::from_spki(&tbs.subject_public_key_info),
            digest_algorithm: digest_of(&cert.signature_algorithm),
            subject: DistinguishedName::from_x509_name(&tbs.subject).0,
            extensions: tbs
                .extensions
                .iter()
                .flatten()
                .map(ExtensionSpec::from_x509_extension)
                .collect(),
        }
    }

    /// Builds the view of a CSR; extensions come from its extensionRequest
    /// attribute.
    pub fn from_request(req: &CertReq) -> Result<Self> {
        let mut extensions = Vec::new();
        for attr in req.info.attributes.iter() {
            if attr.oid != oid::EXTENSION_REQUEST {
                continue;
            }
            for value in attr.values.iter() {
                let requested = ExtensionReq::from_der(&value.to_der()?)
                    .map_err(|e| SpidError::Format(format!("invalid extensionRequest: {e}")))?;
                extensions.extend(requested.0.iter().map(ExtensionSpec::from_x509_extension));
            }
        }

        Ok(Self {
            kind: ArtifactKind::Request,
            public_key: PublicKeyInfo::from_spki(&req.info.public_key),
            digest_algorithm: digest_of(&req.algorithm),
            subject: DistinguishedName::from_x509_name(&req.info.subject).0,
            extensions,
        })
    }

    /// Decodes DER according to `kind`.
    pub fn from_der(kind: ArtifactKind, der: &[u8]) -> Result<Self> {
        match kind {
            ArtifactKind::Certificate => {
                let cert = CertificateInner::from_der(der)
                    .map_err(|e| SpidError::Format(e.to_string()))?;
                Ok(Self::from_certificate(&cert))
            }
            ArtifactKind::Request => {
                let req = CertReq::from_der(der).map_err(|e| SpidError::Format(e.to_string()))?;
                Self::from_request(&req)
            }
        }
    }
}

fn digest_of(algorithm: &AlgorithmIdentifierOwned) -> String {
    oid::digest_name(&algorithm.oid)
        .map(str::to_string)
        .unwrap_or_else(|| algorithm.oid.to_string())
}
