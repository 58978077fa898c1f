use der::Encode;
use der::asn1::BitString;
use x509_cert::certificate::CertificateInner;

use crate::cert::params::{DistinguishedName, ExtensionSpec, Validity};
use crate::cert::{Certificate, DigestAlgorithm};
use crate::error::Result;
use crate::key::{KeyPair, PublicKey};
use crate::tbs_certificate::{TbsCertificate, random_serial_number};

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> &DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the digest used for signatures.
    fn digest(&self) -> DigestAlgorithm;

    /// Issues a certificate for `subject` with a fresh random serial number.
    ///
    /// # Arguments
    /// * `subject` - The distinguished name of the certified entity.
    /// * `subject_public_key` - The key being certified.
    /// * `validity` - The validity period.
    /// * `extensions` - The extensions to embed, in order.
    fn issue(
        &self,
        subject: &DistinguishedName,
        subject_public_key: PublicKey,
        validity: Validity,
        extensions: Vec<ExtensionSpec>,
    ) -> Result<Certificate> {
        let tbs_cert = TbsCertificate {
            serial_number: random_serial_number(),
            digest_algorithm: self.digest(),
            issuer: self.issuer_name().clone(),
            validity,
            subject: subject.clone(),
            subject_public_key,
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let signature = self
            .signing_key()
            .sign_data(&tbs_cert_inner.to_der()?, self.digest())?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: self.digest().into(),
            signature: BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// An issuer whose name is the subject it certifies.
pub struct SelfIssuer<'a> {
    name: &'a DistinguishedName,
    key: &'a KeyPair,
    digest: DigestAlgorithm,
}

impl<'a> SelfIssuer<'a> {
    pub fn new(name: &'a DistinguishedName, key: &'a KeyPair, digest: DigestAlgorithm) -> Self {
        Self { name, key, digest }
    }
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> &DistinguishedName {
        self.name
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn digest(&self) -> DigestAlgorithm {
        self.digest
    }
}
