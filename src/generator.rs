//! Key, CSR and self-signed certificate generation.

use std::path::PathBuf;

use der::asn1::{BitString, SetOfVec};
use der::{Any, Decode, Encode};
use tracing::debug;
use x509_cert::attr::Attribute;
use x509_cert::request::{CertReq, CertReqInfo, ExtensionReq, Version};

use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, CertificatePolicies, KeyUsage, PolicyEntry,
    SubjectKeyIdentifier,
};
use crate::cert::params::{
    CertificateRequestSpec, DistinguishedName, ExtensionSpec, SubjectAttribute, Validity,
};
use crate::cert::{Certificate, CertificateRequest};
use crate::error::{Result, SpidError};
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::{KeyPair, PublicKey};
use crate::oid;
use crate::profile::{self, CertificateProfile, Sector};
use crate::registry::RegistryLookup;
use crate::report::{Artifact, Reporter};

const PUBLIC_ORG_ID_PREFIX: &str = "PA:IT-";

/// Paths of the files written by [`Generator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub key_path: PathBuf,
    pub csr_path: PathBuf,
    /// Only set for the Public sector.
    pub cert_path: Option<PathBuf>,
}

/// Subject attributes in their fixed order; countryName is always `IT`.
pub fn build_subject_name(spec: &CertificateRequestSpec) -> DistinguishedName {
    DistinguishedName(vec![
        SubjectAttribute::new(oid::ORGANIZATION_NAME, &spec.organization_name),
        SubjectAttribute::new(oid::COMMON_NAME, &spec.common_name),
        SubjectAttribute::new(oid::URI, &spec.entity_id),
        SubjectAttribute::new(oid::ORGANIZATION_IDENTIFIER, &spec.organization_identifier),
        SubjectAttribute::new(oid::COUNTRY_NAME, "IT"),
        SubjectAttribute::new(oid::LOCALITY_NAME, &spec.locality_name),
    ])
}

/// The SPID extension set.
///
/// authorityKeyIdentifier is added only when the key certifies itself.
pub fn build_extension_set(
    profile: &CertificateProfile,
    public_key: &PublicKey,
    is_self_signed: bool,
) -> Result<Vec<ExtensionSpec>> {
    let policies = CertificatePolicies {
        policies: profile
            .policies
            .iter()
            .map(|p| PolicyEntry::with_notice(p.oid, p.notice_text))
            .collect(),
    };
    let key_identifier = public_key.key_identifier()?;

    let mut extensions = vec![
        ExtensionSpec::from_extension(
            BasicConstraints {
                is_ca: false,
                max_path_length: None,
            },
            false,
        ),
        ExtensionSpec::from_extension(KeyUsage::spid(), true),
        ExtensionSpec::from_extension(policies, false),
        ExtensionSpec::from_extension(
            SubjectKeyIdentifier {
                key_identifier: key_identifier.clone(),
            },
            false,
        ),
    ];
    if is_self_signed {
        extensions.push(ExtensionSpec::from_extension(
            AuthorityKeyIdentifier { key_identifier },
            false,
        ));
    }

    Ok(extensions)
}

/// Builds, signs and writes the PKCS#10 request.
pub fn generate_csr(
    profile: &CertificateProfile,
    spec: &CertificateRequestSpec,
    key: &KeyPair,
) -> Result<CertificateRequest> {
    let public_key = key.public_key();
    let extensions = build_extension_set(profile, &public_key, false)?
        .iter()
        .map(ExtensionSpec::to_x509_extension)
        .collect::<Result<Vec<_>>>()?;

    let extension_request = Attribute {
        oid: oid::EXTENSION_REQUEST,
        values: SetOfVec::try_from(vec![Any::from_der(&ExtensionReq(extensions).to_der()?)?])?,
    };

    let info = CertReqInfo {
        version: Version::V1,
        subject: build_subject_name(spec).to_x509_name()?,
        public_key: public_key.to_spki()?,
        attributes: SetOfVec::try_from(vec![extension_request])?,
    };

    let signature = key.sign_data(&info.to_der()?, spec.digest_algorithm)?;
    let request = CertificateRequest {
        inner: CertReq {
            info,
            algorithm: spec.digest_algorithm.into(),
            signature: BitString::from_bytes(&signature)?,
        },
    };

    request.write_pem(&spec.csr_output_path)?;
    Ok(request)
}

/// Builds, signs and writes a certificate whose issuer is its subject.
pub fn generate_self_signed(
    profile: &CertificateProfile,
    spec: &CertificateRequestSpec,
    key: &KeyPair,
) -> Result<Certificate> {
    let subject = build_subject_name(spec);
    let public_key = key.public_key();
    let extensions = build_extension_set(profile, &public_key, true)?;

    let issuer = SelfIssuer::new(&subject, key, spec.digest_algorithm);
    let certificate = issuer.issue(
        &subject,
        public_key,
        Validity::for_days(spec.validity_days)?,
        extensions,
    )?;

    certificate.write_pem(&spec.cert_output_path)?;
    Ok(certificate)
}

/// Rejects a request the profile can never accept, before any I/O.
pub fn validate_request(profile: &CertificateProfile, spec: &CertificateRequestSpec) -> Result<()> {
    if !profile.allows_digest(spec.digest_algorithm.name()) {
        return Err(SpidError::Configuration(format!(
            "Invalid value for digest algorithm ({})",
            spec.digest_algorithm
        )));
    }
    if !profile.allows_key_size(spec.key_size) {
        return Err(SpidError::Configuration(format!(
            "Invalid value for key size ({})",
            spec.key_size
        )));
    }
    if !profile.organization_identifier.is_match(&spec.organization_identifier) {
        return Err(SpidError::Configuration(format!(
            "Invalid value for organization identifier ({})",
            spec.organization_identifier
        )));
    }
    Validity::for_days(spec.validity_days)?;
    Ok(())
}

/// Runs the whole generation pipeline.
///
/// Steps run in order and the first error aborts; files already written
/// are left in place.
pub struct Generator<'a> {
    reporter: &'a dyn Reporter,
    registry: &'a dyn RegistryLookup,
}

impl<'a> Generator<'a> {
    pub fn new(reporter: &'a dyn Reporter, registry: &'a dyn RegistryLookup) -> Self {
        Self { reporter, registry }
    }

    pub fn generate(&self, spec: &CertificateRequestSpec) -> Result<GeneratedArtifacts> {
        let profile = profile::resolve(spec.sector);
        validate_request(&profile, spec)?;

        if spec.sector == Sector::Public {
            self.check_registry(&spec.organization_identifier)?;
        }

        if spec.key_output_path.exists() {
            return Err(SpidError::FileExists(spec.key_output_path.clone()));
        }
        debug!(bits = spec.key_size, "generating RSA key");
        let key = KeyPair::generate_rsa(spec.key_size)?;
        key.write_pkcs1_pem(&spec.key_output_path)?;
        self.reporter
            .artifact_written(Artifact::PrivateKey, &spec.key_output_path);

        generate_csr(&profile, spec, &key)?;
        self.reporter
            .artifact_written(Artifact::Request, &spec.csr_output_path);

        let cert_path = if spec.sector == Sector::Public {
            generate_self_signed(&profile, spec, &key)?;
            self.reporter
                .artifact_written(Artifact::Certificate, &spec.cert_output_path);
            Some(spec.cert_output_path.clone())
        } else {
            None
        };

        Ok(GeneratedArtifacts {
            key_path: spec.key_output_path.clone(),
            csr_path: spec.csr_output_path.clone(),
            cert_path,
        })
    }

    fn check_registry(&self, organization_identifier: &str) -> Result<()> {
        let code = organization_identifier
            .strip_prefix(PUBLIC_ORG_ID_PREFIX)
            .unwrap_or(organization_identifier);

        if self.registry.lookup(code)? {
            return Ok(());
        }

        let mut message = format!("The IPA code ({code}) refers to something that does not exist.");
        if let Some(url) = self.registry.detail_url(code) {
            message.push_str(&format!(" Check it by yourself at {url}"));
        }
        Err(SpidError::ExternalLookup(message))
    }
}
