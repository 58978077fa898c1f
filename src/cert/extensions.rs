use const_oid::AssociatedOid;
pub use der::flagset::FlagSet;
use der::{
    Any, Decode, Encode, Tag, Tagged,
    asn1::{ObjectIdentifier, OctetString},
};
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;
use x509_cert::ext::pkix::certpolicy::{
    DisplayText, PolicyInformation, PolicyQualifierInfo, UserNotice,
};

use crate::error::SpidError;
use crate::oid;

/// Trait for converting to and from X.509 extensions.
///
/// This trait provides methods to encode and decode X.509 extension values.
///
/// # Example
/// ```
/// use spid_certs::cert::extensions::{BasicConstraints, ToAndFromX509Extension};
/// let bc = BasicConstraints { is_ca: false, max_path_length: None };
/// let encoded = bc.to_x509_extension_value().unwrap();
/// let decoded = BasicConstraints::from_x509_extension_value(&encoded).unwrap();
/// assert!(!decoded.is_ca);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>, SpidError>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, SpidError>
    where
        Self: Sized;
}

/// Represents the Basic Constraints extension.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The maximum number of intermediate CAs allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u32>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, SpidError> {
        let path_len_constraint = self
            .max_path_length
            .map(|v| {
                u8::try_from(v).map_err(|_| {
                    SpidError::Configuration(format!("Invalid value for max path length ({v})"))
                })
            })
            .transpose()?;
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint,
        };

        Ok(bc.to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self, SpidError> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint.map(u32::from),
        })
    }
}

/// Represents the Key Usage extension.
///
/// This extension defines the purpose of the key contained in the certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    /// digitalSignature + contentCommitment (nonRepudiation), nothing else.
    pub fn spid() -> Self {
        KeyUsage(KeyUsages::DigitalSignature | KeyUsages::NonRepudiation)
    }

    pub fn contains(&self, usage: KeyUsages) -> bool {
        self.0.contains(usage)
    }
}

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, SpidError> {
        Ok(X509KeyUsage(self.0).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, SpidError> {
        let ku = X509KeyUsage::from_der(extension)?;
        Ok(Self(ku.0))
    }
}

/// One entry of the Certificate Policies extension.
///
/// # Fields
/// * `oid` - The policy identifier.
/// * `explicit_texts` - The explicit text of every UserNotice qualifier that
///   carries one, in encoding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry {
    pub oid: ObjectIdentifier,
    pub explicit_texts: Vec<String>,
}

impl PolicyEntry {
    pub fn with_notice(oid: ObjectIdentifier, text: impl Into<String>) -> Self {
        Self {
            oid,
            explicit_texts: vec![text.into()],
        }
    }
}

/// Represents the Certificate Policies extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertificatePolicies {
    pub policies: Vec<PolicyEntry>,
}

impl CertificatePolicies {
    pub fn get(&self, oid: &ObjectIdentifier) -> Option<&PolicyEntry> {
        self.policies.iter().find(|p| p.oid == *oid)
    }
}

impl ToAndFromX509Extension for CertificatePolicies {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::CertificatePolicies::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, SpidError> {
        let policies = self
            .policies
            .iter()
            .map(|entry| {
                let qualifiers = entry
                    .explicit_texts
                    .iter()
                    .map(|text| {
                        let notice = UserNotice {
                            notice_ref: None,
                            explicit_text: Some(DisplayText::Utf8String(text.clone())),
                        };
                        Ok(PolicyQualifierInfo {
                            policy_qualifier_id: oid::USER_NOTICE_QUALIFIER,
                            qualifier: Some(Any::from_der(&notice.to_der()?)?),
                        })
                    })
                    .collect::<Result<Vec<_>, SpidError>>()?;

                Ok(PolicyInformation {
                    policy_identifier: entry.oid,
                    policy_qualifiers: (!qualifiers.is_empty()).then_some(qualifiers),
                })
            })
            .collect::<Result<Vec<_>, SpidError>>()?;

        Ok(x509_cert::ext::pkix::CertificatePolicies(policies).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, SpidError> {
        let decoded = x509_cert::ext::pkix::CertificatePolicies::from_der(extension)?;

        let policies = decoded
            .0
            .iter()
            .map(|info| {
                let mut explicit_texts = Vec::new();
                for qualifier in info.policy_qualifiers.iter().flatten() {
                    if qualifier.policy_qualifier_id != oid::USER_NOTICE_QUALIFIER {
                        continue;
                    }
                    if let Some(notice) = &qualifier.qualifier {
                        explicit_texts.extend(user_notice_explicit_text(notice)?);
                    }
                }
                Ok(PolicyEntry {
                    oid: info.policy_identifier,
                    explicit_texts,
                })
            })
            .collect::<Result<Vec<_>, SpidError>>()?;

        Ok(Self { policies })
    }
}

/// Extracts the explicitText of a UserNotice.
///
/// The notice is read field by field so that every DisplayText flavour
/// (IA5String, VisibleString, BMPString, UTF8String) is accepted.
fn user_notice_explicit_text(notice: &Any) -> Result<Option<String>, SpidError> {
    let fields = Vec::<Any>::from_der(&notice.to_der()?)?;
    Ok(fields.iter().find_map(decode_string))
}

pub(crate) fn decode_string(field: &Any) -> Option<String> {
    match field.tag() {
        Tag::Utf8String
        | Tag::Ia5String
        | Tag::VisibleString
        | Tag::PrintableString
        | Tag::TeletexString => {
            std::str::from_utf8(field.value()).ok().map(str::to_string)
        }
        Tag::BmpString => {
            if field.value().len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = field
                .value()
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        _ => None,
    }
}

/// Represents the Subject Key Identifier extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, SpidError> {
        let ski =
            x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(self.key_identifier.as_slice())?);
        Ok(ski.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, SpidError> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: ski.0.as_bytes().to_vec(),
        })
    }
}

/// Represents the Authority Key Identifier (AKI) extension.
///
/// Only the keyIdentifier form is produced; issuer name and serial are
/// omitted, as for an identifier derived straight from the issuer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, SpidError> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(self.key_identifier.as_slice())?),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };

        Ok(aki.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, SpidError> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: aki
                .key_identifier
                .map(|id| id.as_bytes().to_vec())
                .unwrap_or_default(),
        })
    }
}

/// Discriminator used to look extensions up in an extension list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    BasicConstraints,
    KeyUsage,
    CertificatePolicies,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    Other,
}

impl ExtensionKind {
    pub fn from_oid(oid: &ObjectIdentifier) -> Self {
        match *oid {
            oid::BASIC_CONSTRAINTS => ExtensionKind::BasicConstraints,
            oid::KEY_USAGE => ExtensionKind::KeyUsage,
            oid::CERTIFICATE_POLICIES => ExtensionKind::CertificatePolicies,
            oid::SUBJECT_KEY_IDENTIFIER => ExtensionKind::SubjectKeyIdentifier,
            oid::AUTHORITY_KEY_IDENTIFIER => ExtensionKind::AuthorityKeyIdentifier,
            _ => ExtensionKind::Other,
        }
    }

    /// The RFC 5280 name, as printed in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExtensionKind::BasicConstraints => "basicConstraints",
            ExtensionKind::KeyUsage => "keyUsage",
            ExtensionKind::CertificatePolicies => "certificatePolicies",
            ExtensionKind::SubjectKeyIdentifier => "subjectKeyIdentifier",
            ExtensionKind::AuthorityKeyIdentifier => "authorityKeyIdentifier",
            ExtensionKind::Other => "unknown",
        }
    }
}

/// Typed content of an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionContent {
    BasicConstraints(BasicConstraints),
    KeyUsage(KeyUsage),
    CertificatePolicies(CertificatePolicies),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// A known extension whose value failed to decode.
    Malformed(String),
    /// An extension outside the profile, kept as raw DER.
    Other(Vec<u8>),
}

impl ExtensionContent {
    /// Decodes a DER extension value according to the extension OID.
    pub fn decode(oid: &ObjectIdentifier, value: &[u8]) -> Self {
        let decoded = match ExtensionKind::from_oid(oid) {
            ExtensionKind::BasicConstraints => {
                BasicConstraints::from_x509_extension_value(value).map(Self::BasicConstraints)
            }
            ExtensionKind::KeyUsage => KeyUsage::from_x509_extension_value(value).map(Self::KeyUsage),
            ExtensionKind::CertificatePolicies => {
                CertificatePolicies::from_x509_extension_value(value).map(Self::CertificatePolicies)
            }
            ExtensionKind::SubjectKeyIdentifier => {
                SubjectKeyIdentifier::from_x509_extension_value(value).map(Self::SubjectKeyIdentifier)
            }
            ExtensionKind::AuthorityKeyIdentifier => {
                AuthorityKeyIdentifier::from_x509_extension_value(value)
                    .map(Self::AuthorityKeyIdentifier)
            }
            ExtensionKind::Other => return Self::Other(value.to_vec()),
        };
        decoded.unwrap_or_else(|e| Self::Malformed(e.to_string()))
    }

    /// Encodes the content back into a DER extension value.
    pub fn encode(&self) -> Result<Vec<u8>, SpidError> {
        match self {
            Self::BasicConstraints(ext) => ext.to_x509_extension_value(),
            Self::KeyUsage(ext) => ext.to_x509_extension_value(),
            Self::CertificatePolicies(ext) => ext.to_x509_extension_value(),
            Self::SubjectKeyIdentifier(ext) => ext.to_x509_extension_value(),
            Self::AuthorityKeyIdentifier(ext) => ext.to_x509_extension_value(),
            Self::Other(raw) => Ok(raw.clone()),
            Self::Malformed(reason) => Err(SpidError::Configuration(format!(
                "cannot encode malformed extension: {reason}"
            ))),
        }
    }
}

impl From<BasicConstraints> for ExtensionContent {
    fn from(value: BasicConstraints) -> Self {
        Self::BasicConstraints(value)
    }
}

impl From<KeyUsage> for ExtensionContent {
    fn from(value: KeyUsage) -> Self {
        Self::KeyUsage(value)
    }
}

impl From<CertificatePolicies> for ExtensionContent {
    fn from(value: CertificatePolicies) -> Self {
        Self::CertificatePolicies(value)
    }
}

impl From<SubjectKeyIdentifier> for ExtensionContent {
    fn from(value: SubjectKeyIdentifier) -> Self {
        Self::SubjectKeyIdentifier(value)
    }
}

impl From<AuthorityKeyIdentifier> for ExtensionContent {
    fn from(value: AuthorityKeyIdentifier) -> Self {
        Self::AuthorityKeyIdentifier(value)
    }
}
