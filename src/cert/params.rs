use std::path::PathBuf;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{OctetString, PrintableStringRef, SetOfVec};
use der::{Any, Tag};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::DigestAlgorithm;
use super::extensions::{ExtensionContent, ExtensionKind, ToAndFromX509Extension, decode_string};
use crate::error::{Result, SpidError};
use crate::oid;
use crate::profile::Sector;

/// Everything needed to produce one set of SPID artifacts.
///
/// Built once with the generated builder and consumed by
/// [`crate::generator::Generator::generate`].
///
/// # Fields
/// * `sector` - The service provider sector.
/// * `common_name` - The service provider common name (CN).
/// * `entity_id` - The SAML entityID, written as the `uri` attribute.
/// * `locality_name` - The locality (L).
/// * `organization_identifier` - The IPA code, VAT or fiscal number.
/// * `organization_name` - The organization name (O).
/// * `digest_algorithm` - Digest used for every signature.
/// * `key_size` - RSA modulus size in bits.
/// * `validity_days` - Lifetime of the self-signed certificate.
#[derive(Clone, Debug, Builder)]
pub struct CertificateRequestSpec {
    #[builder(default)]
    pub sector: Sector,
    #[builder(into)]
    pub common_name: String,
    #[builder(into)]
    pub entity_id: String,
    #[builder(into)]
    pub locality_name: String,
    #[builder(into)]
    pub organization_identifier: String,
    #[builder(into)]
    pub organization_name: String,
    #[builder(default)]
    pub digest_algorithm: DigestAlgorithm,
    #[builder(default = 2048)]
    pub key_size: usize,
    #[builder(default = 365)]
    pub validity_days: u32,
    #[builder(into, default = PathBuf::from("key.pem"))]
    pub key_output_path: PathBuf,
    #[builder(into, default = PathBuf::from("csr.pem"))]
    pub csr_output_path: PathBuf,
    #[builder(into, default = PathBuf::from("crt.pem"))]
    pub cert_output_path: PathBuf,
}

/// One attribute of a subject distinguished name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectAttribute {
    pub attribute: ObjectIdentifier,
    pub value: String,
}

impl SubjectAttribute {
    pub fn new(attribute: ObjectIdentifier, value: impl Into<String>) -> Self {
        Self {
            attribute,
            value: value.into(),
        }
    }
}

/// Distinguished name as an ordered list of single-valued attributes.
///
/// Each attribute is written as its own relative distinguished name, in
/// list order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName(pub Vec<SubjectAttribute>);

impl DistinguishedName {
    pub fn attributes(&self) -> &[SubjectAttribute] {
        &self.0
    }

    /// Converts the distinguished name to an X.509-compatible format.
    ///
    /// countryName is encoded as a PrintableString, every other attribute as
    /// a UTF8String.
    pub fn to_x509_name(&self) -> Result<x509_cert::name::DistinguishedName> {
        let rdns = self
            .0
            .iter()
            .map(|attr| {
                let value = if attr.attribute == oid::COUNTRY_NAME {
                    PrintableStringRef::new(&attr.value)?;
                    Any::new(Tag::PrintableString, attr.value.as_bytes())?
                } else {
                    Any::new(Tag::Utf8String, attr.value.as_bytes())?
                };
                let atv = AttributeTypeAndValue {
                    oid: attr.attribute,
                    value,
                };
                Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    ///
    /// Values that are not character strings are kept lossily so the
    /// attribute still shows up in diagnostics.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Self {
        let attributes = x509dn
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .map(|atv| {
                let value = decode_string(&atv.value)
                    .unwrap_or_else(|| String::from_utf8_lossy(atv.value.value()).into_owned());
                SubjectAttribute::new(atv.oid, value)
            })
            .collect();

        DistinguishedName(attributes)
    }
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    ///
    /// Fails when the end date falls outside the representable range.
    pub fn for_days(days: u32) -> Result<Self> {
        let now = OffsetDateTime::now_utc();
        let not_after = now
            .checked_add(Duration::days(i64::from(days)))
            .ok_or_else(|| SpidError::Configuration(format!("Invalid value for days ({days})")))?;
        Ok(Self {
            not_before: now,
            not_after,
        })
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `content` - The decoded extension value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionSpec {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    pub content: ExtensionContent,
}

impl ExtensionSpec {
    /// Creates an `ExtensionSpec` from a specific extension.
    pub fn from_extension<E>(extension: E, critical: bool) -> Self
    where
        E: ToAndFromX509Extension + Into<ExtensionContent>,
    {
        Self {
            oid: E::OID,
            critical,
            content: extension.into(),
        }
    }

    pub fn kind(&self) -> ExtensionKind {
        ExtensionKind::from_oid(&self.oid)
    }

    pub fn to_x509_extension(&self) -> Result<x509_cert::ext::Extension> {
        Ok(x509_cert::ext::Extension {
            extn_id: self.oid,
            critical: self.critical,
            extn_value: OctetString::new(self.content.encode()?)?,
        })
    }

    pub fn from_x509_extension(ext: &x509_cert::ext::Extension) -> Self {
        Self {
            oid: ext.extn_id,
            critical: ext.critical,
            content: ExtensionContent::decode(&ext.extn_id, ext.extn_value.as_bytes()),
        }
    }
}

/// Finds the first extension of the given kind.
pub fn find_extension(extensions: &[ExtensionSpec], kind: ExtensionKind) -> Option<&ExtensionSpec> {
    extensions.iter().find(|ext| ext.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::{BasicConstraints, KeyUsage};
    use der::Tagged;

    #[test]
    fn name_keeps_attribute_order() {
        let dn = DistinguishedName(vec![
            SubjectAttribute::new(oid::ORGANIZATION_NAME, "Comune di Roma"),
            SubjectAttribute::new(oid::COMMON_NAME, "SPID SP"),
            SubjectAttribute::new(oid::COUNTRY_NAME, "IT"),
        ]);
        let x509 = dn.to_x509_name().unwrap();
        assert_eq!(x509.0.len(), 3);
        assert_eq!(DistinguishedName::from_x509_name(&x509), dn);
    }

    #[test]
    fn country_is_printable_string() {
        let dn = DistinguishedName(vec![SubjectAttribute::new(oid::COUNTRY_NAME, "IT")]);
        let x509 = dn.to_x509_name().unwrap();
        let atv = x509.0[0].0.iter().next().unwrap();
        assert_eq!(atv.value.tag(), Tag::PrintableString);
    }

    #[test]
    fn validity_spans_requested_days() {
        let validity = Validity::for_days(30).unwrap();
        assert_eq!((validity.not_after - validity.not_before).whole_days(), 30);
    }

    #[test]
    fn validity_past_year_9999_is_rejected() {
        let err = Validity::for_days(4_000_000).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for days (4000000)");
    }

    #[test]
    fn extension_spec_survives_x509_encoding() {
        let spec = ExtensionSpec::from_extension(KeyUsage::spid(), true);
        let x509 = spec.to_x509_extension().unwrap();
        assert_eq!(ExtensionSpec::from_x509_extension(&x509), spec);
    }

    #[test]
    fn finds_extension_by_kind() {
        let extensions = vec![
            ExtensionSpec::from_extension(BasicConstraints::default(), false),
            ExtensionSpec::from_extension(KeyUsage::spid(), true),
        ];
        let found = find_extension(&extensions, ExtensionKind::KeyUsage).unwrap();
        assert!(found.critical);
        assert!(find_extension(&extensions, ExtensionKind::CertificatePolicies).is_none());
    }

    #[test]
    fn builder_defaults() {
        let spec = CertificateRequestSpec::builder()
            .common_name("SPID SP")
            .entity_id("https://sp.example.it")
            .locality_name("Roma")
            .organization_identifier("PA:IT-c_h501")
            .organization_name("Comune di Roma")
            .build();
        assert_eq!(spec.sector, Sector::Public);
        assert_eq!(spec.key_size, 2048);
        assert_eq!(spec.digest_algorithm, DigestAlgorithm::Sha256);
        assert_eq!(spec.key_output_path, PathBuf::from("key.pem"));
    }
}
