//! Object identifiers used by the SPID profile.
//!
//! Standard X.509 OIDs come from the `const-oid` database where it carries
//! them; the SPID policy arcs and the few attributes the database names
//! differently are declared here so every module refers to one constant.

use const_oid::ObjectIdentifier;
use const_oid::db::{rfc5280, rfc5912};

// Subject name attributes

pub const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
pub const SURNAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.4");
pub const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
pub const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
pub const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
pub const NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.41");
pub const GIVEN_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.42");
pub const INITIALS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.43");
pub const PSEUDONYM: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.65");
pub const URI: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.83");
pub const ORGANIZATION_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.97");
pub const EMAIL_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");

// Extensions

pub const BASIC_CONSTRAINTS: ObjectIdentifier = rfc5280::ID_CE_BASIC_CONSTRAINTS;
pub const KEY_USAGE: ObjectIdentifier = rfc5280::ID_CE_KEY_USAGE;
pub const CERTIFICATE_POLICIES: ObjectIdentifier = rfc5280::ID_CE_CERTIFICATE_POLICIES;
pub const SUBJECT_KEY_IDENTIFIER: ObjectIdentifier = rfc5280::ID_CE_SUBJECT_KEY_IDENTIFIER;
pub const AUTHORITY_KEY_IDENTIFIER: ObjectIdentifier = rfc5280::ID_CE_AUTHORITY_KEY_IDENTIFIER;

/// id-qt-unotice policy qualifier.
pub const USER_NOTICE_QUALIFIER: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.2.2");

/// PKCS#9 extensionRequest attribute carried by a CSR.
pub const EXTENSION_REQUEST: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.14");

// SPID certificate policies

pub const POLICY_AGID_ROOT: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.76.16");
pub const POLICY_AGID_CERT: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.76.16.6");
pub const POLICY_SP_PUBLIC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.76.16.4.2.1");
pub const POLICY_SP_PRIVATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.76.16.4.3.1");

// Algorithms

pub const RSA_ENCRYPTION: ObjectIdentifier = rfc5912::RSA_ENCRYPTION;
pub const SHA1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");
pub const SHA224_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.14");
pub const SHA256_WITH_RSA: ObjectIdentifier = rfc5912::SHA_256_WITH_RSA_ENCRYPTION;
pub const SHA384_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
pub const SHA512_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
pub const ECDSA_WITH_SHA256: ObjectIdentifier = rfc5912::ECDSA_WITH_SHA_256;
pub const ECDSA_WITH_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
pub const ECDSA_WITH_SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.4");

/// Short name of a subject attribute, as printed in diagnostics.
///
/// Falls back to the `const-oid` database and finally to the dotted form.
pub fn attribute_name(oid: &ObjectIdentifier) -> String {
    let known = [
        (COMMON_NAME, "commonName"),
        (SURNAME, "surname"),
        (COUNTRY_NAME, "countryName"),
        (LOCALITY_NAME, "localityName"),
        (ORGANIZATION_NAME, "organizationName"),
        (NAME, "name"),
        (GIVEN_NAME, "givenName"),
        (INITIALS, "initials"),
        (PSEUDONYM, "pseudonym"),
        (URI, "uri"),
        (ORGANIZATION_IDENTIFIER, "organizationIdentifier"),
        (EMAIL_ADDRESS, "emailAddress"),
    ];

    known
        .iter()
        .find(|(candidate, _)| candidate == oid)
        .map(|(_, name)| (*name).to_string())
        .or_else(|| const_oid::db::DB.by_oid(oid).map(str::to_string))
        .unwrap_or_else(|| oid.to_string())
}

/// Digest name carried by a signature algorithm identifier.
pub fn digest_name(signature_algorithm: &ObjectIdentifier) -> Option<&'static str> {
    match *signature_algorithm {
        SHA1_WITH_RSA => Some("sha1"),
        SHA224_WITH_RSA => Some("sha224"),
        SHA256_WITH_RSA | ECDSA_WITH_SHA256 => Some("sha256"),
        SHA384_WITH_RSA | ECDSA_WITH_SHA384 => Some("sha384"),
        SHA512_WITH_RSA | ECDSA_WITH_SHA512 => Some("sha512"),
        _ => None,
    }
}
