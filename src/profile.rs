//! The Avviso SPID 29 v3 compliance profile.
//!
//! Every rule the generator obeys and the validator enforces lives in the
//! static tables below. A [`CertificateProfile`] is resolved once per
//! [`Sector`] and never mutated afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use const_oid::ObjectIdentifier;
use regex::Regex;

use crate::cert::DigestAlgorithm;
use crate::error::{Result, SpidError};
use crate::oid;

/// The two service provider sectors covered by the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sector {
    /// Public administration.
    #[default]
    Public,
    /// Private service providers.
    Private,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Public => "public",
            Sector::Private => "private",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = SpidError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "public" => Ok(Sector::Public),
            "private" => Ok(Sector::Private),
            other => Err(SpidError::InvalidSector(other.to_string())),
        }
    }
}

/// Which sectors a certificate policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    All,
    Only(Sector),
}

impl Applicability {
    pub fn includes(&self, sector: Sector) -> bool {
        match self {
            Applicability::All => true,
            Applicability::Only(only) => *only == sector,
        }
    }
}

/// A certificate policy together with the UserNotice text it must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySpec {
    pub oid: ObjectIdentifier,
    pub notice_text: &'static str,
    pub applies_to: Applicability,
}

/// All SPID policies, in the order they are written into certificatePolicies.
pub const POLICIES: [PolicySpec; 4] = [
    PolicySpec {
        oid: oid::POLICY_AGID_ROOT,
        notice_text: "AgIDroot",
        applies_to: Applicability::All,
    },
    PolicySpec {
        oid: oid::POLICY_AGID_CERT,
        notice_text: "agIDcert",
        applies_to: Applicability::All,
    },
    PolicySpec {
        oid: oid::POLICY_SP_PUBLIC,
        notice_text: "cert_SP_Pub",
        applies_to: Applicability::Only(Sector::Public),
    },
    PolicySpec {
        oid: oid::POLICY_SP_PRIVATE,
        notice_text: "cert_SP_Priv",
        applies_to: Applicability::Only(Sector::Private),
    },
];

pub const MANDATORY_ATTRIBUTES: [ObjectIdentifier; 6] = [
    oid::ORGANIZATION_IDENTIFIER,
    oid::URI,
    oid::COMMON_NAME,
    oid::COUNTRY_NAME,
    oid::LOCALITY_NAME,
    oid::ORGANIZATION_NAME,
];

pub const FORBIDDEN_ATTRIBUTES: [ObjectIdentifier; 6] = [
    oid::INITIALS,
    oid::NAME,
    oid::EMAIL_ADDRESS,
    oid::GIVEN_NAME,
    oid::PSEUDONYM,
    oid::SURNAME,
];

pub const ALLOWED_DIGESTS: [DigestAlgorithm; 2] = [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512];

pub const ALLOWED_KEY_SIZES: [usize; 3] = [2048, 3072, 4096];

pub const MIN_KEY_SIZE: usize = 2048;

const PUBLIC_ORG_ID: &str = r"^PA:IT-\S{1,11}$";
const PRIVATE_ORG_ID: &str = r"^(CF:IT-[a-zA-Z0-9]{16}|VATIT-\d{11})$";

static PUBLIC_ORG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PUBLIC_ORG_ID).expect("static pattern"));
static PRIVATE_ORG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRIVATE_ORG_ID).expect("static pattern"));

/// The organizationIdentifier format accepted for one sector.
#[derive(Debug, Clone, Copy)]
pub struct OrgIdPattern {
    source: &'static str,
    regex: &'static LazyLock<Regex>,
}

impl OrgIdPattern {
    pub fn for_sector(sector: Sector) -> Self {
        match sector {
            Sector::Public => Self {
                source: PUBLIC_ORG_ID,
                regex: &PUBLIC_ORG_ID_RE,
            },
            Sector::Private => Self {
                source: PRIVATE_ORG_ID,
                regex: &PRIVATE_ORG_ID_RE,
            },
        }
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// The pattern as written, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        self.source
    }
}

/// The resolved rule set for one sector.
#[derive(Debug, Clone)]
pub struct CertificateProfile {
    pub sector: Sector,
    pub organization_identifier: OrgIdPattern,
    pub mandatory_attributes: Vec<ObjectIdentifier>,
    pub forbidden_attributes: Vec<ObjectIdentifier>,
    /// Policies applicable to `sector`, in emission order.
    pub policies: Vec<PolicySpec>,
    pub allowed_digests: Vec<DigestAlgorithm>,
    pub allowed_key_sizes: Vec<usize>,
    pub min_key_size: usize,
}

impl CertificateProfile {
    /// Looks up the applicable policy with the given OID.
    pub fn policy(&self, oid: &ObjectIdentifier) -> Option<&PolicySpec> {
        self.policies.iter().find(|p| p.oid == *oid)
    }

    pub fn allows_digest(&self, name: &str) -> bool {
        self.allowed_digests.iter().any(|d| d.name() == name)
    }

    pub fn allows_key_size(&self, bits: usize) -> bool {
        self.allowed_key_sizes.contains(&bits)
    }
}

/// Resolves the profile for `sector`.
pub fn resolve(sector: Sector) -> CertificateProfile {
    CertificateProfile {
        sector,
        organization_identifier: OrgIdPattern::for_sector(sector),
        mandatory_attributes: MANDATORY_ATTRIBUTES.to_vec(),
        forbidden_attributes: FORBIDDEN_ATTRIBUTES.to_vec(),
        policies: POLICIES
            .iter()
            .filter(|p| p.applies_to.includes(sector))
            .copied()
            .collect(),
        allowed_digests: ALLOWED_DIGESTS.to_vec(),
        allowed_key_sizes: ALLOWED_KEY_SIZES.to_vec(),
        min_key_size: MIN_KEY_SIZE,
    }
}

/// Resolves the profile for a sector given by name.
pub fn resolve_named(sector: &str) -> Result<CertificateProfile> {
    Ok(resolve(sector.parse()?))
}
