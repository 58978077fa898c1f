use std::path::Path;

use tracing::debug;

use crate::checks::{self, CheckKind, CheckOutcome, CheckReport};
use crate::country::CountryLookup;
use crate::error::{Result, SpidError};
use crate::parsed::{ArtifactKind, ParsedCertificate};
use crate::pem_utils;
use crate::profile::{self, Sector};
use crate::report::Reporter;

/// Result of running every check against one artifact.
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub sector: Sector,
    pub outcomes: Vec<CheckOutcome>,
}

impl ComplianceReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    /// Every failure message, in check order.
    pub fn diagnostics(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .flat_map(|o| o.report.failures().map(str::to_string))
            .collect()
    }

    pub fn into_result(self) -> Result<()> {
        if self.passed() {
            return Ok(());
        }
        Err(SpidError::ValidationFailure {
            sector: self.sector.to_string(),
            diagnostics: self.diagnostics(),
        })
    }
}

/// Checks certificates and CSRs against a sector profile.
pub struct Validator<'a> {
    reporter: &'a dyn Reporter,
    countries: &'a dyn CountryLookup,
}

impl<'a> Validator<'a> {
    pub fn new(reporter: &'a dyn Reporter, countries: &'a dyn CountryLookup) -> Self {
        Self {
            reporter,
            countries,
        }
    }

    /// Decodes a PEM `CERTIFICATE` or `CERTIFICATE REQUEST`.
    pub fn load(&self, bytes: &[u8]) -> Result<ParsedCertificate> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| SpidError::Format("input is not PEM text".to_string()))?;
        let (label, der) = pem_utils::decode_envelope(text)?;
        let kind = ArtifactKind::from_pem_label(&label)
            .ok_or_else(|| SpidError::Format(format!("unexpected PEM label ({label})")))?;
        debug!(?kind, len = der.len(), "decoded PEM envelope");
        ParsedCertificate::from_der(kind, &der)
    }

    /// Runs all six checks; none of them short-circuits the others.
    pub fn run(&self, parsed: &ParsedCertificate, sector: Sector) -> ComplianceReport {
        let profile = profile::resolve(sector);

        let outcomes = CheckKind::ALL
            .into_iter()
            .map(|kind| {
                let report: CheckReport = match kind {
                    CheckKind::KeyTypeAndSize => checks::key_type_and_size(&profile, &parsed.public_key),
                    CheckKind::DigestAlgorithm => {
                        checks::digest_algorithm(&profile, &parsed.digest_algorithm)
                    }
                    CheckKind::SubjectDn => {
                        checks::subject_dn(&profile, &parsed.subject, self.countries)
                    }
                    CheckKind::BasicConstraints => checks::basic_constraints(&parsed.extensions),
                    CheckKind::KeyUsage => checks::key_usage(&parsed.extensions),
                    CheckKind::CertificatePolicies => {
                        checks::certificate_policies(&profile, &parsed.extensions)
                    }
                };
                let outcome = CheckOutcome { kind, report };
                self.reporter.check_outcome(&outcome);
                outcome
            })
            .collect();

        ComplianceReport { sector, outcomes }
    }

    /// Reads, decodes and checks the file at `path`.
    pub fn validate_file(&self, path: &Path, sector: Sector) -> Result<ComplianceReport> {
        let bytes = std::fs::read(path)?;
        let parsed = self.load(&bytes)?;
        Ok(self.run(&parsed, sector))
    }
}
