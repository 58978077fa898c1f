//! Structural compliance checks.
//!
//! Every check records one [`CheckResult`] per rule it evaluates, passing or
//! not, so a report always lists everything that was looked at.

pub mod extensions;
pub mod key;
pub mod subject;

pub use extensions::{basic_constraints, certificate_policies, key_usage};
pub use key::{digest_algorithm, key_type_and_size};
pub use subject::subject_dn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
}

/// Ordered results of one check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport(Vec<CheckResult>);

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a rule described by `message`.
    pub fn record(&mut self, passed: bool, message: impl Into<String>) {
        self.0.push(CheckResult {
            passed,
            message: message.into(),
        });
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.record(false, message);
    }

    pub fn passed(&self) -> bool {
        self.0.iter().all(|r| r.passed)
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.0
    }

    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|r| !r.passed).map(|r| r.message.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    KeyTypeAndSize,
    DigestAlgorithm,
    SubjectDn,
    BasicConstraints,
    KeyUsage,
    CertificatePolicies,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::KeyTypeAndSize,
        CheckKind::DigestAlgorithm,
        CheckKind::SubjectDn,
        CheckKind::BasicConstraints,
        CheckKind::KeyUsage,
        CheckKind::CertificatePolicies,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            CheckKind::KeyTypeAndSize => "Checking the key type and size",
            CheckKind::DigestAlgorithm => "Checking the signature digest algorithm",
            CheckKind::SubjectDn => "Checking the SubjectDN",
            CheckKind::BasicConstraints => "Checking basicConstraints x509 extension",
            CheckKind::KeyUsage => "Checking keyUsage x509 extension",
            CheckKind::CertificatePolicies => "Checking certificatePolicies x509 extension",
        }
    }
}

/// A finished check, as handed to the reporter.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub report: CheckReport,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}
