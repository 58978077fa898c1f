//! Progress and diagnostic reporting.
//!
//! The library never logs on its own; callers pass a [`Reporter`] to the
//! generator and the validator.

use std::path::Path;

use tracing::{error, info};

use crate::checks::CheckOutcome;

/// What kind of file the generator produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    PrivateKey,
    Request,
    Certificate,
}

impl Artifact {
    pub fn description(&self) -> &'static str {
        match self {
            Artifact::PrivateKey => "Private key",
            Artifact::Request => "CSR",
            Artifact::Certificate => "Self-signed certificate",
        }
    }

    /// openssl command that prints the artifact.
    pub fn inspect_command(&self, path: &Path) -> String {
        let tool = match self {
            Artifact::PrivateKey => "rsa",
            Artifact::Request => "req",
            Artifact::Certificate => "x509",
        };
        format!("openssl {tool} -in {} -noout -text", path.display())
    }

    /// openssl command that dumps the ASN.1 structure. None for the key.
    pub fn asn1_dump_command(&self, path: &Path) -> Option<String> {
        match self {
            Artifact::PrivateKey => None,
            Artifact::Request | Artifact::Certificate => Some(format!(
                "openssl asn1parse -i -inform PEM -in {}",
                path.display()
            )),
        }
    }
}

pub trait Reporter {
    fn artifact_written(&self, artifact: Artifact, path: &Path);

    fn check_outcome(&self, outcome: &CheckOutcome);
}

/// Emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn artifact_written(&self, artifact: Artifact, path: &Path) {
        info!("{} stored in {}", artifact.description(), path.display());
        info!("    Inspect it with: {}", artifact.inspect_command(path));
        if let Some(command) = artifact.asn1_dump_command(path) {
            info!("    Dump its ASN.1 structure with: {command}");
        }
    }

    fn check_outcome(&self, outcome: &CheckOutcome) {
        let title = outcome.kind.title();
        if outcome.passed() {
            info!("{title}: success");
        } else {
            error!("{title}: failure");
            for message in outcome.report.failures() {
                error!("    {message}");
            }
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn artifact_written(&self, _artifact: Artifact, _path: &Path) {}

    fn check_outcome(&self, _outcome: &CheckOutcome) {}
}
