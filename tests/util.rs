#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use tempfile::TempDir;

use spid_certs::cert::params::CertificateRequestSpec;
use spid_certs::checks::CheckOutcome;
use spid_certs::error::{Result, SpidError};
use spid_certs::profile::Sector;
use spid_certs::registry::RegistryLookup;
use spid_certs::report::{Artifact, Reporter};

pub const PUBLIC_ORG_ID: &str = "PA:IT-c_h501";
pub const PRIVATE_ORG_ID: &str = "VATIT-12345678901";

/// Builds a request whose outputs all land in `dir`.
pub fn request_spec(dir: &TempDir, sector: Sector, org_id: &str) -> CertificateRequestSpec {
    CertificateRequestSpec::builder()
        .sector(sector)
        .common_name("SPID Service Provider")
        .entity_id("https://sp.example.it/metadata")
        .locality_name("Roma")
        .organization_identifier(org_id)
        .organization_name("Example Organization")
        .validity_days(365)
        .key_output_path(dir.path().join("key.pem"))
        .csr_output_path(dir.path().join("csr.pem"))
        .cert_output_path(dir.path().join("crt.pem"))
        .build()
}

/// Registry answering from a fixed list of codes.
pub struct StubRegistry {
    pub known: Vec<&'static str>,
    pub queries: RefCell<Vec<String>>,
}

impl StubRegistry {
    pub fn knowing(known: &[&'static str]) -> Self {
        Self {
            known: known.to_vec(),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl RegistryLookup for StubRegistry {
    fn lookup(&self, code: &str) -> Result<bool> {
        self.queries.borrow_mut().push(code.to_string());
        Ok(self.known.contains(&code))
    }

    fn detail_url(&self, code: &str) -> Option<String> {
        Some(format!("https://registry.test/{code}"))
    }
}

/// Registry whose backend is unreachable.
pub struct UnreachableRegistry;

impl RegistryLookup for UnreachableRegistry {
    fn lookup(&self, _code: &str) -> Result<bool> {
        Err(SpidError::ExternalLookup("connection refused".to_string()))
    }
}

/// Reporter that keeps everything it is told.
#[derive(Default)]
pub struct RecordingReporter {
    pub artifacts: RefCell<Vec<(Artifact, String)>>,
    pub outcomes: RefCell<Vec<CheckOutcome>>,
}

impl Reporter for RecordingReporter {
    fn artifact_written(&self, artifact: Artifact, path: &Path) {
        self.artifacts
            .borrow_mut()
            .push((artifact, path.display().to_string()));
    }

    fn check_outcome(&self, outcome: &CheckOutcome) {
        self.outcomes.borrow_mut().push(outcome.clone());
    }
}
