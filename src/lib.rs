//! # spid-certs - SPID compliant certificates in pure Rust
//!
//! Generates and validates the X.509 material a SPID service provider needs,
//! following the "Avviso SPID 29 v3" profile: an RSA private key, a PKCS#10
//! signing request and, for public administrations, a self-signed
//! certificate. Everything is built with RustCrypto crates.
//!
//! ## Sectors
//!
//! - **Public**: public administrations, identified by their IPA code
//!   (`PA:IT-<code>`). The code is checked against IndicePA and a
//!   self-signed certificate is produced alongside the CSR.
//! - **Private**: private service providers, identified by fiscal code
//!   (`CF:IT-...`) or VAT number (`VATIT-...`). Only the key and the CSR
//!   are produced.
//!
//! ## Quick Start
//!
//! ### Generating the artifacts
//!
//! ```rust,no_run
//! use spid_certs::{
//!     cert::params::CertificateRequestSpec,
//!     generator::Generator,
//!     profile::Sector,
//!     registry::IndicePaRegistry,
//!     report::TracingReporter,
//! };
//!
//! # fn main() -> Result<(), spid_certs::error::SpidError> {
//! let spec = CertificateRequestSpec::builder()
//!     .sector(Sector::Public)
//!     .common_name("Comune di Roma")
//!     .entity_id("https://spid.comune.roma.it/metadata")
//!     .locality_name("Roma")
//!     .organization_identifier("PA:IT-c_h501")
//!     .organization_name("Roma Capitale")
//!     .validity_days(730)
//!     .build();
//!
//! let registry = IndicePaRegistry::new()?;
//! let artifacts = Generator::new(&TracingReporter, &registry).generate(&spec)?;
//! println!("CSR written to {}", artifacts.csr_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ### Validating a certificate or a CSR
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use spid_certs::{
//!     country::Iso3166, profile::Sector, report::TracingReporter, validator::Validator,
//! };
//!
//! # fn main() -> Result<(), spid_certs::error::SpidError> {
//! let validator = Validator::new(&TracingReporter, &Iso3166);
//! let report = validator.validate_file(Path::new("crt.pem"), Sector::Public)?;
//! report.into_result()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use spid_certs::{error::SpidError, profile::Sector};
//!
//! match "federal".parse::<Sector>() {
//!     Ok(sector) => println!("sector {sector}"),
//!     Err(SpidError::InvalidSector(name)) => println!("unknown sector {name}"),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`profile`]: The per-sector rule set
//! - [`checks`]: The structural compliance checks
//! - [`generator`]: Key, CSR and self-signed certificate generation
//! - [`validator`]: Loading PEM artifacts and running every check
//! - [`key`]: RSA key generation and signing
//! - [`cert`]: Certificate and CSR types, extensions and parameters
//! - [`issuer`]: Certificate issuing
//! - [`error`]: Error types

pub mod cert;
pub mod checks;
pub mod country;
pub mod error;
pub mod generator;
pub mod issuer;
pub mod key;
pub mod oid;
pub mod parsed;
pub mod pem_utils;
pub mod profile;
pub mod registry;
pub mod report;
pub mod tbs_certificate;
pub mod validator;
