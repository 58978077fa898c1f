//! spid-certs - Generate and validate SPID compliant certificates.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use regex::Regex;
use tracing::error;
use tracing_subscriber::EnvFilter;

use spid_certs::cert::DigestAlgorithm;
use spid_certs::cert::params::CertificateRequestSpec;
use spid_certs::country::Iso3166;
use spid_certs::generator::Generator;
use spid_certs::profile::Sector;
use spid_certs::registry::IndicePaRegistry;
use spid_certs::report::TracingReporter;
use spid_certs::validator::Validator;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "spid-certs")]
#[command(about = "Generate and validate SPID compliant certificates (Avviso SPID 29 v3)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a private key, a CSR and (public sector only) a self-signed certificate
    Generate(GenerateArgs),
    /// Validate a certificate or a CSR
    Validate(ValidateArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum SectorArg {
    Public,
    Private,
}

impl From<SectorArg> for Sector {
    fn from(value: SectorArg) -> Self {
        match value {
            SectorArg::Public => Sector::Public,
            SectorArg::Private => Sector::Private,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DigestArg {
    Sha256,
    Sha512,
}

impl From<DigestArg> for DigestAlgorithm {
    fn from(value: DigestArg) -> Self {
        match value {
            DigestArg::Sha256 => DigestAlgorithm::Sha256,
            DigestArg::Sha512 => DigestAlgorithm::Sha512,
        }
    }
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Service provider sector
    #[arg(long, value_enum, default_value = "public")]
    sector: SectorArg,
    /// Digest algorithm used for signatures
    #[arg(long, value_enum, default_value = "sha256")]
    md_alg: DigestArg,
    /// RSA key size in bits (2048, 3072 or 4096)
    #[arg(long, default_value_t = 2048)]
    key_size: usize,
    /// Where to write the private key
    #[arg(long, default_value = "key.pem")]
    key_out: PathBuf,
    /// Where to write the CSR
    #[arg(long, default_value = "csr.pem")]
    csr_out: PathBuf,
    /// Where to write the self-signed certificate
    #[arg(long, default_value = "crt.pem")]
    crt_out: PathBuf,
    /// Common name (CN)
    #[arg(long, value_parser = not_empty_string)]
    common_name: String,
    /// SAML entityID of the service provider
    #[arg(long, value_parser = not_empty_string)]
    entity_id: String,
    /// Locality name (L)
    #[arg(long, value_parser = not_empty_string)]
    locality_name: String,
    /// Organization identifier (PA:IT-..., CF:IT-... or VATIT-...)
    #[arg(long, value_parser = not_empty_string)]
    org_id: String,
    /// Organization name (O)
    #[arg(long, value_parser = not_empty_string)]
    org_name: String,
    /// Validity of the self-signed certificate, in days
    #[arg(long)]
    days: u32,
}

#[derive(clap::Args)]
struct ValidateArgs {
    /// Service provider sector
    #[arg(long, value_enum, default_value = "public")]
    sector: SectorArg,
    /// Certificate or CSR to validate
    #[arg(long, env = "CERT_FILE", default_value = "crt.pem")]
    cert_file: PathBuf,
}

static NOT_EMPTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S(.*\S)?$").expect("static pattern"));

fn not_empty_string(value: &str) -> std::result::Result<String, String> {
    if NOT_EMPTY.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("must not be empty nor start or end with whitespace".to_string())
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let spec = CertificateRequestSpec::builder()
        .sector(args.sector.into())
        .digest_algorithm(args.md_alg.into())
        .key_size(args.key_size)
        .key_output_path(args.key_out)
        .csr_output_path(args.csr_out)
        .cert_output_path(args.crt_out)
        .common_name(args.common_name)
        .entity_id(args.entity_id)
        .locality_name(args.locality_name)
        .organization_identifier(args.org_id)
        .organization_name(args.org_name)
        .validity_days(args.days)
        .build();

    let registry = IndicePaRegistry::new()?;
    Generator::new(&TracingReporter, &registry).generate(&spec)?;
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let sector = Sector::from(args.sector);
    let validator = Validator::new(&TracingReporter, &Iso3166);
    let report = validator
        .validate_file(&args.cert_file, sector)
        .with_context(|| format!("Failed to load {}", args.cert_file.display()))?;

    if !report.passed() {
        bail!(
            "The certificate {} does not match {sector} sector specifications",
            args.cert_file.display()
        );
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(args) => cmd_generate(args),
        Commands::Validate(args) => cmd_validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
