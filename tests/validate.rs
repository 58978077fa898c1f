mod util;

use spid_certs::cert::extensions::{ExtensionContent, ExtensionKind, PolicyEntry};
use spid_certs::cert::params::SubjectAttribute;
use spid_certs::checks::CheckKind;
use spid_certs::country::Iso3166;
use spid_certs::error::SpidError;
use spid_certs::generator::Generator;
use spid_certs::oid;
use spid_certs::parsed::{ArtifactKind, ParsedCertificate};
use spid_certs::profile::Sector;
use spid_certs::report::SilentReporter;
use spid_certs::validator::Validator;

use util::{PRIVATE_ORG_ID, PUBLIC_ORG_ID, RecordingReporter, StubRegistry};

/// Generates public artifacts in a fresh directory and loads the certificate.
fn generated_certificate() -> ParsedCertificate {
    let dir = tempfile::tempdir().unwrap();
    let spec = util::request_spec(&dir, Sector::Public, PUBLIC_ORG_ID);
    Generator::new(&SilentReporter, &StubRegistry::knowing(&["c_h501"]))
        .generate(&spec)
        .unwrap();

    let validator = Validator::new(&SilentReporter, &Iso3166);
    validator
        .load(&std::fs::read(&spec.cert_output_path).unwrap())
        .unwrap()
}

fn generated_private_request() -> ParsedCertificate {
    let dir = tempfile::tempdir().unwrap();
    let spec = util::request_spec(&dir, Sector::Private, PRIVATE_ORG_ID);
    Generator::new(&SilentReporter, &StubRegistry::knowing(&[]))
        .generate(&spec)
        .unwrap();

    let validator = Validator::new(&SilentReporter, &Iso3166);
    validator
        .load(&std::fs::read(&spec.csr_output_path).unwrap())
        .unwrap()
}

fn failing_checks(parsed: &ParsedCertificate, sector: Sector) -> Vec<(CheckKind, Vec<String>)> {
    let validator = Validator::new(&SilentReporter, &Iso3166);
    validator
        .run(parsed, sector)
        .outcomes
        .into_iter()
        .filter(|o| !o.passed())
        .map(|o| (o.kind, o.report.failures().map(str::to_string).collect()))
        .collect()
}

#[test]
fn input_without_markers_is_a_format_error() {
    let validator = Validator::new(&SilentReporter, &Iso3166);
    assert!(matches!(
        validator.load(b"MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA"),
        Err(SpidError::Format(_))
    ));
    assert!(matches!(validator.load(b""), Err(SpidError::Format(_))));
}

#[test]
fn invalid_der_is_a_format_error() {
    let validator = Validator::new(&SilentReporter, &Iso3166);
    let pem = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
    assert!(matches!(
        validator.load(pem.as_bytes()),
        Err(SpidError::Format(_))
    ));
}

#[test]
fn every_check_is_reported_in_order() {
    let parsed = generated_certificate();
    assert_eq!(parsed.kind, ArtifactKind::Certificate);

    let reporter = RecordingReporter::default();
    let validator = Validator::new(&reporter, &Iso3166);
    let report = validator.run(&parsed, Sector::Public);
    assert!(report.passed());

    let kinds: Vec<CheckKind> = reporter.outcomes.borrow().iter().map(|o| o.kind).collect();
    assert_eq!(kinds, CheckKind::ALL.to_vec());
}

#[test]
fn certificate_carries_both_key_identifiers() {
    let parsed = generated_certificate();
    let ski = parsed
        .extensions
        .iter()
        .find(|e| e.kind() == ExtensionKind::SubjectKeyIdentifier)
        .unwrap();
    let aki = parsed
        .extensions
        .iter()
        .find(|e| e.kind() == ExtensionKind::AuthorityKeyIdentifier)
        .unwrap();
    match (&ski.content, &aki.content) {
        (ExtensionContent::SubjectKeyIdentifier(s), ExtensionContent::AuthorityKeyIdentifier(a)) => {
            assert_eq!(s.key_identifier, a.key_identifier);
        }
        other => panic!("unexpected contents: {other:?}"),
    }
}

#[test]
fn non_critical_key_usage_is_the_only_failure() {
    let mut parsed = generated_certificate();
    for ext in parsed.extensions.iter_mut() {
        if ext.kind() == ExtensionKind::KeyUsage {
            ext.critical = false;
        }
    }

    assert_eq!(
        failing_checks(&parsed, Sector::Public),
        vec![(
            CheckKind::KeyUsage,
            vec!["keyUsage must be set as critical".to_string()]
        )]
    );
}

#[test]
fn email_address_in_subject_is_not_allowed() {
    let mut parsed = generated_certificate();
    parsed
        .subject
        .push(SubjectAttribute::new(oid::EMAIL_ADDRESS, "info@example.it"));

    assert_eq!(
        failing_checks(&parsed, Sector::Public),
        vec![(
            CheckKind::SubjectDn,
            vec![
                "Name attribute [emailAddress, 1.2.840.113549.1.9.1] is not allowed in subjectDN"
                    .to_string()
            ]
        )]
    );
}

#[test]
fn country_code_must_exist() {
    let mut parsed = generated_certificate();
    let country = parsed
        .subject
        .iter_mut()
        .find(|a| a.attribute == oid::COUNTRY_NAME)
        .unwrap();
    assert_eq!(country.value, "IT");
    country.value = "ZZ".to_string();

    assert_eq!(
        failing_checks(&parsed, Sector::Public),
        vec![(
            CheckKind::SubjectDn,
            vec![
                "Value for name attribute [countryName, 2.5.4.6] is not a valid country code (ZZ)"
                    .to_string()
            ]
        )]
    );
}

#[test]
fn private_policy_with_public_text_is_reported() {
    let mut parsed = generated_private_request();
    assert_eq!(parsed.kind, ArtifactKind::Request);

    for ext in parsed.extensions.iter_mut() {
        if let ExtensionContent::CertificatePolicies(policies) = &mut ext.content {
            for entry in policies.policies.iter_mut() {
                if entry.oid == oid::POLICY_SP_PRIVATE {
                    *entry = PolicyEntry::with_notice(oid::POLICY_SP_PRIVATE, "cert_SP_Pub");
                }
            }
        }
    }

    assert_eq!(
        failing_checks(&parsed, Sector::Private),
        vec![(
            CheckKind::CertificatePolicies,
            vec![
                "policy 1.3.76.16.4.3.1 must have UserNotice.ExplicitText=cert_SP_Priv (now: cert_SP_Pub)"
                    .to_string()
            ]
        )]
    );
}

#[test]
fn public_certificate_fails_private_profile() {
    let parsed = generated_certificate();
    let validator = Validator::new(&SilentReporter, &Iso3166);
    let err = validator
        .run(&parsed, Sector::Private)
        .into_result()
        .unwrap_err();

    let SpidError::ValidationFailure {
        sector,
        diagnostics,
    } = err
    else {
        panic!("expected a validation failure");
    };
    assert_eq!(sector, "private");
    assert!(diagnostics.contains(&"policy 1.3.76.16.4.3.1 must be present".to_string()));
    assert!(diagnostics.iter().any(|d| d.contains("organizationIdentifier")));
}
