use super::CheckReport;
use crate::cert::extensions::{ExtensionContent, ExtensionKind, KeyUsages};
use crate::cert::params::{ExtensionSpec, find_extension};
use crate::profile::CertificateProfile;

const REQUIRED_USAGES: [(KeyUsages, &str); 2] = [
    (KeyUsages::NonRepudiation, "contentCommitment"),
    (KeyUsages::DigitalSignature, "digitalSignature"),
];

const FORBIDDEN_USAGES: [(KeyUsages, &str); 7] = [
    (KeyUsages::CRLSign, "cRLSign"),
    (KeyUsages::DataEncipherment, "dataEncipherment"),
    (KeyUsages::KeyAgreement, "keyAgreement"),
    (KeyUsages::KeyCertSign, "keyCertSign"),
    (KeyUsages::KeyEncipherment, "keyEncipherment"),
    (KeyUsages::EncipherOnly, "encipherOnly"),
    (KeyUsages::DecipherOnly, "decipherOnly"),
];

/// Looks the extension up, recording a failure when it is absent.
fn require<'a>(
    report: &mut CheckReport,
    extensions: &'a [ExtensionSpec],
    kind: ExtensionKind,
) -> Option<&'a ExtensionSpec> {
    let found = find_extension(extensions, kind);
    if found.is_none() {
        report.fail(format!("{} must be present", kind.name()));
    }
    found
}

fn malformed(report: &mut CheckReport, kind: ExtensionKind, content: &ExtensionContent) {
    let reason = match content {
        ExtensionContent::Malformed(reason) => reason.as_str(),
        _ => "unexpected content",
    };
    report.fail(format!("{} can not be decoded ({reason})", kind.name()));
}

pub fn basic_constraints(extensions: &[ExtensionSpec]) -> CheckReport {
    let kind = ExtensionKind::BasicConstraints;
    let mut report = CheckReport::new();
    let Some(ext) = require(&mut report, extensions, kind) else {
        return report;
    };

    report.record(
        !ext.critical,
        format!("{} can not be set as critical", kind.name()),
    );
    match &ext.content {
        ExtensionContent::BasicConstraints(bc) => report.record(!bc.is_ca, "CA must be FALSE"),
        other => malformed(&mut report, kind, other),
    }

    report
}

pub fn key_usage(extensions: &[ExtensionSpec]) -> CheckReport {
    let kind = ExtensionKind::KeyUsage;
    let mut report = CheckReport::new();
    let Some(ext) = require(&mut report, extensions, kind) else {
        return report;
    };

    report.record(ext.critical, format!("{} must be set as critical", kind.name()));

    let ExtensionContent::KeyUsage(usage) = &ext.content else {
        malformed(&mut report, kind, &ext.content);
        return report;
    };
    for (flag, name) in REQUIRED_USAGES {
        report.record(usage.contains(flag), format!("{name} must be set"));
    }
    for (flag, name) in FORBIDDEN_USAGES {
        report.record(!usage.contains(flag), format!("{name} must be unset"));
    }

    report
}

/// Every profile policy must be present; explicit texts are compared only
/// for policies that apply to the profile's sector.
pub fn certificate_policies(profile: &CertificateProfile, extensions: &[ExtensionSpec]) -> CheckReport {
    let kind = ExtensionKind::CertificatePolicies;
    let mut report = CheckReport::new();
    let Some(ext) = require(&mut report, extensions, kind) else {
        return report;
    };

    report.record(
        !ext.critical,
        format!("{} can not be set as critical", kind.name()),
    );

    let ExtensionContent::CertificatePolicies(policies) = &ext.content else {
        malformed(&mut report, kind, &ext.content);
        return report;
    };

    for expected in &profile.policies {
        report.record(
            policies.get(&expected.oid).is_some(),
            format!("policy {} must be present", expected.oid),
        );
    }

    for entry in &policies.policies {
        let Some(expected) = profile.policy(&entry.oid) else {
            continue;
        };
        for text in &entry.explicit_texts {
            report.record(
                text == expected.notice_text,
                format!(
                    "policy {} must have UserNotice.ExplicitText={} (now: {text})",
                    entry.oid, expected.notice_text
                ),
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::{BasicConstraints, CertificatePolicies, KeyUsage, PolicyEntry};
    use crate::oid;
    use crate::profile::{Sector, resolve};

    fn policies_for(sector: Sector) -> CertificatePolicies {
        CertificatePolicies {
            policies: resolve(sector)
                .policies
                .iter()
                .map(|p| PolicyEntry::with_notice(p.oid, p.notice_text))
                .collect(),
        }
    }

    #[test]
    fn basic_constraints_rejects_ca_and_critical() {
        let ext = ExtensionSpec::from_extension(
            BasicConstraints {
                is_ca: true,
                max_path_length: None,
            },
            true,
        );
        let report = basic_constraints(&[ext]);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["basicConstraints can not be set as critical", "CA must be FALSE"]
        );
    }

    #[test]
    fn missing_extensions_are_reported() {
        assert_eq!(
            basic_constraints(&[]).failures().collect::<Vec<_>>(),
            vec!["basicConstraints must be present"]
        );
        assert_eq!(
            key_usage(&[]).failures().collect::<Vec<_>>(),
            vec!["keyUsage must be present"]
        );
        assert_eq!(
            certificate_policies(&resolve(Sector::Public), &[])
                .failures()
                .collect::<Vec<_>>(),
            vec!["certificatePolicies must be present"]
        );
    }

    #[test]
    fn key_usage_must_be_critical() {
        let report = key_usage(&[ExtensionSpec::from_extension(KeyUsage::spid(), false)]);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["keyUsage must be set as critical"]
        );
    }

    #[test]
    fn key_usage_flags() {
        let usage = KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment);
        let report = key_usage(&[ExtensionSpec::from_extension(usage, true)]);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["contentCommitment must be set", "keyEncipherment must be unset"]
        );
    }

    fn decoded_key_usage(usage: KeyUsage) -> ExtensionSpec {
        let x509 = ExtensionSpec::from_extension(usage, true)
            .to_x509_extension()
            .unwrap();
        ExtensionSpec::from_x509_extension(&x509)
    }

    #[test]
    fn decipher_only_must_be_unset() {
        let ext = decoded_key_usage(KeyUsage(
            KeyUsages::DigitalSignature | KeyUsages::NonRepudiation | KeyUsages::DecipherOnly,
        ));
        assert_eq!(
            key_usage(&[ext]).failures().collect::<Vec<_>>(),
            vec!["decipherOnly must be unset"]
        );
    }

    #[test]
    fn encipher_only_must_be_unset() {
        let ext = decoded_key_usage(KeyUsage(
            KeyUsages::DigitalSignature | KeyUsages::NonRepudiation | KeyUsages::EncipherOnly,
        ));
        assert_eq!(
            key_usage(&[ext]).failures().collect::<Vec<_>>(),
            vec!["encipherOnly must be unset"]
        );
    }

    #[test]
    fn sector_policies_pass() {
        for sector in [Sector::Public, Sector::Private] {
            let ext = ExtensionSpec::from_extension(policies_for(sector), false);
            let report = certificate_policies(&resolve(sector), &[ext]);
            assert!(report.passed(), "{:?}", report.failures().collect::<Vec<_>>());
        }
    }

    #[test]
    fn public_policies_fail_private_profile() {
        let ext = ExtensionSpec::from_extension(policies_for(Sector::Public), false);
        let report = certificate_policies(&resolve(Sector::Private), &[ext]);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["policy 1.3.76.16.4.3.1 must be present"]
        );
    }

    #[test]
    fn wrong_explicit_text_is_reported() {
        let mut policies = policies_for(Sector::Private);
        policies.policies[2] = PolicyEntry::with_notice(oid::POLICY_SP_PRIVATE, "cert_SP_Pub");
        let ext = ExtensionSpec::from_extension(policies, false);
        let report = certificate_policies(&resolve(Sector::Private), &[ext]);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["policy 1.3.76.16.4.3.1 must have UserNotice.ExplicitText=cert_SP_Priv (now: cert_SP_Pub)"]
        );
    }
}
