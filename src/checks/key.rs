use super::CheckReport;
use crate::parsed::{KeyAlgorithm, PublicKeyInfo};
use crate::profile::CertificateProfile;

/// RSA key whose size is at least the minimum and one of the allowed sizes.
///
/// Both size rules are evaluated independently and may fail together.
pub fn key_type_and_size(profile: &CertificateProfile, key: &PublicKeyInfo) -> CheckReport {
    let mut report = CheckReport::new();

    report.record(key.algorithm == KeyAlgorithm::Rsa, "The keypair must be RSA");

    let size = key.bits.unwrap_or(0);
    report.record(
        size >= profile.min_key_size,
        format!(
            "The key size must be greater than or equal to {} (now: {size})",
            profile.min_key_size
        ),
    );
    report.record(
        profile.allows_key_size(size),
        format!(
            "The key size must be one of {:?} (now: {size})",
            profile.allowed_key_sizes
        ),
    );

    report
}

pub fn digest_algorithm(profile: &CertificateProfile, digest: &str) -> CheckReport {
    let allowed: Vec<&str> = profile.allowed_digests.iter().map(|d| d.name()).collect();
    let mut report = CheckReport::new();
    report.record(
        profile.allows_digest(digest),
        format!("The digest algorithm must be one of {allowed:?} (now: {digest})"),
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Sector, resolve};

    fn rsa(bits: usize) -> PublicKeyInfo {
        PublicKeyInfo {
            algorithm: KeyAlgorithm::Rsa,
            bits: Some(bits),
        }
    }

    #[test]
    fn accepts_allowed_rsa_sizes() {
        let profile = resolve(Sector::Public);
        for bits in [2048, 3072, 4096] {
            assert!(key_type_and_size(&profile, &rsa(bits)).passed());
        }
    }

    #[test]
    fn small_key_fails_both_size_rules() {
        let profile = resolve(Sector::Public);
        let report = key_type_and_size(&profile, &rsa(1024));
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(
            failures,
            vec![
                "The key size must be greater than or equal to 2048 (now: 1024)",
                "The key size must be one of [2048, 3072, 4096] (now: 1024)",
            ]
        );
    }

    #[test]
    fn odd_size_above_minimum_fails_only_membership() {
        let profile = resolve(Sector::Private);
        let report = key_type_and_size(&profile, &rsa(2560));
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn non_rsa_key_is_rejected() {
        let profile = resolve(Sector::Public);
        let key = PublicKeyInfo {
            algorithm: KeyAlgorithm::Other(crate::oid::ECDSA_WITH_SHA256),
            bits: None,
        };
        let report = key_type_and_size(&profile, &key);
        assert_eq!(report.failures().next(), Some("The keypair must be RSA"));
    }

    #[test]
    fn digest_must_be_allowed() {
        let profile = resolve(Sector::Public);
        assert!(digest_algorithm(&profile, "sha512").passed());
        let report = digest_algorithm(&profile, "sha1");
        assert_eq!(
            report.failures().next(),
            Some("The digest algorithm must be one of [\"sha256\", \"sha512\"] (now: sha1)")
        );
    }
}
