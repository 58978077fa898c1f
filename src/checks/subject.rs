use const_oid::ObjectIdentifier;

use super::CheckReport;
use crate::cert::params::SubjectAttribute;
use crate::country::CountryLookup;
use crate::oid;
use crate::profile::CertificateProfile;

fn label(attribute: &ObjectIdentifier) -> String {
    format!("[{}, {}]", oid::attribute_name(attribute), attribute)
}

/// Checks the subject distinguished name against the sector profile.
pub fn subject_dn(
    profile: &CertificateProfile,
    subject: &[SubjectAttribute],
    countries: &dyn CountryLookup,
) -> CheckReport {
    let mut report = CheckReport::new();
    let present = |oid: &ObjectIdentifier| subject.iter().any(|a| a.attribute == *oid);

    for forbidden in &profile.forbidden_attributes {
        report.record(
            !present(forbidden),
            format!("Name attribute {} is not allowed in subjectDN", label(forbidden)),
        );
    }

    for mandatory in &profile.mandatory_attributes {
        report.record(
            present(mandatory),
            format!("Name attribute {} must be present in subjectDN", label(mandatory)),
        );
    }

    for attr in subject {
        let name = label(&attr.attribute);
        let value = attr.value.as_str();

        report.record(
            !value.is_empty(),
            format!("Value for name attribute {name} can not be empty"),
        );

        if attr.attribute == oid::ORGANIZATION_IDENTIFIER {
            let pattern = &profile.organization_identifier;
            report.record(
                pattern.is_match(value),
                format!(
                    "Value for name attribute {name} must match [{}] (now: {value})",
                    pattern.as_str()
                ),
            );
        }

        if attr.attribute == oid::COUNTRY_NAME {
            report.record(
                countries.is_valid_alpha2(value),
                format!("Value for name attribute {name} is not a valid country code ({value})"),
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::Iso3166;
    use crate::profile::{Sector, resolve};

    fn public_subject() -> Vec<SubjectAttribute> {
        vec![
            SubjectAttribute::new(oid::ORGANIZATION_NAME, "Comune di Roma"),
            SubjectAttribute::new(oid::COMMON_NAME, "SPID SP"),
            SubjectAttribute::new(oid::URI, "https://sp.example.it"),
            SubjectAttribute::new(oid::ORGANIZATION_IDENTIFIER, "PA:IT-c_h501"),
            SubjectAttribute::new(oid::COUNTRY_NAME, "IT"),
            SubjectAttribute::new(oid::LOCALITY_NAME, "Roma"),
        ]
    }

    #[test]
    fn compliant_subject_passes() {
        let report = subject_dn(&resolve(Sector::Public), &public_subject(), &Iso3166);
        assert!(report.passed(), "{:?}", report.failures().collect::<Vec<_>>());
    }

    #[test]
    fn missing_uri_is_reported() {
        let subject: Vec<_> = public_subject()
            .into_iter()
            .filter(|a| a.attribute != oid::URI)
            .collect();
        let report = subject_dn(&resolve(Sector::Public), &subject, &Iso3166);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["Name attribute [uri, 2.5.4.83] must be present in subjectDN"]
        );
    }

    #[test]
    fn empty_value_is_reported() {
        let mut subject = public_subject();
        subject[1].value.clear();
        let report = subject_dn(&resolve(Sector::Public), &subject, &Iso3166);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec!["Value for name attribute [commonName, 2.5.4.3] can not be empty"]
        );
    }

    #[test]
    fn org_id_must_match_sector() {
        let report = subject_dn(&resolve(Sector::Private), &public_subject(), &Iso3166);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec![
                "Value for name attribute [organizationIdentifier, 2.5.4.97] must match \
                 [^(CF:IT-[a-zA-Z0-9]{16}|VATIT-\\d{11})$] (now: PA:IT-c_h501)"
            ]
        );
    }
}
