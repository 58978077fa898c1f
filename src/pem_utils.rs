use crate::error::{Result, SpidError};

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode(&pem)
}

/// Split a PEM envelope into its label and DER payload.
///
/// The text must start with a `-----BEGIN ` line and end with an
/// `-----END ` line once surrounding whitespace is trimmed.
pub fn decode_envelope(text: &str) -> Result<(String, Vec<u8>)> {
    let trimmed = text.trim();
    if !trimmed.starts_with("-----BEGIN ") {
        return Err(SpidError::Format("missing BEGIN marker".to_string()));
    }
    let last_line = trimmed.lines().last().unwrap_or_default();
    if !last_line.starts_with("-----END ") {
        return Err(SpidError::Format("missing END marker".to_string()));
    }

    let pem = pem::parse(trimmed).map_err(|e| SpidError::Format(e.to_string()))?;
    Ok((pem.tag().to_string(), pem.into_contents()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_label_and_payload() {
        let text = der_to_pem(&[0x30, 0x00], "CERTIFICATE");
        let (label, der) = decode_envelope(&format!("\n{text}\n")).unwrap();
        assert_eq!(label, "CERTIFICATE");
        assert_eq!(der, vec![0x30, 0x00]);
    }

    #[test]
    fn rejects_missing_markers() {
        assert!(matches!(
            decode_envelope("MIIB..."),
            Err(SpidError::Format(_))
        ));
        assert!(matches!(
            decode_envelope("-----BEGIN CERTIFICATE-----\nMAA=\n"),
            Err(SpidError::Format(_))
        ));
    }
}
