//! Lookup of public administration codes in the IndicePA registry.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Result, SpidError};

pub const INDICEPA_DETAIL_URL: &str =
    "https://indicepa.gov.it/ricerca/n-dettaglioamministrazione.php";

/// Confirms that an organization code exists.
pub trait RegistryLookup {
    /// Returns `Ok(false)` when the registry answered but does not know `code`.
    fn lookup(&self, code: &str) -> Result<bool>;

    /// A page where a human can check `code`, quoted in error messages.
    fn detail_url(&self, _code: &str) -> Option<String> {
        None
    }
}

/// Queries the public IndicePA detail page.
///
/// The code is considered known when it appears in the response body.
pub struct IndicePaRegistry {
    client: Client,
    base_url: String,
}

impl IndicePaRegistry {
    pub fn new() -> Result<Self> {
        Self::with_base_url(INDICEPA_DETAIL_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SpidError::ExternalLookup(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, code: &str) -> Result<Url> {
        Url::parse_with_params(&self.base_url, &[("cod_amm", code)])
            .map_err(|e| SpidError::ExternalLookup(format!("Invalid registry URL: {e}")))
    }
}

impl RegistryLookup for IndicePaRegistry {
    fn lookup(&self, code: &str) -> Result<bool> {
        let url = self.url(code)?;
        debug!(%url, "querying IndicePA");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.text())
            .map_err(|e| SpidError::ExternalLookup(format!("IndicePA lookup failed: {e}")))?;

        Ok(body.contains(code))
    }

    fn detail_url(&self, code: &str) -> Option<String> {
        self.url(code).ok().map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_url_carries_the_code() {
        let registry = IndicePaRegistry::new().unwrap();
        assert_eq!(
            registry.detail_url("c_h501").as_deref(),
            Some("https://indicepa.gov.it/ricerca/n-dettaglioamministrazione.php?cod_amm=c_h501")
        );
    }
}
