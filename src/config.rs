// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration read from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5678/api/";
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const STORE_FILE: &str = "store.json";

/// API endpoint, storage location and HTTP timeout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_base: Url,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    /// Read `FOLIO_API_URL`, `FOLIO_DATA_DIR` and `FOLIO_HTTP_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_url = lookup("FOLIO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base = parse_api_base(&raw_url)?;

        let data_dir = lookup("FOLIO_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let http_timeout = match lookup("FOLIO_HTTP_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("FOLIO_HTTP_TIMEOUT_MS is not a number: {raw:?}"))?;
                if ms == 0 {
                    bail!("FOLIO_HTTP_TIMEOUT_MS must be greater than zero");
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        Ok(Self {
            api_base,
            data_dir,
            http_timeout,
        })
    }

    /// Location of the key-value store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }
}

/// Parse the API root and force a trailing slash so relative joins stay below it.
fn parse_api_base(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw.trim()).with_context(|| format!("FOLIO_API_URL is not a valid URL: {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("FOLIO_API_URL must use http or https: {raw:?}");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("folio"))
        .unwrap_or_else(|| PathBuf::from(".folio"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_api() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:5678/api/");
        assert_eq!(config.http_timeout, Duration::from_millis(5000));
        assert!(config.store_path().ends_with("store.json"));
    }

    // A missing trailing slash would make `join("works")` replace the last segment.
    #[test]
    fn api_url_gets_trailing_slash() {
        let config = config_from(&[("FOLIO_API_URL", "https://example.com/api")]).unwrap();
        assert_eq!(config.api_base.join("works").unwrap().as_str(), "https://example.com/api/works");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("FOLIO_API_URL", "not a url")]).is_err());
        assert!(config_from(&[("FOLIO_API_URL", "ftp://example.com/")]).is_err());
        assert!(config_from(&[("FOLIO_HTTP_TIMEOUT_MS", "soon")]).is_err());
        assert!(config_from(&[("FOLIO_HTTP_TIMEOUT_MS", "0")]).is_err());
    }

    #[test]
    fn data_dir_override_is_used() {
        let config = config_from(&[("FOLIO_DATA_DIR", "/tmp/folio-test")]).unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/tmp/folio-test/store.json"));
    }
}
