use crate::prelude::*;
use std::path::Path;
use std::time::Duration;

const SIGNUP_URL: &str = "https://api.data.gov/signup/";

/// Resolved settings for talking to the College Scorecard API
#[derive(Debug, Clone)]
pub struct ScorecardConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ScorecardConfig {
    /// Build the configuration from global CLI options
    ///
    /// An explicit `--api-key` (or `SCORECARD_API_KEY`) wins over the key file.
    pub fn from_global(global: &crate::Global) -> Result<Self, Error> {
        let api_key = match global.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => load_api_key(&global.api_key_file)?,
        };

        Ok(Self {
            api_key,
            base_url: global.base_url.clone(),
            timeout: Duration::from_secs(global.timeout),
        })
    }
}

/// Read the API key from a file, trimming surrounding whitespace
pub fn load_api_key(path: &Path) -> Result<String, Error> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read API key from {}: {e}. Get a key at {SIGNUP_URL} and save it to that file, or pass --api-key.",
            path.display()
        ))
    })?;

    let key = contents.trim();
    if key.is_empty() {
        return Err(Error::Config(format!(
            "API key file {} is empty. Get a key at {SIGNUP_URL}.",
            path.display()
        )));
    }

    Ok(key.to_string())
}
