//! Configuration loading
//!
//! Credentials and region come from the process environment, optionally
//! populated beforehand from a `.env` style file. Nothing is validated beyond
//! presence: missing credentials show up as an authentication failure on the
//! first provider call.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Access key id variable
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

/// Secret access key variable
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Default region variable
pub const ENV_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

/// Region variable consulted when the default region is unset
pub const ENV_REGION: &str = "AWS_REGION";

/// Endpoint override for S3-compatible servers
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Placeholder printed instead of secret values
const MASK: &str = "********";

/// Placeholder printed for unset values
const UNSET: &str = "<unset>";

/// Resolved configuration, read once per process
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Access key id
    pub access_key_id: Option<String>,

    /// Secret access key
    pub secret_access_key: Option<String>,

    /// Region
    pub region: Option<String>,

    /// Variable the region was read from
    pub region_source: Option<&'static str>,

    /// Custom endpoint (S3-compatible servers)
    pub endpoint_url: Option<Url>,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// With `env_file` set, that file must exist and is loaded first. Without
    /// it, a `.env` in the working directory is loaded when present; a `.env`
    /// that exists but cannot be parsed is a [`Error::Config`]. Variables
    /// already set in the process take precedence over file values.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    Error::Config(format!("Failed to load env file {}: {e}", path.display()))
                })?;
                tracing::debug!(path = %path.display(), "Loaded env file");
            }
            None => {
                if let Some(path) = check_default_env(dotenvy::dotenv())? {
                    tracing::debug!(path = %path.display(), "Loaded .env file");
                }
            }
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let endpoint_url = get(ENV_ENDPOINT_URL)
            .map(|raw| Url::parse(&raw))
            .transpose()?;

        let (region, region_source) = match get(ENV_DEFAULT_REGION) {
            Some(region) => (Some(region), Some(ENV_DEFAULT_REGION)),
            None => match get(ENV_REGION) {
                Some(region) => (Some(region), Some(ENV_REGION)),
                None => (None, None),
            },
        };

        Ok(Self {
            access_key_id: get(ENV_ACCESS_KEY_ID),
            secret_access_key: get(ENV_SECRET_ACCESS_KEY),
            region,
            region_source,
            endpoint_url,
        })
    }

    /// Key id and secret, when both halves of the pair are present
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Startup diagnostic lines, `NAME: value`
    ///
    /// The secret access key is always masked.
    pub fn summary(&self) -> Vec<String> {
        let show = |v: &Option<String>| v.as_deref().unwrap_or(UNSET).to_string();
        let secret = if self.secret_access_key.is_some() {
            MASK.to_string()
        } else {
            UNSET.to_string()
        };

        let mut lines = vec![
            format!("{ENV_ACCESS_KEY_ID}: {}", show(&self.access_key_id)),
            format!("{ENV_SECRET_ACCESS_KEY}: {secret}"),
            format!(
                "{}: {}",
                self.region_source.unwrap_or(ENV_DEFAULT_REGION),
                show(&self.region)
            ),
        ];
        if let Some(endpoint) = &self.endpoint_url {
            lines.push(format!("{ENV_ENDPOINT_URL}: {endpoint}"));
        }
        lines
    }
}

/// Treat a missing default `.env` as absent; any other failure is an error
///
/// dotenvy stops at the first malformed line, so a partially read file is
/// rejected rather than silently half-applied.
fn check_default_env(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Config(format!("Failed to load .env file: {e}"))),
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| MASK),
            )
            .field("region", &self.region)
            .field("region_source", &self.region_source)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}
