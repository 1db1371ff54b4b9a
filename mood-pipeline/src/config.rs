//! Catalog credential resolution
//!
//! Provides two-tier credential resolution with ENV → TOML priority.

use mood_common::config::ResolverConfig;
use mood_common::{Error, Result};
use tracing::{info, warn};

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// OAuth client-credentials pair
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Resolve catalog credentials
///
/// **Priority:** ENV → TOML. Each half of the pair is resolved on its own,
/// so an id from the environment may be combined with a secret from TOML.
pub fn resolve_client_credentials(config: &ResolverConfig) -> Result<ClientCredentials> {
    let client_id = resolve_value(
        "client id",
        std::env::var(CLIENT_ID_ENV).ok(),
        config.client_id.as_deref(),
    );
    let client_secret = resolve_value(
        "client secret",
        std::env::var(CLIENT_SECRET_ENV).ok(),
        config.client_secret.as_deref(),
    );

    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Ok(ClientCredentials {
            client_id,
            client_secret,
        }),
        _ => Err(Error::Config(format!(
            "Catalog credentials not configured. Set both using one of:\n\
             1. Environment: {}=... and {}=...\n\
             2. TOML config: [resolver] client_id = \"...\", client_secret = \"...\"",
            CLIENT_ID_ENV, CLIENT_SECRET_ENV
        ))),
    }
}

fn resolve_value(name: &str, env_value: Option<String>, toml_value: Option<&str>) -> Option<String> {
    let env_value = env_value.filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "Catalog {} found in both environment and TOML config. Using environment (highest priority).",
            name
        );
    }

    if let Some(value) = env_value {
        info!("Catalog {} loaded from environment variable", name);
        return Some(value);
    }

    toml_value.map(|value| {
        info!("Catalog {} loaded from TOML config", name);
        value.to_string()
    })
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
