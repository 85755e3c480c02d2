//! Custody credentials from the environment.
//!
//! # Security
//! - Credentials are loaded ONLY from environment variables
//! - Values are never logged or serialized; `Debug` redacts them

/// Environment variable holding the custody API key id.
pub const API_KEY_ID_ENV_VAR: &str = "CDP_API_KEY_ID";
/// Environment variable holding the custody API key secret.
pub const API_KEY_SECRET_ENV_VAR: &str = "CDP_API_KEY_SECRET";
/// Environment variable holding the wallet secret.
pub const WALLET_SECRET_ENV_VAR: &str = "CDP_WALLET_SECRET";

/// The three secrets needed to talk to the custody service.
#[derive(Clone)]
pub struct Credentials {
    pub api_key_id: String,
    pub api_key_secret: String,
    pub wallet_secret: String,
}

impl Credentials {
    /// Read all three variables. `None` unless every one is set and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Credentials::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Some(Self {
            api_key_id: read(API_KEY_ID_ENV_VAR)?,
            api_key_secret: read(API_KEY_SECRET_ENV_VAR)?,
            wallet_secret: read(WALLET_SECRET_ENV_VAR)?,
        })
    }

    /// Whether the environment currently carries a full credential set.
    pub fn available() -> bool {
        Self::from_env().is_some()
    }

    /// Value of the `Authorization` header sent to the custody API. A static
    /// key pair, not a signed JWT; see the `custody::client` module docs.
    pub fn bearer(&self) -> String {
        format!("Bearer {}:{}", self.api_key_id, self.api_key_secret)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key_id", &self.api_key_id)
            .field("api_key_secret", &"<redacted>")
            .field("wallet_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_present() {
        let creds = Credentials::from_lookup(lookup(&[
            (API_KEY_ID_ENV_VAR, "id"),
            (API_KEY_SECRET_ENV_VAR, "secret"),
            (WALLET_SECRET_ENV_VAR, "wallet"),
        ]))
        .unwrap();
        assert_eq!(creds.bearer(), "Bearer id:secret");
    }

    #[test]
    fn test_missing_or_empty() {
        assert!(Credentials::from_lookup(lookup(&[
            (API_KEY_ID_ENV_VAR, "id"),
            (API_KEY_SECRET_ENV_VAR, "secret"),
        ]))
        .is_none());

        assert!(Credentials::from_lookup(lookup(&[
            (API_KEY_ID_ENV_VAR, "id"),
            (API_KEY_SECRET_ENV_VAR, ""),
            (WALLET_SECRET_ENV_VAR, "wallet"),
        ]))
        .is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let creds = Credentials {
            api_key_id: "id".into(),
            api_key_secret: "top-secret".into(),
            wallet_secret: "also-secret".into(),
        };
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("top-secret"));
        assert!(!printed.contains("also-secret"));
    }
}
