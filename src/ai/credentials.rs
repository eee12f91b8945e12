use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "com.docsense.cli";

/// Provider name used for the Gemini key in the keychain
pub const GEMINI_PROVIDER: &str = "gemini";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No API key found. Set {env_var} in .env or run `docsense key set`.")]
    NotFound { env_var: String },

    #[error("Invalid API key: {0}")]
    Invalid(String),

    #[error("Keychain error: {0}")]
    Keychain(String),
}

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Keychain,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Keychain => "keychain",
        }
    }
}

/// Environment variable holding the key for a provider
pub fn env_var_for(provider: &str) -> String {
    match provider {
        GEMINI_PROVIDER => "GOOGLE_API_KEY".to_string(),
        other => format!("{}_API_KEY", other.to_uppercase()),
    }
}

/// Credential manager: environment first, then the OS keychain
pub struct CredentialManager;

impl CredentialManager {
    /// Store an API key in the keychain
    pub fn store_api_key(provider: &str, api_key: &str) -> Result<(), CredentialError> {
        validate_api_key(api_key)?;

        let entry = Entry::new(SERVICE_NAME, provider)
            .map_err(|e| CredentialError::Keychain(e.to_string()))?;
        entry
            .set_password(api_key)
            .map_err(|e| CredentialError::Keychain(e.to_string()))?;

        tracing::info!(provider, "Stored API key in keychain");
        Ok(())
    }

    /// Get an API key, checking the environment before the keychain
    pub fn get_api_key(provider: &str) -> Result<String, CredentialError> {
        Self::resolve(provider, |name| std::env::var(name).ok()).map(|(key, _)| key)
    }

    /// Delete an API key from the keychain. Missing entries are not an error.
    pub fn delete_api_key(provider: &str) -> Result<(), CredentialError> {
        let entry = Entry::new(SERVICE_NAME, provider)
            .map_err(|e| CredentialError::Keychain(e.to_string()))?;

        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                tracing::info!(provider, "Deleted API key from keychain");
                Ok(())
            }
            Err(e) => Err(CredentialError::Keychain(e.to_string())),
        }
    }

    /// Check if an API key is configured
    pub fn has_api_key(provider: &str) -> bool {
        Self::get_api_key(provider).is_ok()
    }

    /// Which source would supply the key, if any
    pub fn key_source(provider: &str) -> Option<KeySource> {
        Self::resolve(provider, |name| std::env::var(name).ok())
            .ok()
            .map(|(_, source)| source)
    }

    fn resolve(
        provider: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(String, KeySource), CredentialError> {
        let env_var = env_var_for(provider);

        if let Some(key) = from_env(&env_var, &lookup)? {
            return Ok((key, KeySource::Environment));
        }

        let entry = Entry::new(SERVICE_NAME, provider)
            .map_err(|e| CredentialError::Keychain(e.to_string()))?;
        match entry.get_password() {
            Ok(key) => {
                validate_api_key(&key)?;
                tracing::debug!(provider, "Retrieved API key from keychain");
                Ok((key, KeySource::Keychain))
            }
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound { env_var }),
            Err(e) => {
                tracing::debug!(provider, error = %e, "Keychain unavailable");
                Err(CredentialError::NotFound { env_var })
            }
        }
    }
}

/// Key from the environment. Empty values count as unset.
fn from_env(
    env_var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, CredentialError> {
    match lookup(env_var) {
        Some(key) if !key.trim().is_empty() => {
            validate_api_key(&key)?;
            Ok(Some(key))
        }
        _ => Ok(None),
    }
}

/// Reject obvious placeholders and copy-paste accidents before a request is made
pub fn validate_api_key(key: &str) -> Result<(), CredentialError> {
    let key_lower = key.to_lowercase();

    let placeholder_patterns = [
        "your-api-key",
        "your_api_key",
        "your api key",
        "yourapikey",
        "api-key-here",
        "api_key_here",
        "enter-your",
        "enter_your",
        "replace-with",
        "replace_with",
        "placeholder",
    ];

    if let Some(pattern) = placeholder_patterns.iter().find(|p| key_lower.contains(*p)) {
        return Err(CredentialError::Invalid(format!(
            "key looks like a placeholder (contains '{}')",
            pattern
        )));
    }

    if key.trim() != key {
        return Err(CredentialError::Invalid(
            "key has leading or trailing whitespace".to_string(),
        ));
    }

    if key.contains('\n') || key.contains('\r') {
        return Err(CredentialError::Invalid(
            "key contains newline characters".to_string(),
        ));
    }

    if key.len() < 20 {
        return Err(CredentialError::Invalid("key is too short".to_string()));
    }

    Ok(())
}
