//! API key resolution from the environment.
//!
//! The key is read once at startup and wrapped in a [`SecretString`] so it is
//! never printed by `Debug` or logged by accident.

use secrecy::SecretString;

/// Read the API key from the environment variable `name`.
///
/// Returns `None` when the variable is unset, empty, or not valid Unicode.
pub fn resolve_api_key(name: &str) -> Option<SecretString> {
    resolve_with(name, |key| std::env::var(key).ok())
}

/// Like [`resolve_api_key`], with an injectable lookup.
pub fn resolve_with<F>(name: &str, lookup: F) -> Option<SecretString>
where
    F: FnOnce(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}
