//! Environment configuration for `spay-check`.

use spay_core::currency::require_supported;
use spay_core::error::CoreError;

/// Currency applied to drafts that do not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Log filter used when `RUST_LOG` is unset. Core fallback warnings stay
/// visible.
pub const DEFAULT_LOG_FILTER: &str = "spay_check=info,spay_core=warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_currency: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let default_currency = match lookup("SPAY_DEFAULT_CURRENCY") {
            Some(code) => require_supported(code.trim())?,
            None => DEFAULT_CURRENCY,
        };
        Ok(Self { default_currency })
    }
}
