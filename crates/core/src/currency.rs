//! Supported payment currencies and their display defaults.
//!
//! The supported list is what the payment processor accepts for simple
//! payment buttons. Precision and symbol drive both price validation
//! (allowed decimal places) and price formatting.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Currency defaults
// ---------------------------------------------------------------------------

/// Display defaults for a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyDefaults {
    /// Number of decimal places a price may carry.
    pub precision: u8,
    /// Symbol shown next to formatted prices.
    pub symbol: &'static str,
}

/// Defaults used when a currency code has no table entry.
pub const FALLBACK_DEFAULTS: CurrencyDefaults = CurrencyDefaults {
    precision: 2,
    symbol: "$",
};

/// Currency codes accepted for simple payments, in display order.
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "USD", "EUR", "AUD", "BRL", "CAD", "CZK", "DKK", "HKD", "HUF", "ILS", "JPY", "MYR", "MXN",
    "TWD", "NZD", "NOK", "PHP", "PLN", "GBP", "RUB", "SGD", "SEK", "CHF", "THB",
];

const fn defaults(precision: u8, symbol: &'static str) -> CurrencyDefaults {
    CurrencyDefaults { precision, symbol }
}

const CURRENCY_TABLE: &[(&str, CurrencyDefaults)] = &[
    ("AUD", defaults(2, "A$")),
    ("BRL", defaults(2, "R$")),
    ("CAD", defaults(2, "C$")),
    ("CHF", defaults(2, "CHF")),
    ("CZK", defaults(2, "Kč")),
    ("DKK", defaults(2, "kr.")),
    ("EUR", defaults(2, "€")),
    ("GBP", defaults(2, "£")),
    ("HKD", defaults(2, "HK$")),
    ("HUF", defaults(0, "Ft")),
    ("ILS", defaults(2, "₪")),
    ("JPY", defaults(0, "¥")),
    ("MXN", defaults(2, "MX$")),
    ("MYR", defaults(2, "RM")),
    ("NOK", defaults(2, "kr")),
    ("NZD", defaults(2, "NZ$")),
    ("PHP", defaults(2, "₱")),
    ("PLN", defaults(2, "zł")),
    ("RUB", defaults(2, "₽")),
    ("SEK", defaults(2, "kr")),
    ("SGD", defaults(2, "S$")),
    ("THB", defaults(2, "฿")),
    ("TWD", defaults(0, "NT$")),
    ("USD", defaults(2, "$")),
];

/// Look up the display defaults for a currency code.
pub fn currency_defaults(code: &str) -> Option<CurrencyDefaults> {
    CURRENCY_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, d)| *d)
}

/// Whether `code` is one of [`SUPPORTED_CURRENCIES`].
pub fn is_supported_currency(code: &str) -> bool {
    SUPPORTED_CURRENCIES.iter().any(|c| *c == code)
}

/// Resolve `code` to its canonical `'static` entry in the supported list.
pub fn require_supported(code: &str) -> Result<&'static str, CoreError> {
    SUPPORTED_CURRENCIES
        .iter()
        .copied()
        .find(|c| *c == code)
        .ok_or_else(|| CoreError::UnsupportedCurrency(code.to_string()))
}

// ---------------------------------------------------------------------------
// Lookup capability
// ---------------------------------------------------------------------------

/// Source of currency metadata consumed by price validation.
///
/// Implemented for [`DefaultCurrencies`] (the built-in table) and for any
/// `Fn(&str) -> Option<CurrencyDefaults>`, which keeps tests and callers with
/// their own metadata free of wrapper types.
pub trait CurrencyLookup {
    fn lookup(&self, code: &str) -> Option<CurrencyDefaults>;
}

/// The built-in currency table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCurrencies;

impl CurrencyLookup for DefaultCurrencies {
    fn lookup(&self, code: &str) -> Option<CurrencyDefaults> {
        currency_defaults(code)
    }
}

impl<F> CurrencyLookup for F
where
    F: Fn(&str) -> Option<CurrencyDefaults>,
{
    fn lookup(&self, code: &str) -> Option<CurrencyDefaults> {
        self(code)
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format `price` with the currency's precision, optionally followed by its
/// symbol (`"10.00 $"`). A trailing `.` on the symbol is dropped, so Danish
/// kroner render as `kr` rather than `kr.`.
pub fn format_price(price: f64, code: &str, with_symbol: bool) -> String {
    let CurrencyDefaults { precision, symbol } =
        currency_defaults(code).unwrap_or(FALLBACK_DEFAULTS);
    let value = format!("{price:.prec$}", prec = usize::from(precision));
    if with_symbol {
        format!("{value} {}", symbol.trim_end_matches('.'))
    } else {
        value
    }
}

/// One entry of the currency picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyOption {
    pub value: &'static str,
    pub label: String,
}

/// Picker entries for every supported currency.
///
/// The label repeats the symbol after the code unless the symbol *is* the
/// code (`CHF`).
pub fn currency_options() -> Vec<CurrencyOption> {
    SUPPORTED_CURRENCIES
        .iter()
        .map(|&value| {
            let symbol = currency_defaults(value)
                .unwrap_or(FALLBACK_DEFAULTS)
                .symbol;
            let label = if symbol == value {
                value.to_string()
            } else {
                format!("{value} {}", symbol.trim_end_matches('.'))
            };
            CurrencyOption { value, label }
        })
        .collect()
}
