//! Field validation for product drafts -- pure logic, no persistence.
//!
//! Each validator checks one attribute and yields an optional message. The
//! draft is valid only when title, price, currency and email all pass.
//! Currency never produces a message: the picker only offers supported
//! codes, so the check exists to keep unsupported values from being saved.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::draft::ProductDraft;
use super::price::Price;
use crate::currency::{is_supported_currency, CurrencyLookup, FALLBACK_DEFAULTS};

/// Top-level domain label: a letter, then letters or digits with single
/// inner hyphens, at least two characters in total.
static TLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z](?:-?[a-zA-Z0-9])+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const TITLE_REQUIRED: &str =
    "Please add a brief title so that people know what they’re paying for.";

pub const EMAIL_REQUIRED: &str =
    "We want to make sure payments reach you, so please add an email address.";

pub const PRICE_REQUIRED: &str =
    "If you’re selling something, you need a price tag. Add yours here.";

pub const PRICE_INVALID: &str = "Invalid price";

pub const PRICE_NEGATIVE: &str =
    "Your price is negative — enter a positive number so people can pay the right amount.";

pub const PRICE_NO_DECIMALS: &str =
    "We know every penny counts, but prices can’t contain decimal values.";

/// Message for an email that is present but not a valid address.
pub fn email_invalid_message(email: &str) -> String {
    format!("{email} is not a valid email address.")
}

/// Message for a price with more decimals than the currency allows.
pub fn price_precision_message(precision: u8) -> String {
    let unit = if precision == 1 { "place" } else { "places" };
    format!("The price cannot have more than {precision} decimal {unit}.")
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Draft fields that carry an error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Title,
    Price,
    Email,
}

impl ProductField {
    /// Map a persisted meta key reported by the server back to its field.
    pub fn from_meta_key(key: &str) -> Option<Self> {
        match key {
            "spay_email" => Some(Self::Email),
            "spay_price" => Some(Self::Price),
            _ => None,
        }
    }
}

/// Per-field error messages; `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub price: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn get(&self, field: ProductField) -> Option<&str> {
        match field {
            ProductField::Title => self.title.as_deref(),
            ProductField::Price => self.price.as_deref(),
            ProductField::Email => self.email.as_deref(),
        }
    }

    pub fn set(&mut self, field: ProductField, message: Option<String>) {
        let slot = match field {
            ProductField::Title => &mut self.title,
            ProductField::Price => &mut self.price,
            ProductField::Email => &mut self.email,
        };
        *slot = message;
    }

    pub fn clear(&mut self, field: ProductField) {
        self.set(field, None);
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.price.is_none() && self.email.is_none()
    }
}

/// Outcome of validating one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub currency_valid: bool,
    pub errors: FieldErrors,
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate every field of `draft`.
///
/// All four checks always run; messages are kept even when another field
/// already failed.
pub fn validate(draft: &ProductDraft, currencies: &impl CurrencyLookup) -> ValidationResult {
    let price = validate_price(draft.price.as_ref(), draft.currency.as_deref(), currencies);
    let title = validate_title(draft.title.as_deref());
    let email = validate_email(draft.email.as_deref());
    let currency_valid = validate_currency(draft.currency.as_deref());

    let errors = FieldErrors {
        title,
        price,
        email,
    };

    ValidationResult {
        is_valid: errors.is_empty() && currency_valid,
        currency_valid,
        errors,
    }
}

pub fn validate_title(title: Option<&str>) -> Option<String> {
    match title {
        None | Some("") => Some(TITLE_REQUIRED.to_string()),
        Some(_) => None,
    }
}

pub fn validate_email(email: Option<&str>) -> Option<String> {
    match email {
        None | Some("") => Some(EMAIL_REQUIRED.to_string()),
        Some(address) if !is_valid_email(address) => Some(email_invalid_message(address)),
        Some(_) => None,
    }
}

/// RFC-style address check plus a dotted domain ending in a real TLD, so
/// bare hosts like `seller@example` or `a@localhost` are rejected.
pub fn is_valid_email(address: &str) -> bool {
    if !address.validate_email() {
        return false;
    }
    let Some((_, domain)) = address.rsplit_once('@') else {
        return false;
    };
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && TLD_RE.is_match(tld))
}

pub fn validate_currency(currency: Option<&str>) -> bool {
    currency.is_some_and(is_supported_currency)
}

/// Validate a price against the precision of `currency`.
///
/// Steps run in order and the first failure wins: missing or zero, not a
/// number, negative, too many decimal places. An unknown currency falls
/// back to two decimal places.
pub fn validate_price(
    price: Option<&Price>,
    currency: Option<&str>,
    currencies: &impl CurrencyLookup,
) -> Option<String> {
    let price = match price {
        Some(p) if p.is_present() => p,
        _ => return Some(PRICE_REQUIRED.to_string()),
    };

    let value = match price.parse() {
        Some(v) if v == 0.0 => return Some(PRICE_REQUIRED.to_string()),
        Some(v) => v,
        None => return Some(PRICE_INVALID.to_string()),
    };

    if value < 0.0 {
        return Some(PRICE_NEGATIVE.to_string());
    }

    let precision = currency
        .and_then(|code| currencies.lookup(code))
        .unwrap_or_else(|| {
            tracing::warn!(currency = ?currency, "No currency defaults, assuming 2 decimals");
            FALLBACK_DEFAULTS
        })
        .precision;

    if price.decimal_places() > u32::from(precision) {
        return Some(if precision == 0 {
            PRICE_NO_DECIMALS.to_string()
        } else {
            price_precision_message(precision)
        });
    }

    None
}
