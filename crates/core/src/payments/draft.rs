//! The editable product record behind a simple payment button.

use serde::{Deserialize, Serialize};

use super::price::Price;
use crate::types::DbId;

/// An in-progress product, edited field by field.
///
/// Deserializes from the block attribute shape (`paymentId` in camelCase);
/// every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub price: Option<Price>,
    pub currency: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub multiple: bool,
    pub payment_id: Option<DbId>,
}

impl ProductDraft {
    /// Builder used by callers and tests that start from a blank draft.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<Price>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Whether the draft has been saved before (updates rather than creates).
    pub fn is_persisted(&self) -> bool {
        self.payment_id.is_some()
    }
}
