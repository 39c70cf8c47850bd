//! Editing state for one simple payment product.
//!
//! [`ProductEditor`] owns the draft, the per-field error slots, the
//! in-flight save flag and the initial-load flag. The host drives it with explicit events: attribute
//! changes, [`ProductEditor::on_deselect`] when the editor loses focus, and
//! [`ProductEditor::complete_save`] once the submitted post is answered.

use serde::{Deserialize, Serialize};

use super::draft::ProductDraft;
use super::price::{parse_float, Price};
use super::record::{attributes_to_post, ProductPost, SimplePayment};
use super::validation::{email_invalid_message, validate, FieldErrors, ProductField};
use crate::currency::{format_price, CurrencyLookup};
use crate::types::DbId;

/// Message shown when the server rejects the submitted price.
pub const PRICE_REJECTED: &str = "Invalid price.";

/// A successfully saved product post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProduct {
    pub id: DbId,
}

/// A save rejected by the server, optionally naming the offending field by
/// its meta key (`spay_email`, `spay_price`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRejection {
    pub key: Option<String>,
}

/// Read-only rendering of a complete product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPreview {
    pub title: String,
    pub content: Option<String>,
    pub formatted_price: String,
    pub multiple: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProductEditor {
    draft: ProductDraft,
    errors: FieldErrors,
    is_saving: bool,
    is_loading: bool,
}

impl ProductEditor {
    pub fn new(draft: ProductDraft) -> Self {
        Self {
            draft,
            errors: FieldErrors::default(),
            is_saving: false,
            is_loading: false,
        }
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Whether the saved payment for this draft is still being fetched.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Mark the initial fetch of the saved payment as started or finished.
    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    // -- attribute changes --------------------------------------------------

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = Some(title.into());
        self.errors.clear(ProductField::Title);
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = Some(email.into());
        self.errors.clear(ProductField::Email);
    }

    /// Store the numeric value of the typed price, or clear it when the
    /// input has no numeric prefix.
    pub fn set_price_input(&mut self, input: &str) {
        self.draft.price = parse_float(input).map(Price::Number);
        self.errors.clear(ProductField::Price);
    }

    pub fn set_currency(&mut self, currency: impl Into<String>) {
        self.draft.currency = Some(currency.into());
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = Some(content.into());
    }

    pub fn set_multiple(&mut self, multiple: bool) {
        self.draft.multiple = multiple;
    }

    /// Copy a loaded payment into the draft and finish loading. The payment
    /// id is left alone; it is what the payment was loaded by.
    pub fn inject_payment(&mut self, payment: &SimplePayment) {
        tracing::debug!(payment_id = payment.id, "Injecting loaded payment attributes");
        self.is_loading = false;
        self.draft.content = Some(payment.content.clone());
        self.draft.currency = Some(payment.currency.clone());
        self.draft.email = Some(payment.email.clone());
        self.draft.multiple = payment.multiple;
        self.draft.price = Some(Price::Number(payment.price));
        self.draft.title = Some(payment.title.clone());
    }

    // -- validation and saving ----------------------------------------------

    /// Validate the draft, replace the stored field errors and return
    /// whether the draft may be saved.
    pub fn validate(&mut self, currencies: &impl CurrencyLookup) -> bool {
        let result = validate(&self.draft, currencies);
        self.errors = result.errors;
        result.is_valid
    }

    /// Focus left the editor: validate and, when valid, start a save.
    ///
    /// Returns the post the host must submit. Returns `None` while a save is
    /// already in flight or when validation fails.
    pub fn on_deselect(&mut self, currencies: &impl CurrencyLookup) -> Option<ProductPost> {
        if self.is_saving {
            tracing::debug!("Save already in flight, ignoring deselect");
            return None;
        }
        if !self.validate(currencies) {
            tracing::debug!(errors = ?self.errors, "Draft failed validation, not saving");
            return None;
        }

        self.is_saving = true;
        let post = attributes_to_post(&self.draft);
        tracing::debug!(payment_id = ?post.id, "Submitting product post");
        Some(post)
    }

    /// Apply the answer to the post returned by [`on_deselect`](Self::on_deselect).
    ///
    /// A saved post assigns the payment id. A rejection replaces the email
    /// and price errors with the field the server named; any other key
    /// clears both.
    pub fn complete_save(&mut self, outcome: Result<SavedProduct, SaveRejection>) {
        match outcome {
            Ok(saved) => {
                tracing::debug!(payment_id = saved.id, "Product saved");
                self.draft.payment_id = Some(saved.id);
            }
            Err(rejection) => {
                tracing::warn!(key = ?rejection.key, "Product save rejected");
                let field = rejection.key.as_deref().and_then(ProductField::from_meta_key);
                let email = self.draft.email.as_deref().unwrap_or_default();
                self.errors.email =
                    (field == Some(ProductField::Email)).then(|| email_invalid_message(email));
                self.errors.price =
                    (field == Some(ProductField::Price)).then(|| PRICE_REJECTED.to_string());
            }
        }
        self.is_saving = false;
    }

    /// The read-only preview, available once the editor is deselected, the
    /// saved payment has loaded, and the title, email and price are filled
    /// in without outstanding errors.
    pub fn preview(&self, is_selected: bool) -> Option<ProductPreview> {
        if is_selected || self.is_loading || !self.errors.is_empty() {
            return None;
        }

        let title = self.draft.title.as_deref().filter(|t| !t.is_empty())?;
        self.draft.email.as_deref().filter(|e| !e.is_empty())?;
        let price = self
            .draft
            .price
            .as_ref()
            .filter(|p| p.is_present())
            .and_then(Price::parse)?;
        let currency = self.draft.currency.as_deref().unwrap_or_default();

        Some(ProductPreview {
            title: title.to_string(),
            content: self.draft.content.clone(),
            formatted_price: format_price(price, currency, true),
            multiple: self.draft.multiple,
        })
    }
}

impl From<ProductDraft> for ProductEditor {
    fn from(draft: ProductDraft) -> Self {
        Self::new(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::DefaultCurrencies;
    use crate::payments::validation::{PRICE_INVALID, PRICE_REQUIRED, TITLE_REQUIRED};

    fn complete_draft() -> ProductDraft {
        ProductDraft::new()
            .with_title("Guide")
            .with_email("seller@example.com")
            .with_currency("USD")
            .with_price(10.0)
    }

    #[test]
    fn change_handlers_clear_their_error() {
        let mut editor = ProductEditor::default();
        assert!(!editor.validate(&DefaultCurrencies));
        assert_eq!(editor.errors().title.as_deref(), Some(TITLE_REQUIRED));

        editor.set_title("Guide");
        assert!(editor.errors().title.is_none());
        assert!(editor.errors().email.is_some());

        editor.set_price_input("12");
        assert!(editor.errors().price.is_none());
        assert_eq!(editor.draft().price, Some(Price::Number(12.0)));
    }

    #[test]
    fn unparseable_price_input_clears_price() {
        let mut editor = ProductEditor::new(complete_draft());
        editor.set_price_input("abc");
        assert!(editor.draft().price.is_none());
        assert!(!editor.validate(&DefaultCurrencies));
        assert_eq!(editor.errors().price.as_deref(), Some(PRICE_REQUIRED));
    }

    #[test]
    fn deselect_with_invalid_draft_does_not_save() {
        let mut editor = ProductEditor::default();
        assert!(editor.on_deselect(&DefaultCurrencies).is_none());
        assert!(!editor.is_saving());
        assert!(!editor.errors().is_empty());
    }

    #[test]
    fn deselect_with_valid_draft_starts_save() {
        let mut editor = ProductEditor::new(complete_draft());
        let post = editor.on_deselect(&DefaultCurrencies).unwrap();
        assert!(post.is_create());
        assert!(editor.is_saving());

        // A second deselect while saving is ignored.
        assert!(editor.on_deselect(&DefaultCurrencies).is_none());
    }

    #[test]
    fn saved_product_assigns_id() {
        let mut editor = ProductEditor::new(complete_draft());
        editor.on_deselect(&DefaultCurrencies).unwrap();
        editor.complete_save(Ok(SavedProduct { id: 99 }));

        assert!(!editor.is_saving());
        assert_eq!(editor.draft().payment_id, Some(99));

        let post = editor.on_deselect(&DefaultCurrencies).unwrap();
        assert_eq!(post.id, Some(99));
    }

    #[test]
    fn rejected_email_maps_to_email_slot() {
        let mut editor = ProductEditor::new(complete_draft());
        editor.on_deselect(&DefaultCurrencies).unwrap();
        editor.complete_save(Err(SaveRejection {
            key: Some("spay_email".to_string()),
        }));

        assert!(!editor.is_saving());
        assert_eq!(
            editor.errors().email.as_deref(),
            Some("seller@example.com is not a valid email address.")
        );
        assert!(editor.errors().price.is_none());
    }

    #[test]
    fn rejected_price_maps_to_price_slot() {
        let mut editor = ProductEditor::new(complete_draft());
        editor.on_deselect(&DefaultCurrencies).unwrap();
        editor.complete_save(Err(SaveRejection {
            key: Some("spay_price".to_string()),
        }));
        assert_eq!(editor.errors().price.as_deref(), Some(PRICE_REJECTED));
        assert!(editor.errors().email.is_none());
    }

    #[test]
    fn rejection_without_key_clears_slots() {
        let mut editor = ProductEditor::new(complete_draft());
        editor.on_deselect(&DefaultCurrencies).unwrap();
        editor.complete_save(Err(SaveRejection::default()));
        assert!(editor.errors().is_empty());
        assert!(!editor.is_saving());
    }

    #[test]
    fn injected_payment_replaces_attributes() {
        let mut editor = ProductEditor::default();
        editor.inject_payment(&SimplePayment {
            id: 5,
            content: "Guide content".to_string(),
            currency: "JPY".to_string(),
            email: "seller@example.com".to_string(),
            multiple: true,
            price: 1500.0,
            title: "Guide".to_string(),
        });

        let draft = editor.draft();
        assert_eq!(draft.currency.as_deref(), Some("JPY"));
        assert_eq!(draft.price, Some(Price::Number(1500.0)));
        assert!(draft.multiple);
        assert!(draft.payment_id.is_none());
        assert!(editor.validate(&DefaultCurrencies));
    }

    #[test]
    fn preview_only_when_deselected_and_complete() {
        let editor = ProductEditor::new(complete_draft().with_content("Short guide"));
        assert!(editor.preview(true).is_none());

        let preview = editor.preview(false).unwrap();
        assert_eq!(preview.title, "Guide");
        assert_eq!(preview.formatted_price, "10.00 $");
        assert_eq!(preview.content.as_deref(), Some("Short guide"));
    }

    #[test]
    fn preview_hidden_while_errors_remain() {
        let mut editor = ProductEditor::new(complete_draft().with_email("nope"));
        editor.validate(&DefaultCurrencies);
        assert!(editor.preview(false).is_none());
    }

    #[test]
    fn preview_hidden_while_loading() {
        let mut editor = ProductEditor::new(complete_draft());
        editor.set_loading(true);
        assert!(editor.is_loading());
        assert!(editor.preview(false).is_none());

        editor.inject_payment(&SimplePayment {
            id: 5,
            content: String::new(),
            currency: "USD".to_string(),
            email: "seller@example.com".to_string(),
            multiple: false,
            price: 10.0,
            title: "Guide".to_string(),
        });
        assert!(!editor.is_loading());
        assert!(editor.preview(false).is_some());
    }

    #[test]
    fn text_price_input_keeps_invalid_message() {
        let mut editor = ProductEditor::new(complete_draft().with_price("abc"));
        assert!(!editor.validate(&DefaultCurrencies));
        assert_eq!(editor.errors().price.as_deref(), Some(PRICE_INVALID));
    }
}
