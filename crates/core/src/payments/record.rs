//! Conversion between drafts and the persisted product post.
//!
//! Products are stored as posts of the simple-payment post type with the
//! payment details in `meta`. Loaded posts are checked against the expected
//! shape before use; a malformed post yields a [`RecordError`] instead of a
//! half-filled payment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::draft::ProductDraft;
use super::price::Price;
use crate::currency::is_supported_currency;
use crate::error::RecordError;
use crate::types::DbId;

/// Post type products are stored under.
pub const PRODUCT_POST_TYPE: &str = "jp_pay_product";

/// Status every saved product is published with.
pub const PUBLISH_STATUS: &str = "publish";

// ---------------------------------------------------------------------------
// Outgoing post
// ---------------------------------------------------------------------------

/// Payment details stored in post meta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMeta {
    pub spay_currency: Option<String>,
    pub spay_email: Option<String>,
    /// `1` when buyers may purchase more than one unit, else `0`.
    pub spay_multiple: u8,
    pub spay_price: Option<Price>,
}

/// The post submitted to create (no `id`) or update a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    pub content: Option<String>,
    pub featured_media: DbId,
    pub meta: ProductMeta,
    pub status: String,
    pub title: Option<String>,
    /// Post type the product is saved under, always [`PRODUCT_POST_TYPE`].
    #[serde(rename = "type")]
    pub post_type: String,
}

impl ProductPost {
    /// Whether submitting this post creates a new product.
    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }
}

/// Build the post for a draft.
pub fn attributes_to_post(draft: &ProductDraft) -> ProductPost {
    ProductPost {
        id: draft.payment_id,
        content: draft.content.clone(),
        featured_media: 0,
        meta: ProductMeta {
            spay_currency: draft.currency.clone(),
            spay_email: draft.email.clone(),
            spay_multiple: u8::from(draft.multiple),
            spay_price: draft.price.clone(),
        },
        status: PUBLISH_STATUS.to_string(),
        title: draft.title.clone(),
        post_type: PRODUCT_POST_TYPE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Incoming post
// ---------------------------------------------------------------------------

/// A product loaded from a saved post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplePayment {
    pub id: DbId,
    pub content: String,
    pub currency: String,
    pub email: String,
    pub multiple: bool,
    pub price: f64,
    pub title: String,
}

/// Parse a saved product post.
///
/// Requires a positive integer `id`, object `content` and `title` (their
/// `raw` text is used), and a `meta` object with a supported
/// `spay_currency`, string `spay_email`, boolean `spay_multiple` and a
/// positive numeric `spay_price`. Other properties are ignored.
pub fn parse_payment_record(record: &Value) -> Result<SimplePayment, RecordError> {
    let obj = record.as_object().ok_or(RecordError::NotAnObject)?;

    let id = required(obj, "id")?
        .as_i64()
        .ok_or(RecordError::WrongType {
            field: "id",
            expected: "an integer",
        })?;
    if id <= 0 {
        return Err(RecordError::NotPositive("id"));
    }

    let content = raw_text(required_object(obj, "content")?);
    let title = raw_text(required_object(obj, "title")?);
    let meta = required_object(obj, "meta")?;

    let currency = required_str(meta, "spay_currency")?;
    if !is_supported_currency(currency) {
        return Err(RecordError::UnsupportedCurrency(currency.to_string()));
    }

    let email = required_str(meta, "spay_email")?;

    let multiple = required(meta, "spay_multiple")?
        .as_bool()
        .ok_or(RecordError::WrongType {
            field: "spay_multiple",
            expected: "a boolean",
        })?;

    let price = required(meta, "spay_price")?
        .as_f64()
        .ok_or(RecordError::WrongType {
            field: "spay_price",
            expected: "a number",
        })?;
    if price <= 0.0 {
        return Err(RecordError::NotPositive("spay_price"));
    }

    Ok(SimplePayment {
        id,
        content,
        currency: currency.to_string(),
        email: email.to_string(),
        multiple,
        price,
        title,
    })
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, RecordError> {
    obj.get(field).ok_or(RecordError::Missing(field))
}

fn required_object<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Map<String, Value>, RecordError> {
    required(obj, field)?
        .as_object()
        .ok_or(RecordError::WrongType {
            field,
            expected: "an object",
        })
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, RecordError> {
    required(obj, field)?.as_str().ok_or(RecordError::WrongType {
        field,
        expected: "a string",
    })
}

fn raw_text(rendered: &Map<String, Value>) -> String {
    rendered
        .get("raw")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn saved_post() -> Value {
        json!({
            "id": 17,
            "content": { "raw": "A short guide", "rendered": "<p>A short guide</p>" },
            "title": { "raw": "Guide", "rendered": "Guide" },
            "status": "publish",
            "meta": {
                "spay_currency": "EUR",
                "spay_email": "seller@example.com",
                "spay_multiple": false,
                "spay_price": 12.5
            }
        })
    }

    #[test]
    fn post_for_new_draft_has_no_id() {
        let draft = ProductDraft::new()
            .with_title("Guide")
            .with_price(12.5)
            .with_currency("EUR")
            .with_email("seller@example.com")
            .with_multiple(true);
        let post = attributes_to_post(&draft);

        assert!(post.is_create());
        assert_eq!(post.meta.spay_multiple, 1);
        assert_eq!(post.status, "publish");
        assert_eq!(post.featured_media, 0);

        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["meta"]["spay_price"], 12.5);
        assert_eq!(json["meta"]["spay_currency"], "EUR");
    }

    #[test]
    fn post_is_saved_under_product_type() {
        let post = attributes_to_post(&ProductDraft::new().with_title("Guide"));
        assert_eq!(post.post_type, PRODUCT_POST_TYPE);

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["type"], "jp_pay_product");
        assert!(json.get("post_type").is_none());
    }

    #[test]
    fn post_for_saved_draft_keeps_id() {
        let mut draft = ProductDraft::new().with_title("Guide");
        draft.payment_id = Some(17);
        let post = attributes_to_post(&draft);
        assert_eq!(post.id, Some(17));
        assert_eq!(post.meta.spay_multiple, 0);
    }

    #[test]
    fn parses_saved_post() {
        let payment = parse_payment_record(&saved_post()).unwrap();
        assert_eq!(payment.id, 17);
        assert_eq!(payment.title, "Guide");
        assert_eq!(payment.content, "A short guide");
        assert_eq!(payment.currency, "EUR");
        assert_eq!(payment.price, 12.5);
        assert!(!payment.multiple);
    }

    #[test]
    fn rejects_non_object() {
        assert_matches!(parse_payment_record(&json!([1])), Err(RecordError::NotAnObject));
    }

    #[test]
    fn rejects_missing_meta() {
        let mut post = saved_post();
        post.as_object_mut().unwrap().remove("meta");
        assert_matches!(parse_payment_record(&post), Err(RecordError::Missing("meta")));
    }

    #[test]
    fn rejects_non_positive_id() {
        let mut post = saved_post();
        post["id"] = json!(0);
        assert_matches!(parse_payment_record(&post), Err(RecordError::NotPositive("id")));
    }

    #[test]
    fn rejects_unsupported_currency() {
        let mut post = saved_post();
        post["meta"]["spay_currency"] = json!("XYZ");
        assert_matches!(
            parse_payment_record(&post),
            Err(RecordError::UnsupportedCurrency(code)) if code == "XYZ"
        );
    }

    #[test]
    fn rejects_zero_price() {
        let mut post = saved_post();
        post["meta"]["spay_price"] = json!(0);
        assert_matches!(
            parse_payment_record(&post),
            Err(RecordError::NotPositive("spay_price"))
        );
    }

    #[test]
    fn rejects_numeric_multiple_flag() {
        let mut post = saved_post();
        post["meta"]["spay_multiple"] = json!(1);
        assert_matches!(
            parse_payment_record(&post),
            Err(RecordError::WrongType { field: "spay_multiple", .. })
        );
    }
}
