//! Simple payment products: drafts, validation, editing and the saved post
//! format.

pub mod draft;
pub mod editor;
pub mod price;
pub mod record;
pub mod validation;

pub use draft::ProductDraft;
pub use editor::{ProductEditor, ProductPreview, SaveRejection, SavedProduct};
pub use price::Price;
pub use record::{attributes_to_post, parse_payment_record, ProductPost, SimplePayment};
pub use validation::{validate, FieldErrors, ProductField, ValidationResult};
