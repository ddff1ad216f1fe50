//! Foundation types for LXP Mart.
//!
//! Every other mart crate depends on `mart-types`. The crate owns the single
//! entity of the system, the product record, together with the helpers that
//! create and check it.
//!
//! # Key Types
//!
//! - [`Product`]: A catalog entry with an immutable [`ProductId`]
//! - [`ProductDraft`]: A product that has not been assigned an id yet
//! - [`ProductId`]: `prod_<millis>_<suffix>` identifier generated at creation time
//! - [`ImageData`]: Parsed `data:<mime>;base64,<payload>` image
//! - [`ProductForm`]: Raw admin form input, validated into a draft or update

pub mod error;
pub mod form;
pub mod id;
pub mod image;
pub mod product;

pub use error::{FormField, TypeError, TypeResult, ValidationError};
pub use form::{FormSubmission, ProductForm};
pub use id::ProductId;
pub use image::ImageData;
pub use product::{Product, ProductDraft};
