use std::fmt;

use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

pub type TypeResult<T> = Result<T, TypeError>;

/// A field of the product form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Price,
    Description,
    Image,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Description => "description",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form input rejected before submission.
///
/// Validation errors are shown to the user synchronously; the store is
/// never touched when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<FormField>),

    #[error("price is not a number: {0:?}")]
    InvalidPrice(String),

    #[error("image is not a data URI: {0}")]
    InvalidImage(String),
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(FormField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
