//! Admin form input and its validation.

use serde::{Deserialize, Serialize};

use crate::error::{FormField, ValidationError};
use crate::id::ProductId;
use crate::image::ImageData;
use crate::product::{Product, ProductDraft};

/// Raw, unvalidated form state. Every field is text as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
}

/// What a valid form turns into.
#[derive(Clone, Debug, PartialEq)]
pub enum FormSubmission {
    Create(ProductDraft),
    Update(Product),
}

impl ProductForm {
    /// Prefill the form for editing an existing record.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            image: product.image.clone(),
        }
    }

    /// A form holding a record that did not come from user input, such as
    /// an import file, so it passes the same checks before submission.
    pub fn from_draft(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            price: draft.price.to_string(),
            description: draft.description.clone(),
            image: draft.image.clone(),
        }
    }

    /// Fields that are still empty.
    pub fn missing_fields(&self) -> Vec<FormField> {
        [
            (FormField::Name, &self.name),
            (FormField::Price, &self.price),
            (FormField::Description, &self.description),
            (FormField::Image, &self.image),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Check every field and build a draft.
    pub fn validate(&self) -> Result<ProductDraft, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| ValidationError::InvalidPrice(self.price.clone()))?;

        if !self.image.starts_with("data:") {
            return Err(ValidationError::InvalidImage("expected a data: URI".into()));
        }
        ImageData::parse(&self.image).map_err(|e| ValidationError::InvalidImage(e.to_string()))?;

        Ok(ProductDraft {
            name: self.name.clone(),
            price,
            description: self.description.clone(),
            image: self.image.clone(),
        })
    }

    /// Validate and decide between creating and updating.
    ///
    /// `editing` is the id of the record the form was opened for, if any.
    pub fn submit(&self, editing: Option<&ProductId>) -> Result<FormSubmission, ValidationError> {
        let draft = self.validate()?;
        Ok(match editing {
            Some(id) => FormSubmission::Update(draft.into_product(id.clone())),
            None => FormSubmission::Create(draft),
        })
    }
}
