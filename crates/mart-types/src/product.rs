use serde::{Deserialize, Serialize};

use crate::id::ProductId;

/// A catalog entry.
///
/// `image` holds a data URI (`data:<mime>;base64,<payload>`) and is stored
/// as-is; use [`crate::ImageData::parse`] to look inside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

/// A product that has not been added to the catalog yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

impl ProductDraft {
    /// Attach an id, producing a full record.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            image: self.image,
        }
    }
}

impl Product {
    /// Strip the id off, keeping the editable fields.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }
}
