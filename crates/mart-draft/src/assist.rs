use std::sync::Arc;

use mart_types::{FormField, ImageData, ProductForm};
use tracing::info;

use crate::cancel::CancelToken;
use crate::error::{DraftError, DraftResult};
use crate::service::{DraftingService, PriceSuggestion};

/// Fills product form fields from drafting suggestions.
///
/// A field is only written after its suggestion arrived successfully; on
/// any error, including cancellation, the form is left exactly as it was.
pub struct FormAssistant {
    service: Arc<dyn DraftingService>,
    token: CancelToken,
}

impl FormAssistant {
    pub fn new(service: Arc<dyn DraftingService>, token: CancelToken) -> Self {
        Self { service, token }
    }

    fn image(form: &ProductForm) -> DraftResult<ImageData> {
        if form.image.trim().is_empty() {
            return Err(DraftError::MissingInput(FormField::Image));
        }
        Ok(ImageData::parse(&form.image)?)
    }

    fn require(value: &str, field: FormField) -> DraftResult<()> {
        if value.trim().is_empty() {
            Err(DraftError::MissingInput(field))
        } else {
            Ok(())
        }
    }

    pub async fn fill_name(&self, form: &mut ProductForm) -> DraftResult<()> {
        let image = Self::image(form)?;
        let name = self.token.guard(self.service.suggest_name(&image)).await?;
        info!(%name, "drafted product name");
        form.name = name;
        Ok(())
    }

    pub async fn fill_description(&self, form: &mut ProductForm) -> DraftResult<()> {
        let image = Self::image(form)?;
        Self::require(&form.name, FormField::Name)?;
        let description = self
            .token
            .guard(self.service.suggest_description(&image, &form.name))
            .await?;
        info!(chars = description.chars().count(), "drafted product description");
        form.description = description;
        Ok(())
    }

    /// Ask for a price. The price field is only set when a number was found;
    /// an unparseable suggestion is returned to the caller as-is.
    pub async fn fill_price(&self, form: &mut ProductForm) -> DraftResult<PriceSuggestion> {
        Self::require(&form.name, FormField::Name)?;
        Self::require(&form.description, FormField::Description)?;
        let suggestion = self
            .token
            .guard(self.service.suggest_price(&form.name, &form.description))
            .await?;
        if let Some(value) = suggestion.value() {
            info!(value, "drafted product price");
            form.price = value.to_string();
        }
        Ok(suggestion)
    }

    /// Name, then description, then price, stopping at the first failure.
    pub async fn fill_all(&self, form: &mut ProductForm) -> DraftResult<PriceSuggestion> {
        self.fill_name(form).await?;
        self.fill_description(form).await?;
        self.fill_price(form).await
    }
}
