use async_trait::async_trait;
use mart_types::ImageData;
use serde::{Deserialize, Serialize};

use crate::error::DraftResult;

/// Quote characters the model tends to wrap a product name in.
const NAME_QUOTES: &[char] = &['"', '\'', '“', '”', '‘', '’', '「', '」', '『', '』'];

/// The three drafting operations offered to the admin form.
#[async_trait]
pub trait DraftingService: Send + Sync {
    /// Propose a short product name for the pictured item.
    async fn suggest_name(&self, image: &ImageData) -> DraftResult<String>;

    /// Propose a description for the pictured item called `name`.
    async fn suggest_description(&self, image: &ImageData, name: &str) -> DraftResult<String>;

    /// Propose a price from the name and description.
    async fn suggest_price(&self, name: &str, description: &str) -> DraftResult<PriceSuggestion>;
}

/// A price read out of free-form model output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceSuggestion {
    /// The first integer found in the response.
    Parsed { value: u64 },
    /// The response held no usable integer.
    Unparseable { raw: String },
}

impl PriceSuggestion {
    /// Take the first run of ASCII digits in `text`.
    ///
    /// Separators end the run: `"1,200"` yields 1. A run too long for `u64`
    /// saturates at `u64::MAX`.
    pub fn parse(text: &str) -> Self {
        let digits: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return Self::Unparseable {
                raw: text.to_string(),
            };
        }
        let value = digits.parse::<u64>().unwrap_or(u64::MAX);
        Self::Parsed { value }
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Parsed { value } => Some(*value),
            Self::Unparseable { .. } => None,
        }
    }

    /// The parsed value, or zero when nothing could be parsed.
    pub fn value_or_zero(&self) -> u64 {
        self.value().unwrap_or(0)
    }
}

/// Trim a suggested name and strip any quote characters from it.
pub fn clean_name(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !NAME_QUOTES.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
