//! Generative drafting for LXP Mart.
//!
//! The admin form can ask an external generative model to propose a
//! product name from an image, a description from the image and name, and
//! a price from the name and description. Each suggestion is a single
//! request/response exchange that may fail; failures are reported to the
//! caller and never touch the form.
//!
//! - [`DraftingService`]: the three operations, as an async trait
//! - [`GeminiClient`]: implementation over the Gemini REST API
//! - [`PriceSuggestion`]: a parsed price, or the raw text when no number was found
//! - [`DraftSession`] / [`CancelToken`]: tie outstanding requests to the form's lifetime
//! - [`FormAssistant`]: applies suggestions to a [`mart_types::ProductForm`]

pub mod assist;
pub mod cancel;
pub mod config;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod service;

pub use assist::FormAssistant;
pub use cancel::{CancelToken, DraftSession};
pub use config::DraftConfig;
pub use error::{DraftError, DraftResult};
pub use gemini::GeminiClient;
pub use service::{clean_name, DraftingService, PriceSuggestion};
