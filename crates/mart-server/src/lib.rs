//! HTTP host for the LXP Mart storefront.
//!
//! Serves the built single-page app from a static directory. Any path that
//! does not name a file gets the entry document, so routes such as
//! `/admin` are resolved in the browser. `/healthz` reports liveness.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::HealthResponse;
pub use server::MartServer;
