//! HTTP middleware and extractors.
//!
//! # Layer order (outermost first, see `routes::app`)
//!
//! 1. Sentry hub and HTTP transaction layers
//! 2. `TraceLayer` (request span `http_request`)
//! 3. CORS for the configured frontend origin
//!
//! Authentication is not a layer: protected handlers take a
//! [`RequireAdmin`] argument.

pub mod auth;

pub use auth::RequireAdmin;
