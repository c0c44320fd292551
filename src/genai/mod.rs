//! Clients for the generative text and image services.
//!
//! This module provides:
//! * [`TextGenerator`] / [`ImageGenerator`] — async traits the pipeline
//!   depends on; the services are black-box request/response
//!   collaborators behind them.
//! * [`GenAiClient`] — REST implementation of both traits.
//! * [`GenAiError`] — failure taxonomy with the user-visible message
//!   mapping used by the error banner.

pub mod client;
pub mod error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{GenAiClient, GeneratedImage, ImageGenerator, TextGenerator};
pub use error::GenAiError;
