//! Slide generation pipeline.
//!
//! This module provides:
//! * [`SlidePipeline`] — orchestrates one generation run: text request,
//!   segmentation, per-sentence image requests, slide appends, pacing.
//! * [`ExplanationRequest`] — validated non-empty topic prompt.
//! * [`RunOutcome`] — the run's terminal state.
//! * [`PromptStyle`] — fixed persona and illustration-style directives.

pub mod prompt;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use prompt::PromptStyle;
pub use runner::{ExplanationRequest, RunOutcome, SlidePipeline};
