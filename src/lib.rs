//! slidecast — renders a topic explanation as a narrated slideshow.
//!
//! One generative-text call produces a short, story-style explanation;
//! the explanation is split into sentences; each sentence gets one
//! generative-image call, a rate-limit pacing delay, and a slide
//! appended to the shared presentation state.  Narration and the
//! lightbox viewer operate on that state while it grows.
//!
//! # Module map
//!
//! * [`segment`] — pure sentence segmentation.
//! * [`genai`] — text/image service traits and the REST client.
//! * [`show`] — presentation state, lightbox, strip geometry.
//! * [`narration`] — vocalizer seam and the narration controller.
//! * [`pacing`] — inter-request delay and per-slide dwell.
//! * [`pipeline`] — the generation run orchestrator.
//! * [`config`] — settings and platform paths.
//! * [`app`] — line-oriented terminal front-end.

pub mod app;
pub mod config;
pub mod genai;
pub mod narration;
pub mod pacing;
pub mod pipeline;
pub mod segment;
pub mod show;
