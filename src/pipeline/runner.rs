//! Slide generation pipeline — drives prompt → text → sentences → images.
//!
//! [`SlidePipeline`] owns the collaborator handles and mutates the
//! shared [`Presentation`](crate::show::Presentation) as the run
//! progresses.
//!
//! # Pipeline flow
//!
//! ```text
//! run(request)
//!   ├─ reset presentation, disable input, stop narration
//!   ├─ text service: explanation text          [terminal on failure]
//!   ├─ segment into sentences
//!   └─ per sentence, in order:
//!        ├─ image service                      [placeholder on failure]
//!        ├─ append slide (run-token checked)
//!        ├─ narration (if enabled)
//!        └─ pace delay + optional dwell
//! ```
//!
//! A single image failure never aborts the run; the slide falls back to
//! the placeholder image and the loop continues.  Input is re-enabled on
//! every exit path.

use std::sync::Arc;

use crate::genai::{ImageGenerator, TextGenerator};
use crate::narration::SharedNarration;
use crate::pacing::Pacer;
use crate::pipeline::prompt::PromptStyle;
use crate::segment::segment;
use crate::show::{ImageSource, RunToken, SharedShow};

// ---------------------------------------------------------------------------
// ExplanationRequest
// ---------------------------------------------------------------------------

/// A validated, non-empty topic prompt.
///
/// Construction refuses empty or whitespace-only input, so the pipeline
/// never has to re-check — blocking empty submissions is the caller's
/// job, and the type makes it so.
#[derive(Debug, Clone)]
pub struct ExplanationRequest(String);

impl ExplanationRequest {
    pub fn new(prompt: &str) -> Option<Self> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn topic(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// RunOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every sentence was processed.  `placeholder_count > 0` means the
    /// run completed with partial failures.
    Completed {
        slide_count: usize,
        placeholder_count: usize,
    },
    /// The text service answered with empty text — benign, not an
    /// error.
    NothingGenerated,
    /// Text generation failed before any slide was produced.
    Aborted,
    /// A newer run took over the presentation; this run stopped without
    /// touching the fresh state.
    Superseded,
}

// ---------------------------------------------------------------------------
// InputGuard
// ---------------------------------------------------------------------------

/// Re-enables the submission input when dropped, on every exit path of
/// [`SlidePipeline::run`].  Skipped when the run has been superseded,
/// since the input then belongs to the newer run.
struct InputGuard {
    show: SharedShow,
    token: RunToken,
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        let mut show = self.show.lock().unwrap();
        if show.is_active(self.token) {
            show.input_enabled = true;
        }
    }
}

// ---------------------------------------------------------------------------
// SlidePipeline
// ---------------------------------------------------------------------------

/// Orchestrates one generation run end to end.
///
/// Image requests are issued strictly sequentially, so slides append in
/// sentence order; there is no out-of-order completion to reconcile.
pub struct SlidePipeline {
    show: SharedShow,
    narration: SharedNarration,
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    pacer: Pacer,
    style: PromptStyle,
}

impl SlidePipeline {
    pub fn new(
        show: SharedShow,
        narration: SharedNarration,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        pacer: Pacer,
    ) -> Self {
        Self {
            show,
            narration,
            text,
            image,
            pacer,
            style: PromptStyle::new(),
        }
    }

    /// The pacer, for the dwell-time selector.
    pub fn pacer_mut(&mut self) -> &mut Pacer {
        &mut self.pacer
    }

    /// Run one generation end to end.  All state effects land in the
    /// shared presentation; the returned outcome is the run's terminal
    /// state.
    pub async fn run(&self, request: &ExplanationRequest) -> RunOutcome {
        let token = {
            let mut show = self.show.lock().unwrap();
            show.input_enabled = false;
            show.begin_run()
        };
        self.narration.lock().unwrap().cancel_current();

        let _input_guard = InputGuard {
            show: Arc::clone(&self.show),
            token,
        };

        // ── 1. Explanation text ──────────────────────────────────────────
        let full_prompt = self.style.text_prompt(request.topic());
        let explanation = match self.text.generate_text(&full_prompt).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("pipeline: text generation failed: {e}");
                self.surface(token, format!("Text generation failed. {}", e.user_message()));
                return RunOutcome::Aborted;
            }
        };

        if explanation.trim().is_empty() {
            log::info!("pipeline: model produced no explanation text");
            self.surface(
                token,
                "No explanation was generated by the model. Try a different prompt.".into(),
            );
            return RunOutcome::NothingGenerated;
        }

        // ── 2. Sentences ─────────────────────────────────────────────────
        let sentences = segment(&explanation);
        log::debug!("pipeline: explanation split into {} sentences", sentences.len());

        // ── 3. One image per sentence, in order ──────────────────────────
        let mut placeholder_count = 0usize;
        for (i, sentence) in sentences.iter().enumerate() {
            let image_prompt = self.style.image_prompt(sentence);
            let image = match self.image.generate_images(&image_prompt).await {
                Ok(images) => match images.into_iter().next() {
                    Some(img) => ImageSource::Generated(img),
                    None => {
                        log::warn!("pipeline: no image generated for sentence {i}");
                        self.surface(token, format!("No image was generated for: {sentence}"));
                        placeholder_count += 1;
                        ImageSource::Placeholder
                    }
                },
                Err(e) => {
                    log::warn!("pipeline: image generation failed for sentence {i}: {e}");
                    self.surface(token, format!("Image Generation Error: {}", e.user_message()));
                    placeholder_count += 1;
                    ImageSource::Placeholder
                }
            };

            let appended = self
                .show
                .lock()
                .unwrap()
                .append_slide(token, sentence.clone(), image);
            if appended.is_none() {
                log::debug!("pipeline: run superseded after {i} slides, stopping");
                return RunOutcome::Superseded;
            }

            let speech_error = {
                let mut narration = self.narration.lock().unwrap();
                narration.on_slide_appended(sentence);
                narration.take_speech_error()
            };
            if let Some(message) = speech_error {
                self.surface(token, message);
            }

            // Fixed inter-request delay regardless of the image outcome,
            // then the optional dwell on top of it.
            self.pacer.pace().await;
            self.pacer.dwell().await;
        }

        RunOutcome::Completed {
            slide_count: sentences.len(),
            placeholder_count,
        }
    }

    /// Put `message` in the banner, unless the run has been superseded.
    fn surface(&self, token: RunToken, message: String) {
        let mut show = self.show.lock().unwrap();
        if show.is_active(token) {
            show.banner = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
