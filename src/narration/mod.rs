//! Text-to-speech narration.
//!
//! This module provides:
//! * [`Vocalizer`] — fire-and-forget speak/cancel trait with a
//!   single-flight invariant: starting a new utterance supersedes any
//!   utterance still in progress.
//! * [`ProcessVocalizer`] — speaks by spawning a configurable TTS
//!   command (`espeak` by default), killing the previous child first.
//! * [`NarrationController`] — decides, given the narration flag and
//!   pipeline progress, whether and what to vocalize.
//!
//! Speech failures never unwind: they are logged and held for the
//! front-end to surface as banner text.

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::config::NarrationConfig;

// ---------------------------------------------------------------------------
// SpeechError / Vocalizer
// ---------------------------------------------------------------------------

/// Non-fatal failure to vocalize text.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The TTS command could not be started.
    #[error("speech command failed: {0}")]
    Spawn(String),
}

/// Fire-and-forget speech synthesis.
///
/// `speak` returns as soon as the utterance has started; no completion
/// value is consumed.  Implementations must guarantee single-flight:
/// a new `speak` cancels whatever was still playing.
pub trait Vocalizer: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
    fn cancel(&self);
}

// ---------------------------------------------------------------------------
// ProcessVocalizer
// ---------------------------------------------------------------------------

/// Speaks by running an external TTS command with the utterance as its
/// final argument (e.g. `espeak "Hello there."`).
///
/// The previous child process is killed and reaped before a new one is
/// spawned, which is what makes `speak` single-flight.
pub struct ProcessVocalizer {
    command: String,
    args: Vec<String>,
    child: Mutex<Option<Child>>,
}

impl ProcessVocalizer {
    pub fn from_config(config: &NarrationConfig) -> Self {
        let mut args = config.tts_args.clone();
        if let Some(voice) = &config.voice {
            args.push("-v".into());
            args.push(voice.clone());
        }
        Self {
            command: config.tts_command.clone(),
            args,
            child: Mutex::new(None),
        }
    }

    fn kill_current(child: &mut Option<Child>) {
        if let Some(mut proc) = child.take() {
            let _ = proc.kill();
            let _ = proc.wait();
        }
    }
}

impl Vocalizer for ProcessVocalizer {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let mut child = self.child.lock().unwrap();
        Self::kill_current(&mut child);

        let spawned = Command::new(&self.command)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Spawn(format!("{}: {e}", self.command)))?;

        *child = Some(spawned);
        Ok(())
    }

    fn cancel(&self) {
        let mut child = self.child.lock().unwrap();
        Self::kill_current(&mut child);
    }
}

impl Drop for ProcessVocalizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// NarrationController
// ---------------------------------------------------------------------------

/// Owns the narration flag and the pending-speak flag.
///
/// `toggle` with at least one slide on screen vocalizes the current
/// slide immediately; with zero slides it arms
/// `pending_speak_on_next_slide` so the first appended slide is
/// vocalized automatically.  Toggling off cancels any utterance in
/// progress and clears the pending flag.
pub struct NarrationController {
    vocalizer: Arc<dyn Vocalizer>,
    enabled: bool,
    pending_speak_on_next_slide: bool,
    last_error: Option<String>,
}

impl NarrationController {
    pub fn new(vocalizer: Arc<dyn Vocalizer>, start_enabled: bool) -> Self {
        Self {
            vocalizer,
            enabled: start_enabled,
            pending_speak_on_next_slide: false,
            last_error: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the narration flag.
    ///
    /// `current_slide_text` is the text of the slide nearest the
    /// viewport center, or `None` when no slide exists yet (the
    /// front-end computes it with [`crate::show::nearest_slide`]).
    /// Returns the new state of the flag.
    pub fn toggle(&mut self, current_slide_text: Option<&str>) -> bool {
        self.enabled = !self.enabled;

        if self.enabled {
            match current_slide_text {
                Some(text) => self.vocalize(text),
                None => self.pending_speak_on_next_slide = true,
            }
        } else {
            self.vocalizer.cancel();
            self.pending_speak_on_next_slide = false;
        }

        self.enabled
    }

    /// Called by the pipeline after each slide append.
    pub fn on_slide_appended(&mut self, text: &str) {
        if self.enabled || self.pending_speak_on_next_slide {
            self.pending_speak_on_next_slide = false;
            self.vocalize(text);
        }
    }

    /// Re-vocalize the current slide.  A no-op while narration is off
    /// or when there is no slide to repeat.
    pub fn on_repeat(&mut self, current_slide_text: Option<&str>) {
        if !self.enabled {
            return;
        }
        if let Some(text) = current_slide_text {
            self.vocalize(text);
        }
    }

    /// Cancel any utterance in progress without touching the flags.
    /// Used when a new generation run resets the presentation.
    pub fn cancel_current(&self) {
        self.vocalizer.cancel();
    }

    /// Most recent speech failure, if any, for the error banner.
    pub fn take_speech_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    fn vocalize(&mut self, text: &str) {
        if let Err(e) = self.vocalizer.speak(text) {
            log::warn!("narration: {e}");
            self.last_error = Some(format!("Speech error: {e}. Narration may be unavailable."));
        }
    }
}

/// Thread-safe handle to [`NarrationController`], shared between the
/// pipeline and the front-end.
pub type SharedNarration = Arc<Mutex<NarrationController>>;

pub fn new_shared_narration(vocalizer: Arc<dyn Vocalizer>, start_enabled: bool) -> SharedNarration {
    Arc::new(Mutex::new(NarrationController::new(
        vocalizer,
        start_enabled,
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
