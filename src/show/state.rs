//! Presentation state — the slide list, lightbox cursor, and run epoch.
//!
//! [`Presentation`] is the single source of truth for everything the
//! front-end renders: the append-only slide list of the current
//! generation run, the lightbox cursor, the input enablement flag, and
//! the error banner.  The pipeline mutates it between suspension points;
//! user-interaction handlers (lightbox navigation, banner dismissal)
//! mutate it synchronously.
//!
//! [`SharedShow`] is a type alias for `Arc<Mutex<Presentation>>` — cheap
//! to clone and safe to share.  Locks are held only for short critical
//! sections, never across `.await` points.
//!
//! # Run epoch
//!
//! Starting a new generation run supersedes any prior run, but a slow
//! response from the superseded run could still be in flight.  Every
//! append therefore carries the [`RunToken`] handed out by
//! [`Presentation::begin_run`]; an append with a stale token is
//! discarded instead of corrupting the fresh run's slide list.

use std::sync::{Arc, Mutex};

use crate::genai::GeneratedImage;

// ---------------------------------------------------------------------------
// ImageSource / Slide
// ---------------------------------------------------------------------------

/// A 1×1 transparent GIF shown when the image service produced nothing
/// for a sentence.  Kept as raw bytes so placeholder slides can be
/// written to disk like any generated image.
pub const PLACEHOLDER_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

/// The illustration attached to a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Image returned by the generation service.
    Generated(GeneratedImage),
    /// The designated fallback image — the service failed or returned
    /// zero images for this sentence.
    Placeholder,
}

impl ImageSource {
    /// Raw bytes of the image, placeholder included.
    pub fn bytes(&self) -> &[u8] {
        match self {
            ImageSource::Generated(img) => &img.bytes,
            ImageSource::Placeholder => PLACEHOLDER_GIF,
        }
    }

    /// File extension matching the image payload.
    pub fn extension(&self) -> &str {
        match self {
            ImageSource::Generated(img) => match img.mime.as_str() {
                "image/png" => "png",
                "image/gif" => "gif",
                _ => "jpg",
            },
            ImageSource::Placeholder => "gif",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageSource::Placeholder)
    }
}

/// One sentence paired with its illustration.
///
/// Slides are created in sentence order by the pipeline and never
/// removed or reordered.  The narration text of a slide is its sentence.
#[derive(Debug, Clone)]
pub struct Slide {
    /// Position in presentation order (0-based, append-only).
    pub index: usize,
    /// The sentence this slide illustrates; also the narration text.
    pub sentence: String,
    /// Generated image or the placeholder.
    pub image: ImageSource,
}

// ---------------------------------------------------------------------------
// RunToken / Direction
// ---------------------------------------------------------------------------

/// Proof that the holder belongs to the currently active generation run.
///
/// Obtained from [`Presentation::begin_run`]; compared on every append
/// so completions from a superseded run cannot mutate the fresh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// Lightbox navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// The presentation record: slides, lightbox cursor, input enablement
/// and the error banner.
pub struct Presentation {
    slides: Vec<Slide>,
    /// Index of the slide shown in the lightbox, or `None` when closed.
    /// When `Some(i)`, `i < slides.len()` always holds.
    lightbox: Option<usize>,
    /// Whether the submission input accepts a new prompt.  Cleared by
    /// the pipeline for the duration of a run.
    pub input_enabled: bool,
    /// Most recent user-visible error or warning text, if any.
    pub banner: Option<String>,
    run_epoch: u64,
}

impl Presentation {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            lightbox: None,
            input_enabled: true,
            banner: None,
            run_epoch: 0,
        }
    }

    /// Start a new generation run: clear the slides, close the lightbox,
    /// clear the banner, and invalidate every previously issued token.
    pub fn begin_run(&mut self) -> RunToken {
        self.slides.clear();
        self.lightbox = None;
        self.banner = None;
        self.run_epoch += 1;
        RunToken(self.run_epoch)
    }

    /// Append a slide on behalf of the run identified by `token`.
    ///
    /// Returns the new slide's index, or `None` when the token belongs
    /// to a superseded run (the slide is discarded).
    pub fn append_slide(
        &mut self,
        token: RunToken,
        sentence: String,
        image: ImageSource,
    ) -> Option<usize> {
        if token.0 != self.run_epoch {
            log::debug!("discarding stale slide append (superseded run)");
            return None;
        }
        let index = self.slides.len();
        self.slides.push(Slide {
            index,
            sentence,
            image,
        });
        Some(index)
    }

    /// Whether `token` belongs to the run currently owning this state.
    pub fn is_active(&self, token: RunToken) -> bool {
        token.0 == self.run_epoch
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    // -----------------------------------------------------------------------
    // Lightbox
    // -----------------------------------------------------------------------

    /// Open the lightbox at `index`.  A no-op when there are no slides;
    /// an out-of-range index is clamped to the last slide.
    pub fn open_lightbox(&mut self, index: usize) -> Option<usize> {
        if self.slides.is_empty() {
            return None;
        }
        let index = index.min(self.slides.len() - 1);
        self.lightbox = Some(index);
        self.lightbox
    }

    /// Move the lightbox cursor by one slide with wraparound.
    ///
    /// Returns the new index, or `None` when the lightbox is closed.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let current = self.lightbox?;
        let len = self.slides.len();
        debug_assert!(len > 0, "lightbox open with zero slides");
        let next = match direction {
            Direction::Prev => (current + len - 1) % len,
            Direction::Next => (current + 1) % len,
        };
        self.lightbox = Some(next);
        self.lightbox
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = None;
    }

    pub fn lightbox_index(&self) -> Option<usize> {
        self.lightbox
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SharedShow
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`Presentation`].
pub type SharedShow = Arc<Mutex<Presentation>>;

/// Construct a new [`SharedShow`] wrapping an empty [`Presentation`].
pub fn new_shared_show() -> SharedShow {
    Arc::new(Mutex::new(Presentation::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn show_with_slides(n: usize) -> (Presentation, RunToken) {
        let mut show = Presentation::new();
        let token = show.begin_run();
        for i in 0..n {
            show.append_slide(token, format!("sentence {i}"), ImageSource::Placeholder)
                .unwrap();
        }
        (show, token)
    }

    #[test]
    fn append_assigns_sequential_indices() {
        let (show, _) = show_with_slides(3);
        let indices: Vec<usize> = show.slides().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn stale_token_append_is_discarded() {
        let mut show = Presentation::new();
        let old = show.begin_run();
        show.append_slide(old, "from run 1".into(), ImageSource::Placeholder)
            .unwrap();

        let fresh = show.begin_run();
        // A slow completion from the superseded run arrives late.
        assert_eq!(
            show.append_slide(old, "stale".into(), ImageSource::Placeholder),
            None
        );
        assert_eq!(show.slide_count(), 0);

        // The active run is unaffected.
        assert_eq!(
            show.append_slide(fresh, "current".into(), ImageSource::Placeholder),
            Some(0)
        );
        assert_eq!(show.slides()[0].sentence, "current");
    }

    #[test]
    fn begin_run_resets_slides_lightbox_and_banner() {
        let (mut show, _) = show_with_slides(2);
        show.open_lightbox(1);
        show.banner = Some("old error".into());

        show.begin_run();

        assert_eq!(show.slide_count(), 0);
        assert_eq!(show.lightbox_index(), None);
        assert!(show.banner.is_none());
    }

    #[test]
    fn open_lightbox_with_zero_slides_is_noop() {
        let mut show = Presentation::new();
        assert_eq!(show.open_lightbox(0), None);
        assert_eq!(show.lightbox_index(), None);
    }

    #[test]
    fn open_lightbox_clamps_out_of_range_index() {
        let (mut show, _) = show_with_slides(3);
        assert_eq!(show.open_lightbox(99), Some(2));
    }

    #[test]
    fn navigate_prev_at_zero_wraps_to_last() {
        let (mut show, _) = show_with_slides(3);
        show.open_lightbox(0);
        assert_eq!(show.navigate(Direction::Prev), Some(2));
    }

    #[test]
    fn navigate_next_at_last_wraps_to_zero() {
        let (mut show, _) = show_with_slides(3);
        show.open_lightbox(2);
        assert_eq!(show.navigate(Direction::Next), Some(0));
    }

    #[test]
    fn navigate_with_closed_lightbox_is_noop() {
        let (mut show, _) = show_with_slides(3);
        assert_eq!(show.navigate(Direction::Next), None);
        assert_eq!(show.lightbox_index(), None);
    }

    #[test]
    fn navigate_single_slide_stays_put() {
        let (mut show, _) = show_with_slides(1);
        show.open_lightbox(0);
        assert_eq!(show.navigate(Direction::Next), Some(0));
        assert_eq!(show.navigate(Direction::Prev), Some(0));
    }

    #[test]
    fn placeholder_bytes_are_a_gif() {
        let img = ImageSource::Placeholder;
        assert_eq!(&img.bytes()[..3], b"GIF");
        assert_eq!(img.extension(), "gif");
        assert!(img.is_placeholder());
    }

    #[test]
    fn shared_show_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedShow>();
    }
}
