//! Pure nearest-slide selection over strip geometry.
//!
//! The front-end lays slides out in a horizontal strip and scrolls it;
//! narration needs "the slide the viewer is looking at" when toggled on
//! or when a repeat is requested.  That selection is a pure function of
//! slide positions and the viewport center, so it lives here, away from
//! any rendering concern.

/// Horizontal extent of one rendered slide within the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGeometry {
    /// Left edge, in strip coordinates.
    pub left: f32,
    /// Width; `left + width / 2` is the slide's center.
    pub width: f32,
    /// Detached or hidden slides are skipped by the selection.
    pub visible: bool,
}

impl SlideGeometry {
    pub fn center(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Index of the visible slide whose center is closest to
/// `viewport_center`; ties go to the first-encountered slide.
///
/// Returns `None` when `slides` is empty or none are visible.
pub fn nearest_slide(slides: &[SlideGeometry], viewport_center: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, slide) in slides.iter().enumerate() {
        if !slide.visible {
            continue;
        }
        let distance = (viewport_center - slide.center()).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Geometry for a uniform strip of `count` unit-width slides — the
/// layout the terminal front-end uses.
pub fn uniform_strip(count: usize) -> Vec<SlideGeometry> {
    (0..count)
        .map(|i| SlideGeometry {
            left: i as f32,
            width: 1.0,
            visible: true,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
