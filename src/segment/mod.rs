//! Sentence segmentation for slideshow generation.
//!
//! The explanation text returned by the text model is split into
//! sentences, one slide per sentence.  A sentence runs from the end of
//! the previous boundary to the end of the next boundary, where a
//! boundary is a maximal run of `.`, `!` or `?` — so `"Wait... really?"`
//! is two sentences, not four.  Text after the last boundary becomes a
//! final trailing sentence.
//!
//! Guarantees:
//! * the result is non-empty whenever the input contains any
//!   non-whitespace text;
//! * sentence order equals source order;
//! * no returned sentence is empty or whitespace-only.

/// Returns `true` for the characters that terminate a sentence.
fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Split `text` into ordered, trimmed sentences.
///
/// ```
/// use slidecast::segment::segment;
///
/// assert_eq!(segment("A. B! C?"), vec!["A.", "B!", "C?"]);
/// assert_eq!(segment("no terminators here"), vec!["no terminators here"]);
/// ```
pub fn segment(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_boundary = false;

    for ch in text.chars() {
        if is_terminator(ch) {
            current.push(ch);
            in_boundary = true;
            continue;
        }

        if in_boundary {
            // The terminator run just ended — flush the sentence.
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
            in_boundary = false;
        }

        current.push(ch);
    }

    // Whatever remains is either a terminated sentence whose boundary
    // ran to end-of-text, or an unterminated trailing fragment.
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    // Pathological input (e.g. all terminators surrounded by whitespace)
    // can leave nothing; fall back to the whole trimmed text so a
    // non-empty explanation always yields at least one sentence.
    if sentences.is_empty() {
        let whole = text.trim();
        if !whole.is_empty() {
            sentences.push(whole.to_string());
        }
    }

    sentences
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_each_terminator_kind() {
        assert_eq!(segment("A. B! C?"), vec!["A.", "B!", "C?"]);
    }

    #[test]
    fn no_terminators_yields_single_sentence() {
        assert_eq!(segment("no terminators here"), vec!["no terminators here"]);
    }

    #[test]
    fn terminator_runs_are_one_boundary() {
        assert_eq!(
            segment("Wait... really? Yes!"),
            vec!["Wait...", "really?", "Yes!"]
        );
    }

    #[test]
    fn trailing_fragment_becomes_final_sentence() {
        assert_eq!(
            segment("First one. and then some"),
            vec!["First one.", "and then some"]
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(segment("  Hello there.   General!  "), vec![
            "Hello there.",
            "General!"
        ]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\t ").is_empty());
    }

    #[test]
    fn only_terminators_falls_back_to_whole_text() {
        // There is no sentence body, but the input is non-empty, so the
        // fallback returns the trimmed text as one sentence.
        assert_eq!(segment("..."), vec!["..."]);
        assert_eq!(segment(" ?! "), vec!["?!"]);
    }

    #[test]
    fn newlines_inside_sentences_are_preserved() {
        let out = segment("One sentence\nacross lines. Next.");
        assert_eq!(out, vec!["One sentence\nacross lines.", "Next."]);
    }

    #[test]
    fn non_empty_input_never_yields_empty_output() {
        let inputs = [
            "a",
            "a.",
            ".a",
            "a.b",
            "!leading terminator",
            "multi!!! run??? here",
        ];
        for input in inputs {
            let out = segment(input);
            assert!(!out.is_empty(), "segment({input:?}) was empty");
            for s in &out {
                assert!(!s.trim().is_empty(), "empty sentence from {input:?}");
            }
        }
    }

    #[test]
    fn order_matches_source_order() {
        let out = segment("one. two. three.");
        assert_eq!(out, vec!["one.", "two.", "three."]);
    }
}
