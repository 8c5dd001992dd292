//! The scan itself.
//!
//! Depth goes up on every `<` not followed by `/`, and down on every `</`.
//! Characters between a `<` and the next `>` are tag content and are skipped;
//! everything else is text. Text is gathered into a scratch buffer which is
//! only cleared when a new record depth is reached, so a return to the record
//! depth after a shallower excursion captures the excursion's text as well.

use std::fmt;

/// Returned by [`find_deepest_text`] in place of any text when a closing tag
/// has no matching open tag.
pub const MALFORMED_SENTINEL: &str = "Malformed HTML";

/// Terminal result of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum ScanOutcome {
    /// Trimmed text recorded at the deepest level reached. May be empty.
    Deepest { text: String },
    /// Depth went below zero; scanning stopped at the `<` at byte `offset`.
    Malformed { offset: usize },
}

impl ScanOutcome {
    /// The text, or [`MALFORMED_SENTINEL`] for malformed input.
    pub fn as_str(&self) -> &str {
        match self {
            ScanOutcome::Deepest { text } => text,
            ScanOutcome::Malformed { .. } => MALFORMED_SENTINEL,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ScanOutcome::Malformed { .. })
    }

    pub fn into_string(self) -> String {
        match self {
            ScanOutcome::Deepest { text } => text,
            ScanOutcome::Malformed { .. } => MALFORMED_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome plus the depth at which the text was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    /// Highest depth at which a text character was seen. Zero when the input
    /// holds no text outside tags.
    pub max_depth: u64,
}

/// Characters stripped from the ends of the recorded text: space and every
/// control character below it. Wider Unicode whitespace such as U+00A0 stays.
fn is_trimmed(c: char) -> bool {
    c <= ' '
}

/// Per-call scan state. Never shared between calls.
#[derive(Debug, Default)]
struct ScanState {
    current_depth: i64,
    max_depth: i64,
    inside_tag: bool,
    /// Every text character since the last new record depth, at any depth.
    scratch: String,
    /// Length of `scratch` at the last text character seen at `max_depth`.
    /// The recorded text is `scratch[..recorded_len]` with [`is_trimmed`]
    /// characters stripped from both ends.
    recorded_len: usize,
}

impl ScanState {
    /// Returns `false` when depth underflows and the scan must stop.
    fn open_or_close(&mut self, closing: bool) -> bool {
        self.inside_tag = true;
        if closing {
            self.current_depth -= 1;
        } else {
            self.current_depth += 1;
        }
        self.current_depth >= 0
    }

    fn text(&mut self, ch: char) {
        if self.current_depth > self.max_depth {
            self.max_depth = self.current_depth;
            self.scratch.clear();
            self.recorded_len = 0;
        }
        self.scratch.push(ch);
        if self.current_depth == self.max_depth {
            self.recorded_len = self.scratch.len();
        }
    }

    fn finish(self) -> ScanReport {
        let text = self.scratch[..self.recorded_len]
            .trim_matches(is_trimmed)
            .to_string();
        ScanReport {
            outcome: ScanOutcome::Deepest { text },
            max_depth: u64::try_from(self.max_depth).unwrap_or_default(),
        }
    }
}

/// Scan `markup` once and report the deepest text.
///
/// A `<` that is the last character of the input counts as an opening tag:
/// there is no `/` after it.
pub fn scan(markup: &str) -> ScanReport {
    let mut state = ScanState::default();
    let mut chars = markup.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '<' => {
                let closing = matches!(chars.peek(), Some((_, '/')));
                if !state.open_or_close(closing) {
                    return ScanReport {
                        outcome: ScanOutcome::Malformed { offset },
                        max_depth: u64::try_from(state.max_depth).unwrap_or_default(),
                    };
                }
            }
            '>' => state.inside_tag = false,
            _ if !state.inside_tag => state.text(ch),
            _ => {}
        }
    }

    state.finish()
}

/// The deepest text of `markup`, or [`MALFORMED_SENTINEL`].
pub fn find_deepest_text(markup: &str) -> String {
    scan(markup).outcome.into_string()
}
