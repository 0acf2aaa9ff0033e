//! Incremental phone number mask engine.
//!
//! # Responsibility
//! - Re-render the entry buffer against the `(##) #####-####` pattern after
//!   every edit, with the caret placed after the last rendered character.
//! - Enforce the 11-digit cap by truncating the offending edit instead of
//!   silently clamping.
//! - Provide the read-side display formatter used by list rendering.
//!
//! # Invariants
//! - [`advance`] is a pure function; re-entrancy suppression is carried in
//!   the explicit [`MaskState`] instead of hidden mutable state.
//! - Applying the engine to its own output leaves the buffer unchanged.
//! - Literals in the entry mask are only emitted while unconsumed digits
//!   remain, so a partial number never ends in dangling punctuation slots.

use crate::model::contact::PHONE_DIGIT_COUNT;
use once_cell::sync::Lazy;
use regex::Regex;

/// Entry/display pattern: `#` consumes one digit, everything else is literal.
const MASK_PATTERN: &str = "(##) #####-####";

static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]").expect("valid non-digit regex"));

/// Where the engine is in its edit/replace cycle.
///
/// The UI feeds every buffer change back into [`advance`], including the
/// programmatic replacement the engine itself requested. `Reformatting` marks
/// exactly that echo so it is not processed as a fresh user edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskState {
    /// Ready to process a user edit.
    #[default]
    Idle,
    /// The next buffer notification is the engine's own replacement.
    Reformatting,
}

/// Result of one engine pass over the entry buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Buffer the widget should display after this pass.
    pub buffer: String,
    /// Caret position in characters, always at the end of `buffer`.
    pub caret: usize,
    /// Whether the most recent edit was refused for exceeding the digit cap.
    pub rejected: bool,
    /// State to hand back on the next [`advance`] call.
    pub state: MaskState,
}

impl EditOutcome {
    fn passthrough(buffer: &str, state: MaskState) -> Self {
        Self {
            caret: buffer.chars().count(),
            buffer: buffer.to_string(),
            rejected: false,
            state,
        }
    }
}

/// Strips every non-digit character, yielding the canonical digit string.
pub fn strip_non_digits(value: &str) -> String {
    NON_DIGIT_RE.replace_all(value, "").into_owned()
}

/// Processes one buffer change and returns the reformatted outcome.
///
/// # Contract
/// - `Reformatting` passes return the buffer untouched and fall back to
///   `Idle`: the change was the engine's own replacement.
/// - More than [`PHONE_DIGIT_COUNT`] digits: the last character of the raw
///   buffer is dropped and the pass stops with `rejected = true`. The UI's
///   follow-up notification of the truncated buffer is then handled as a
///   fresh edit, which re-renders the mask.
/// - Otherwise the buffer is re-rendered prefix-wise over the mask and the
///   caret moves to its end. The outcome state is `Reformatting` only when
///   the rendered text differs from the input, since only then will the UI
///   echo a programmatic replacement back.
pub fn advance(state: MaskState, buffer: &str) -> EditOutcome {
    if state == MaskState::Reformatting {
        return EditOutcome::passthrough(buffer, MaskState::Idle);
    }

    let digits = strip_non_digits(buffer);
    if digits.len() > PHONE_DIGIT_COUNT {
        let mut truncated = buffer.to_string();
        truncated.pop();
        return EditOutcome {
            caret: truncated.chars().count(),
            buffer: truncated,
            rejected: true,
            state: MaskState::Idle,
        };
    }

    let rendered = render_partial(&digits);
    let state = if rendered == buffer {
        MaskState::Idle
    } else {
        MaskState::Reformatting
    };
    EditOutcome {
        caret: rendered.chars().count(),
        buffer: rendered,
        rejected: false,
        state,
    }
}

/// Stateful convenience wrapper for widget loops.
///
/// Thin shell over [`advance`] that carries the [`MaskState`] between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneMask {
    state: MaskState,
}

impl PhoneMask {
    /// Creates an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one buffer change, advancing the internal state.
    pub fn on_edit(&mut self, buffer: &str) -> EditOutcome {
        let outcome = advance(self.state, buffer);
        self.state = outcome.state;
        outcome
    }
}

/// Formats a stored number for read-side display.
///
/// Unlike the entry mask this variant emits literals up to the next digit
/// slot even when they trail the last digit, so `"11"` renders as `"(11) "`.
/// Rendering stops once digits run out.
pub fn format_display(number: &str) -> String {
    let digits = strip_non_digits(number);
    let mut out = String::new();
    let mut pending = digits.chars();
    for slot in MASK_PATTERN.chars() {
        if slot == '#' {
            match pending.next() {
                Some(digit) => out.push(digit),
                None => break,
            }
        } else {
            out.push(slot);
        }
    }
    out
}

/// Renders the entry mask prefix-wise: literals are emitted only while
/// unconsumed digits remain, digits fill the `#` slots, rendering stops when
/// digits run out.
fn render_partial(digits: &str) -> String {
    let mut out = String::new();
    let mut pending = digits.chars();
    let mut remaining = digits.len();
    for slot in MASK_PATTERN.chars() {
        if slot != '#' && remaining > 0 {
            out.push(slot);
        } else {
            match pending.next() {
                Some(digit) => {
                    out.push(digit);
                    remaining -= 1;
                }
                None => break,
            }
        }
    }
    out
}
