//! Input admissibility checks and text sanitization
//!
//! Sanitization always runs before emptiness and length checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{QuoteError, QuoteResult};
use crate::pricing::Dimensions;

/// Largest letter height, in inches
pub const MAX_HEIGHT: f64 = 120.0;

/// Largest letter width, in inches
pub const MAX_WIDTH: f64 = 120.0;

/// Largest letter depth, in inches
pub const MAX_DEPTH: f64 = 24.0;

static MARKUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup regex pattern"));

static DISALLOWED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s.,!?@#$%\^&*()\-]").expect("Invalid character filter regex pattern")
});

static HEX_COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("Invalid hex color regex pattern"));

// ============================================================================
// Dimension Validations
// ============================================================================

/// Check every dimension is finite, positive and within its bound
pub fn validate_dimensions(dimensions: &Dimensions) -> QuoteResult<()> {
    for (field, value, max) in [
        ("height", dimensions.height, MAX_HEIGHT),
        ("width", dimensions.width, MAX_WIDTH),
        ("depth", dimensions.depth, MAX_DEPTH),
    ] {
        if !value.is_finite() || value <= 0.0 || value > max {
            return Err(QuoteError::InvalidDimension { field, value });
        }
    }
    Ok(())
}

/// Quick yes/no gate used before pricing a live estimate
pub fn validate_inputs(height: f64, width: f64, depth: f64, text: &str) -> bool {
    validate_dimensions(&Dimensions::new(height, width, depth)).is_ok() && !text.trim().is_empty()
}

// ============================================================================
// Text Validations
// ============================================================================

/// Strip markup and anything outside the allow-list, then trim
pub fn sanitize_text(text: &str) -> String {
    let without_markup = MARKUP_PATTERN.replace_all(text, "");
    let allowed = DISALLOWED_PATTERN.replace_all(&without_markup, "");
    allowed.trim().to_string()
}

/// Sanitize letters and check they are non-empty and short enough.
///
/// Returns the sanitized text.
pub fn validate_letters(text: &str, max_letters: usize) -> QuoteResult<String> {
    let sanitized = sanitize_text(text);
    let count = letter_count(&sanitized);
    if count == 0 {
        return Err(QuoteError::EmptyText);
    }
    if count > max_letters {
        return Err(QuoteError::TextTooLong {
            max: max_letters,
            actual: count,
        });
    }
    Ok(sanitized)
}

/// Number of letter positions in a text; inner spaces count as positions
pub fn letter_count(text: &str) -> usize {
    text.trim().chars().count()
}

/// `#rrggbb` hex color
pub fn is_valid_hex_color(hex: &str) -> bool {
    HEX_COLOR_PATTERN.is_match(hex)
}
