//! Length-preserving masking
//!
//! Every character covered by at least one span is replaced by the mask
//! character; everything else passes through untouched. The output has the
//! same number of characters as the input, so spans never shift each other and
//! can be applied in any order, overlapping or repeated.

use super::spans::MatchSpan;
use crate::domain::Result;

/// Mask every character covered by `spans`
///
/// # Errors
///
/// Returns [`crate::domain::DeidError::InvalidSpan`] if a span is empty, out of
/// range, or splits a character.
///
/// # Examples
///
/// ```
/// use deid::redaction::mask::apply_mask;
/// use deid::redaction::MatchSpan;
///
/// let doc = "Patient John Smith was seen.";
/// let masked = apply_mask(doc, &[MatchSpan::new(8, 12), MatchSpan::new(8, 18)], 'X').unwrap();
/// assert_eq!(masked, "Patient XXXXXXXXXX was seen.");
/// ```
pub fn apply_mask(document: &str, spans: &[MatchSpan], mask: char) -> Result<String> {
    if spans.is_empty() {
        return Ok(document.to_string());
    }

    // Coverage depth per byte via a difference array.
    let mut depth = vec![0i32; document.len() + 1];
    for span in spans {
        span.validate(document)?;
        depth[span.start] += 1;
        depth[span.end] -= 1;
    }

    let mut masked = String::with_capacity(document.len());
    let mut covered = 0i32;
    let mut next_byte = 0usize;
    for (offset, c) in document.char_indices() {
        while next_byte <= offset {
            covered += depth[next_byte];
            next_byte += 1;
        }
        masked.push(if covered > 0 { mask } else { c });
    }

    Ok(masked)
}
