//! Normalized edit-distance similarity
//!
//! Similarity is `1 - levenshtein(a, b) / max(|a|, |b|)` over case-folded
//! characters, in `[0.0, 1.0]` where `1.0` means identical. Two empty strings
//! are identical; one empty string against a non-empty one scores `0.0`.

use std::collections::HashMap;

/// Tolerance used when comparing a score against a threshold
pub const SCORE_EPSILON: f64 = 1e-9;

const WORD_BITS: usize = u64::BITS as usize;

/// Fold a character to lowercase, keeping it a single character
///
/// Characters whose lowercase form expands to several characters are kept
/// as they are so that folded text has the same length as the original.
pub fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Case-fold a string into a character vector
pub fn fold_chars(s: &str) -> Vec<char> {
    s.chars().map(fold_case).collect()
}

/// Levenshtein distance between two character slices
///
/// Uses two rows instead of the full matrix.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity for a known edit distance between strings of the given lengths
pub fn normalized_similarity(distance: usize, a_len: usize, b_len: usize) -> f64 {
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }
    1.0 - distance as f64 / max_len as f64
}

/// Similarity between two already case-folded character slices
pub fn similarity_folded(a: &[char], b: &[char]) -> f64 {
    normalized_similarity(levenshtein(a, b), a.len(), b.len())
}

/// Bit-parallel Levenshtein distances from one needle to every prefix of a text
///
/// Myers' bit-vector algorithm in Hyyrö's blocked form: the needle is split
/// into 64-row blocks and each text character advances every block by a
/// handful of word operations, so one pass over `text` yields the distance
/// to `text[..j]` for every `j`.
#[derive(Debug, Clone)]
pub struct PrefixDistances {
    len: usize,
    blocks: usize,
    peq: HashMap<char, Vec<u64>>,
}

impl PrefixDistances {
    /// Precompute match masks for a case-folded needle
    pub fn new(needle: &[char]) -> Self {
        let blocks = needle.len().div_ceil(WORD_BITS);
        let mut peq: HashMap<char, Vec<u64>> = HashMap::new();
        for (i, &c) in needle.iter().enumerate() {
            peq.entry(c).or_insert_with(|| vec![0; blocks])[i / WORD_BITS] |=
                1u64 << (i % WORD_BITS);
        }

        Self {
            len: needle.len(),
            blocks,
            peq,
        }
    }

    /// Needle length in characters
    pub fn needle_len(&self) -> usize {
        self.len
    }

    /// Fill `out` so that `out[j]` is the distance between the needle and
    /// `text[..j]`, for `j` in `0..=text.len()`
    pub fn compute(&self, text: &[char], out: &mut Vec<usize>) {
        out.clear();
        out.reserve(text.len() + 1);
        out.push(self.len);
        if self.len == 0 {
            out.extend(1..=text.len());
            return;
        }

        // Column 0: every vertical delta is +1
        let mut pv = vec![u64::MAX; self.blocks];
        let mut mv = vec![0u64; self.blocks];
        let last_row = (self.len - 1) % WORD_BITS;
        let mut score = self.len;

        for c in text {
            let eq = self.peq.get(c);
            // Row 0 grows by one per column
            let mut carry = 1i32;
            for block in 0..self.blocks {
                let high = if block + 1 == self.blocks {
                    last_row
                } else {
                    WORD_BITS - 1
                };
                let eq = eq.map_or(0, |masks| masks[block]);
                carry = advance_block(&mut pv[block], &mut mv[block], eq, carry, high);
            }
            score = score.wrapping_add_signed(carry as isize);
            out.push(score);
        }
    }
}

/// Advance one 64-row block by one text column, returning the horizontal
/// delta leaving row `high`
fn advance_block(pv: &mut u64, mv: &mut u64, eq: u64, hin: i32, high: usize) -> i32 {
    let hin_neg = u64::from(hin < 0);
    let hin_pos = u64::from(hin > 0);

    let xv = eq | *mv;
    let eq = eq | hin_neg;
    let xh = ((eq & *pv).wrapping_add(*pv) ^ *pv) | eq;

    let mut ph = *mv | !(xh | *pv);
    let mut mh = *pv & xh;
    let hout = ((ph >> high) & 1) as i32 - ((mh >> high) & 1) as i32;

    ph = (ph << 1) | hin_pos;
    mh = (mh << 1) | hin_neg;
    *pv = mh | !(xv | ph);
    *mv = ph & xv;

    hout
}

/// Case-insensitive similarity between two strings
///
/// # Examples
///
/// ```
/// use deid::redaction::similarity::similarity;
///
/// assert_eq!(similarity("John Smith", "JOHN SMITH"), 1.0);
/// assert!((similarity("Jon Smyth", "John Smith") - 0.8).abs() < 1e-9);
/// assert_eq!(similarity("", "abc"), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_folded(&fold_chars(a), &fold_chars(b))
}

/// Whether a score reaches a threshold, tolerating float rounding
pub fn meets_threshold(score: f64, threshold: f64) -> bool {
    score + SCORE_EPSILON >= threshold
}
