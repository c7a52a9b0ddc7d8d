//! Candidate expansion and literal matcher compilation
//!
//! Every identifier is expanded into match candidates (the identifier itself,
//! accepted fuzzy windows, and its long-enough words) and each candidate is
//! compiled into a case-insensitive literal matcher. Needles and documents are
//! compared after the same per-character case folding used for similarity, so
//! `MÜLLER` matches `Müller`. Candidates are matched verbatim, so characters
//! such as `.`, `(` or `*` need no escaping.

use super::config::RedactionConfig;
use super::similarity::fold_case;
use super::window::{FoldedText, WindowGenerator};
use super::words::split_words;
use crate::domain::{DeidError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where a candidate string came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// The identifier itself
    Exact,
    /// Document text of an accepted fuzzy window
    Fuzzy,
    /// A word of the identifier longer than the minimum word length
    Word,
}

impl CandidateSource {
    /// Lowercase label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::Word => "word",
        }
    }
}

/// A string to be matched literally
#[derive(Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Needle text
    pub text: String,
    /// Origin of the needle
    pub source: CandidateSource,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(text: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

// Candidate text is identifying; keep it out of debug output.
impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("len", &self.text.chars().count())
            .field("source", &self.source)
            .finish()
    }
}

/// Case-insensitive literal matcher for a single needle
///
/// The automaton is built over the folded needle and run over
/// [`FoldedText::folded`]. Matches are reported leftmost-first and never
/// overlap each other.
pub struct LiteralMatcher {
    automaton: AhoCorasick,
    source: CandidateSource,
    needle_len: usize,
}

impl std::fmt::Debug for LiteralMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteralMatcher")
            .field("needle_len", &self.needle_len)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl LiteralMatcher {
    /// Compile a needle
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::PatternCompilation`] for an empty needle or when
    /// the automaton cannot be built.
    pub fn new(needle: &str, source: CandidateSource) -> Result<Self> {
        let needle_len = needle.chars().count();
        if needle.is_empty() {
            return Err(DeidError::PatternCompilation {
                candidate_len: 0,
                reason: "empty needle".to_string(),
            });
        }

        let folded: String = needle.chars().map(fold_case).collect();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build([folded])
            .map_err(|e| DeidError::PatternCompilation {
                candidate_len: needle_len,
                reason: e.to_string(),
            })?;

        Ok(Self {
            automaton,
            source,
            needle_len,
        })
    }

    /// Origin of the compiled needle
    pub fn source(&self) -> CandidateSource {
        self.source
    }

    /// Needle length in characters
    pub fn needle_len(&self) -> usize {
        self.needle_len
    }

    /// Non-overlapping `(start, end)` byte ranges of every match in the
    /// original document, left to right
    pub fn find_iter<'a>(&'a self, text: &'a FoldedText) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.automaton
            .find_iter(text.folded())
            .filter_map(move |m| text.original_range(m.start(), m.end()))
    }
}

/// Matchers compiled from one identifier's candidates
#[derive(Debug, Default)]
pub struct CompiledPatterns {
    /// Successfully compiled matchers
    pub matchers: Vec<LiteralMatcher>,
    /// Candidates that failed to compile
    pub failures: Vec<DeidError>,
}

impl CompiledPatterns {
    /// Whether every candidate compiled
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Expands identifiers into candidates and compiles them
#[derive(Debug, Clone)]
pub struct PatternCompiler {
    min_word_length: usize,
    windows: WindowGenerator,
}

impl PatternCompiler {
    /// Create a compiler from a validated configuration
    pub fn new(config: &RedactionConfig) -> Self {
        Self {
            min_word_length: config.min_word_length,
            windows: WindowGenerator::new(config),
        }
    }

    /// Expand one identifier into candidates against an indexed document
    ///
    /// Order: the trimmed identifier, then fuzzy window texts left to right,
    /// then identifier words. Blank candidates are dropped and a needle that
    /// folds to one already produced for this identifier is not repeated.
    pub fn candidates(&self, text: &FoldedText, document: &str, identifier: &str) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut push = |needle: &str, source: CandidateSource| {
            let key: String = needle.chars().map(fold_case).collect();
            if !needle.trim().is_empty() && seen.insert(key) {
                candidates.push(Candidate::new(needle, source));
            }
        };

        let identifier = identifier.trim();
        push(identifier, CandidateSource::Exact);

        for window in self.windows.windows(text, identifier) {
            push(window.text(document), CandidateSource::Fuzzy);
        }

        for word in split_words(identifier, self.min_word_length) {
            push(word, CandidateSource::Word);
        }

        candidates
    }

    /// Compile candidates, collecting failures instead of stopping at the first
    pub fn compile(&self, candidates: &[Candidate]) -> CompiledPatterns {
        let mut compiled = CompiledPatterns::default();
        for candidate in candidates {
            match LiteralMatcher::new(&candidate.text, candidate.source) {
                Ok(matcher) => compiled.matchers.push(matcher),
                Err(e) => {
                    tracing::warn!(
                        source = candidate.source.label(),
                        error = %e,
                        "Failed to compile candidate"
                    );
                    compiled.failures.push(e);
                }
            }
        }
        compiled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler(threshold: f64, min_word_length: usize) -> PatternCompiler {
        PatternCompiler::new(&RedactionConfig::new(threshold, min_word_length))
    }

    #[test]
    fn test_literal_matcher_is_case_insensitive() {
        let matcher = LiteralMatcher::new("john smith", CandidateSource::Exact).unwrap();
        let text = FoldedText::new("JOHN SMITH met John Smith");
        let hits: Vec<_> = matcher.find_iter(&text).collect();
        assert_eq!(hits, vec![(0, 10), (15, 25)]);
    }

    #[test]
    fn test_literal_matcher_folds_non_ascii_letters() {
        let matcher = LiteralMatcher::new("Müller", CandidateSource::Word).unwrap();
        let text = FoldedText::new("Dr MÜLLER reviewed; MULLER did not");
        let hits: Vec<_> = matcher.find_iter(&text).collect();
        assert_eq!(hits, vec![(3, 10)]);

        let zoe = LiteralMatcher::new("ZOË", CandidateSource::Exact).unwrap();
        let text = FoldedText::new("Zoë, zoë and ZOË");
        assert_eq!(zoe.find_iter(&text).count(), 3);
    }

    #[test]
    fn test_literal_matcher_treats_metacharacters_verbatim() {
        let matcher = LiteralMatcher::new("O'Brien (Jr.)", CandidateSource::Exact).unwrap();
        let text = FoldedText::new("Seen: o'brien (jr.) today; OBrien Jr");
        let hits: Vec<_> = matcher.find_iter(&text).collect();
        assert_eq!(hits, vec![(6, 19)]);

        let dots = LiteralMatcher::new("a.b", CandidateSource::Exact).unwrap();
        assert_eq!(dots.find_iter(&FoldedText::new("axb a.b")).count(), 1);
    }

    #[test]
    fn test_literal_matcher_matches_do_not_overlap() {
        let matcher = LiteralMatcher::new("aa", CandidateSource::Word).unwrap();
        let text = FoldedText::new("aaaaa");
        let hits: Vec<_> = matcher.find_iter(&text).collect();
        assert_eq!(hits, vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_empty_needle_fails_to_compile() {
        let err = LiteralMatcher::new("", CandidateSource::Exact).unwrap_err();
        assert!(matches!(
            err,
            DeidError::PatternCompilation { candidate_len: 0, .. }
        ));
    }

    #[test]
    fn test_candidates_cover_all_sources() {
        let doc = "Jon Smyth attended.";
        let text = FoldedText::new(doc);
        let candidates = compiler(0.8, 3).candidates(&text, doc, " John Smith ");

        assert_eq!(candidates[0], Candidate::new("John Smith", CandidateSource::Exact));
        assert!(candidates.contains(&Candidate::new("Jon Smyth", CandidateSource::Fuzzy)));
        assert!(candidates.contains(&Candidate::new("John", CandidateSource::Word)));
        assert!(candidates.contains(&Candidate::new("Smith", CandidateSource::Word)));
    }

    #[test]
    fn test_candidates_are_not_repeated() {
        let doc = "Smith and Smith";
        let text = FoldedText::new(doc);
        let candidates = compiler(1.0, 3).candidates(&text, doc, "Smith");
        assert_eq!(candidates, vec![Candidate::new("Smith", CandidateSource::Exact)]);
    }

    #[test]
    fn test_case_variants_fold_to_one_candidate() {
        let doc = "ZOË came in";
        let text = FoldedText::new(doc);
        let candidates = compiler(1.0, 2).candidates(&text, doc, "Zoë");
        assert_eq!(candidates, vec![Candidate::new("Zoë", CandidateSource::Exact)]);
    }

    #[test]
    fn test_blank_identifier_has_no_candidates() {
        let doc = "anything";
        let text = FoldedText::new(doc);
        assert!(compiler(0.8, 3).candidates(&text, doc, "   ").is_empty());
    }

    #[test]
    fn test_compile_isolates_failures() {
        let candidates = vec![
            Candidate::new("Smith", CandidateSource::Exact),
            Candidate::new("", CandidateSource::Word),
            Candidate::new("John", CandidateSource::Word),
        ];
        let compiled = compiler(0.9, 3).compile(&candidates);
        assert_eq!(compiled.matchers.len(), 2);
        assert_eq!(compiled.failures.len(), 1);
        assert!(!compiled.is_complete());
    }

    #[test]
    fn test_debug_output_hides_text() {
        let candidate = Candidate::new("John Smith", CandidateSource::Exact);
        let matcher = LiteralMatcher::new("John Smith", CandidateSource::Exact).unwrap();
        assert!(!format!("{candidate:?}").contains("John"));
        assert!(!format!("{matcher:?}").contains("John"));
    }
}
