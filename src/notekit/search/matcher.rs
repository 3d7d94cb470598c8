use crate::error::Result;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    pub match_case: bool,
    pub match_whole_word: bool,
    pub enable_regex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub range: Range<usize>,
}

impl SearchMatch {
    pub fn new(range: Range<usize>) -> Self {
        Self { range }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.range.clone()]
    }
}

/// Compile `term` into the regex actually run against the text.
///
/// Plain terms are escaped. Whole-word wraps the pattern in `\b` so a match
/// must start and end on a word/non-word transition or the text edge.
pub fn build_pattern(term: &str, options: SearchOptions) -> Result<Regex> {
    let body = if options.enable_regex {
        // Validate the user's pattern on its own: wrapping can turn an
        // unbalanced pattern like ")(" into a valid one.
        Regex::new(term)?;
        term.to_string()
    } else {
        regex::escape(term)
    };

    let pattern = if options.match_whole_word {
        format!(r"\b(?:{})\b", body)
    } else {
        body
    };

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!options.match_case)
        .multi_line(true)
        .build()?;
    Ok(regex)
}

/// All non-empty matches of `term` in `text`, in document order.
///
/// An empty term never matches. A malformed regex is an
/// [`InvalidPattern`](crate::error::NotekitError::InvalidPattern) error.
pub fn find_matches(text: &str, term: &str, options: SearchOptions) -> Result<Vec<SearchMatch>> {
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let regex = build_pattern(term, options)?;
    Ok(regex
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| SearchMatch::new(m.range()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotekitError;

    fn starts(text: &str, term: &str, options: SearchOptions) -> Vec<usize> {
        find_matches(text, term, options)
            .unwrap()
            .iter()
            .map(SearchMatch::start)
            .collect()
    }

    #[test]
    fn case_insensitive_by_default() {
        let opts = SearchOptions::default();
        assert_eq!(starts("abc ABC abc", "abc", opts), vec![0, 4, 8]);
    }

    #[test]
    fn match_case_only_finds_exact_case() {
        let opts = SearchOptions {
            match_case: true,
            ..Default::default()
        };
        assert_eq!(starts("abc ABC abc", "abc", opts), vec![0, 8]);
    }

    #[test]
    fn empty_term_never_matches() {
        for enable_regex in [false, true] {
            for match_whole_word in [false, true] {
                let opts = SearchOptions {
                    match_case: false,
                    match_whole_word,
                    enable_regex,
                };
                assert!(find_matches("anything at all", "", opts).unwrap().is_empty());
            }
        }
    }

    #[test]
    fn plain_terms_are_literal() {
        let opts = SearchOptions::default();
        assert_eq!(starts("a.c abc a.c", "a.c", opts), vec![0, 8]);
        assert_eq!(starts("1+1=2", "1+1", opts), vec![0]);
    }

    #[test]
    fn whole_word_respects_boundaries() {
        let opts = SearchOptions {
            match_whole_word: true,
            ..Default::default()
        };
        assert_eq!(starts("cat concat cat.", "cat", opts), vec![0, 11]);
        assert_eq!(starts("cats", "cat", opts), Vec::<usize>::new());
    }

    #[test]
    fn regex_mode_uses_the_pattern() {
        let opts = SearchOptions {
            enable_regex: true,
            ..Default::default()
        };
        let found = find_matches("a1 b22 c333", r"\d+", opts).unwrap();
        let texts: Vec<&str> = found.iter().map(|m| m.as_str("a1 b22 c333")).collect();
        assert_eq!(texts, vec!["1", "22", "333"]);
    }

    #[test]
    fn zero_length_matches_are_dropped() {
        let opts = SearchOptions {
            enable_regex: true,
            ..Default::default()
        };
        assert!(find_matches("abc", "x*", opts).unwrap().is_empty());
        assert_eq!(starts("line\nline", "^", opts), Vec::<usize>::new());
    }

    #[test]
    fn anchors_work_per_line() {
        let opts = SearchOptions {
            enable_regex: true,
            ..Default::default()
        };
        assert_eq!(starts("todo one\ntodo two", "^todo", opts), vec![0, 9]);
    }

    #[test]
    fn malformed_regex_is_invalid_pattern() {
        let opts = SearchOptions {
            enable_regex: true,
            ..Default::default()
        };
        let err = find_matches("text", "(unclosed", opts).unwrap_err();
        assert!(matches!(err, NotekitError::InvalidPattern(_)));
    }

    #[test]
    fn malformed_regex_stays_invalid_under_whole_word() {
        let opts = SearchOptions {
            enable_regex: true,
            match_whole_word: true,
            ..Default::default()
        };
        assert!(find_matches("a b", ")(", opts).is_err());
    }

    #[test]
    fn offsets_are_bytes_on_char_boundaries() {
        let text = "café CAFÉ";
        let found = find_matches(text, "café", SearchOptions::default()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].as_str(text), "CAFÉ");
    }
}
