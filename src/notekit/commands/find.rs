use crate::commands::{CmdMessage, CmdResult, MatchView};
use crate::error::{NotekitError, Result};
use crate::search::matcher::build_pattern;
use crate::search::{PlainTextDocument, SearchEngine, SearchOptions, TextDocument};

/// Which matches a replace touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceTarget {
    All,
    /// 1-based position in the match list.
    Nth(usize),
}

/// List every match of `term` in `text`, the first one selected.
pub fn run(text: &str, term: &str, options: SearchOptions) -> Result<CmdResult> {
    let doc = PlainTextDocument::new(text);
    let mut engine = SearchEngine::new();
    engine.search(&doc, term, options);

    let mut result = CmdResult::default().with_matches(match_views(&engine, doc.text()));
    report_count(&mut result, &engine, term, options);
    Ok(result)
}

/// Replace matches of `term` in `text`. The rewritten text is returned in
/// `CmdResult::document` when anything changed.
pub fn replace(
    text: &str,
    term: &str,
    options: SearchOptions,
    replacement: &str,
    target: ReplaceTarget,
) -> Result<CmdResult> {
    let mut doc = PlainTextDocument::new(text);
    let mut engine = SearchEngine::new();
    let total = engine.search(&doc, term, options);

    let mut result = CmdResult::default();
    let replaced = match target {
        ReplaceTarget::All => engine.replace_all(&mut doc, replacement),
        ReplaceTarget::Nth(n) => {
            if n == 0 || n > total {
                return Err(NotekitError::Api(format!(
                    "Match {} does not exist ({} found)",
                    n, total
                )));
            }
            for _ in 1..n {
                engine.move_to_next_result();
            }
            usize::from(engine.replace(&mut doc, replacement))
        }
    };

    if replaced == 0 {
        report_count(&mut result, &engine, term, options);
        return Ok(result);
    }

    result.add_message(CmdMessage::success(format!(
        "Replaced {} of {} match{}",
        replaced,
        total,
        if total == 1 { "" } else { "es" }
    )));
    if !engine.results().is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} match{} remaining",
            engine.results().len(),
            if engine.results().len() == 1 { "" } else { "es" }
        )));
    }
    let matches = match_views(&engine, doc.text());
    Ok(result.with_matches(matches).with_document(doc.into_string()))
}

fn report_count(result: &mut CmdResult, engine: &SearchEngine, term: &str, options: SearchOptions) {
    if term.is_empty() {
        result.add_message(CmdMessage::warning("Empty search term."));
        return;
    }
    if engine.results().is_empty() {
        if let Err(err) = build_pattern(term, options) {
            result.add_message(CmdMessage::error(err.to_string()));
        }
        result.add_message(CmdMessage::info("No matches found (0/0)."));
    }
}

fn match_views(engine: &SearchEngine, text: &str) -> Vec<MatchView> {
    engine
        .highlights()
        .map(|(range, selected)| {
            let line_start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
            let line_end = text[range.start..]
                .find('\n')
                .map_or(text.len(), |i| range.start + i);
            let line = text[..range.start].matches('\n').count() + 1;
            let column = text[line_start..range.start].chars().count() + 1;

            MatchView {
                line,
                column,
                line_text: text[line_start..line_end].to_string(),
                span: (range.start - line_start)..(range.end.min(line_end) - line_start),
                selected,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn lists_matches_with_positions() {
        let text = "first line\nsecond Line\nline three";
        let result = run(text, "line", SearchOptions::default()).unwrap();

        let positions: Vec<(usize, usize)> =
            result.matches.iter().map(|m| (m.line, m.column)).collect();
        assert_eq!(positions, vec![(1, 7), (2, 8), (3, 1)]);
        assert!(result.matches[0].selected);
        assert_eq!(result.matches[1].line_text, "second Line");
        assert_eq!(&result.matches[1].line_text[result.matches[1].span.clone()], "Line");
    }

    #[test]
    fn columns_count_chars_not_bytes() {
        let result = run("héllo wörld", "wörld", SearchOptions::default()).unwrap();
        assert_eq!(result.matches[0].column, 7);
    }

    #[test]
    fn invalid_regex_reports_error_and_no_matches() {
        let opts = SearchOptions {
            enable_regex: true,
            ..Default::default()
        };
        let result = run("text", "([", opts).unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.messages[1].content.contains("0/0"));
    }

    #[test]
    fn replace_all_rewrites_document() {
        let result = replace("aa", "a", SearchOptions::default(), "X", ReplaceTarget::All).unwrap();
        assert_eq!(result.document.as_deref(), Some("XX"));
        assert!(result.matches.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn replace_nth_only_touches_that_match() {
        let result = replace(
            "one one one",
            "one",
            SearchOptions::default(),
            "1",
            ReplaceTarget::Nth(2),
        )
        .unwrap();
        assert_eq!(result.document.as_deref(), Some("one 1 one"));
        assert_eq!(result.matches.len(), 2);
        assert!(result.matches[1].selected);
    }

    #[test]
    fn replace_nth_out_of_range_fails() {
        let err = replace("one", "one", SearchOptions::default(), "1", ReplaceTarget::Nth(2))
            .unwrap_err();
        assert!(matches!(err, NotekitError::Api(_)));
    }

    #[test]
    fn replace_without_matches_leaves_document_alone() {
        let result = replace("abc", "zzz", SearchOptions::default(), "y", ReplaceTarget::All).unwrap();
        assert!(result.document.is_none());
    }

    #[test]
    fn multi_line_regex_match_is_clipped_to_its_first_line() {
        let opts = SearchOptions {
            enable_regex: true,
            ..Default::default()
        };
        let result = run("ab\ncd", r"b\nc", opts).unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].line_text, "ab");
        assert_eq!(result.matches[0].span, 1..2);
    }
}
