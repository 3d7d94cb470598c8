use super::document::TextDocument;
use super::matcher::{find_matches, SearchMatch, SearchOptions};
use std::ops::Range;
use tracing::{debug, warn};

/// Observable state of a search session, what a find/replace bar binds to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStorage {
    /// Text selected in the editor when search was opened, used to prefill the term.
    pub selected_text: Option<String>,
    pub term: String,
    pub options: SearchOptions,
    pub results: Vec<SearchMatch>,
    /// `None` whenever `results` is empty.
    pub selected_index: Option<usize>,
}

/// A find/replace session over one [`TextDocument`].
///
/// The session is idle while the term is empty. Every `search` replaces the
/// previous results wholesale; there is nothing in flight to cancel.
#[derive(Debug, Default)]
pub struct SearchEngine {
    storage: SearchStorage,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage(&self) -> &SearchStorage {
        &self.storage
    }

    pub fn term(&self) -> &str {
        &self.storage.term
    }

    pub fn options(&self) -> SearchOptions {
        self.storage.options
    }

    pub fn results(&self) -> &[SearchMatch] {
        &self.storage.results
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.storage.selected_index
    }

    pub fn selected_match(&self) -> Option<&SearchMatch> {
        self.storage
            .selected_index
            .and_then(|i| self.storage.results.get(i))
    }

    pub fn is_active(&self) -> bool {
        !self.storage.term.is_empty()
    }

    /// Run a new search. Selects the first match if there is one.
    /// Returns the number of matches.
    pub fn search<D: TextDocument>(&mut self, doc: &D, term: &str, options: SearchOptions) -> usize {
        self.storage.term = term.to_string();
        self.storage.options = options;
        self.recompute(doc.text(), None);
        self.storage.results.len()
    }

    pub fn set_selected_text(&mut self, text: Option<String>) {
        self.storage.selected_text = text;
    }

    /// Search for the editor selection, keeping the current options.
    /// Does nothing if there is no selection.
    pub fn search_selection<D: TextDocument>(&mut self, doc: &D) -> usize {
        match self.storage.selected_text.clone() {
            Some(text) if !text.is_empty() => self.search(doc, &text, self.storage.options),
            _ => 0,
        }
    }

    pub fn move_to_next_result(&mut self) {
        let len = self.storage.results.len();
        if let Some(i) = self.storage.selected_index {
            self.storage.selected_index = Some((i + 1) % len);
        }
    }

    pub fn move_to_previous_result(&mut self) {
        let len = self.storage.results.len();
        if let Some(i) = self.storage.selected_index {
            self.storage.selected_index = Some(if i == 0 { len - 1 } else { i - 1 });
        }
    }

    /// Replace the selected match with `replacement` (taken literally, also in
    /// regex mode) and search again. The match at the same position in the
    /// result list stays selected when there still is one.
    ///
    /// Returns false when nothing was selected.
    pub fn replace<D: TextDocument>(&mut self, doc: &mut D, replacement: &str) -> bool {
        self.refresh(&*doc);
        let Some(index) = self.storage.selected_index else {
            return false;
        };
        let range = self.storage.results[index].range.clone();
        doc.replace_range(range, replacement);
        self.recompute(doc.text(), Some(index));
        true
    }

    /// Replace every match, last one first so earlier offsets stay valid,
    /// then search again. Returns the number of replacements.
    pub fn replace_all<D: TextDocument>(&mut self, doc: &mut D, replacement: &str) -> usize {
        self.refresh(&*doc);
        let count = self.storage.results.len();
        if count == 0 {
            return 0;
        }
        for m in self.storage.results.iter().rev() {
            doc.replace_range(m.range.clone(), replacement);
        }
        debug!(count, "replaced all matches");
        self.recompute(doc.text(), None);
        count
    }

    /// Re-run the active search after the document was edited elsewhere.
    pub fn on_document_changed<D: TextDocument>(&mut self, doc: &D) {
        self.refresh(doc);
    }

    pub fn end_search(&mut self) {
        self.storage.term.clear();
        self.storage.selected_text = None;
        self.storage.results.clear();
        self.storage.selected_index = None;
    }

    /// "current/total" as shown next to the find box, "0/0" without matches.
    pub fn status_label(&self) -> String {
        match self.storage.selected_index {
            Some(i) => format!("{}/{}", i + 1, self.storage.results.len()),
            None => "0/0".to_string(),
        }
    }

    /// Ranges to decorate, flagged true for the selected one.
    pub fn highlights(&self) -> impl Iterator<Item = (Range<usize>, bool)> + '_ {
        let selected = self.storage.selected_index;
        self.storage
            .results
            .iter()
            .enumerate()
            .map(move |(i, m)| (m.range.clone(), Some(i) == selected))
    }

    fn refresh<D: TextDocument>(&mut self, doc: &D) {
        if self.is_active() {
            let keep = self.storage.selected_index;
            self.recompute(doc.text(), keep);
        }
    }

    fn recompute(&mut self, text: &str, preferred: Option<usize>) {
        let storage = &mut self.storage;
        storage.results = match find_matches(text, &storage.term, storage.options) {
            Ok(results) => results,
            Err(err) => {
                warn!(term = %storage.term, %err, "invalid search pattern, showing no matches");
                Vec::new()
            }
        };

        let len = storage.results.len();
        storage.selected_index = if len == 0 {
            None
        } else {
            Some(preferred.filter(|i| *i < len).unwrap_or(0))
        };
        debug!(term = %storage.term, matches = len, "search updated");
    }
}
