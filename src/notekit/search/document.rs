use std::ops::Range;

/// The editor surface the search engine works against.
pub trait TextDocument {
    /// Flattened plain text of the document.
    fn text(&self) -> &str;

    /// Replace the byte range `range` with `replacement`.
    fn replace_range(&mut self, range: Range<usize>, replacement: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainTextDocument {
    text: String,
}

impl PlainTextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Replace the whole content, as an editor does on load.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl TextDocument for PlainTextDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn replace_range(&mut self, range: Range<usize>, replacement: &str) {
        self.text.replace_range(range, replacement);
    }
}

impl From<String> for PlainTextDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for PlainTextDocument {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
