use crate::catalog::{Catalog, EntityResolver};
use crate::config::NotekitConfig;
use crate::model::{Pin, PinKind};
use crate::settings::ResolvedPin;
use std::ops::Range;

pub mod catalog;
pub mod config;
pub mod find;
pub mod pinning;
pub mod session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A pin as shown to the user: owned, so it outlives the catalog borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinView {
    pub kind: PinKind,
    pub id: String,
    /// `None` when the pinned entity no longer exists.
    pub title: Option<String>,
    /// Title of the parent notebook, for topics.
    pub parent: Option<String>,
}

impl PinView {
    pub fn from_resolved(resolved: &ResolvedPin<'_>, catalog: &Catalog) -> Self {
        let parent = match &resolved.pin {
            Pin::Topic(t) => catalog.notebook_by_id(&t.notebook_id).map(|n| n.title.clone()),
            _ => None,
        };
        Self {
            kind: resolved.pin.kind(),
            id: resolved.pin.id().to_string(),
            title: resolved.entity.map(|e| e.title().to_string()),
            parent,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.title.is_none()
    }
}

/// One match in `find` output, with enough context to print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchView {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in chars.
    pub column: usize,
    pub line_text: String,
    /// Byte range of the match within `line_text`.
    pub span: Range<usize>,
    pub selected: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub pins: Vec<PinView>,
    pub matches: Vec<MatchView>,
    /// Document text after a replace, when it changed.
    pub document: Option<String>,
    pub catalog: Option<Catalog>,
    pub config: Option<NotekitConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_pins(mut self, pins: Vec<PinView>) -> Self {
        self.pins = pins;
        self
    }

    pub fn with_matches(mut self, matches: Vec<MatchView>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_document(mut self, document: String) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_config(mut self, config: NotekitConfig) -> Self {
        self.config = Some(config);
        self
    }
}
