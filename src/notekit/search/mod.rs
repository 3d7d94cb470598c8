//! # Find and Replace
//!
//! In-document search over a plain-text projection of the note being edited.
//!
//! - [`matcher`]: turns a term plus [`SearchOptions`] into an ordered list of
//!   [`SearchMatch`] ranges. Pure, no state.
//! - [`document`]: the two things the engine needs from an editor, the
//!   current text and a way to replace a range of it.
//! - [`engine`]: [`SearchEngine`], the stateful session behind a find/replace
//!   bar: current term, results, the selected match, navigation and
//!   replacement.
//!
//! Offsets are byte offsets into the document text and always fall on char
//! boundaries, since they come straight out of the regex engine.

pub mod document;
pub mod engine;
pub mod matcher;

pub use document::{PlainTextDocument, TextDocument};
pub use engine::{SearchEngine, SearchStorage};
pub use matcher::{find_matches, SearchMatch, SearchOptions};
