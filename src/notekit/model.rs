use crate::error::{NotekitError, Result};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

pub const SETTINGS_TYPE: &str = "settings";

fn settings_type() -> String {
    SETTINGS_TYPE.to_string()
}

fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Pins are validated when they are added, not when they are read back.
/// Entries this version cannot represent (another client's pin type, a topic
/// without its notebook) are dropped instead of failing the whole document.
fn lenient_pins<'de, D>(deserializer: D) -> std::result::Result<Vec<Pin>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Pin>(value.clone()) {
            Ok(pin) => Some(pin),
            Err(e) => {
                warn!(pin = %value, error = %e, "ignoring unreadable pin");
                None
            }
        })
        .collect())
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// The single settings document owned by a [`crate::settings::Settings`] store.
///
/// Keys the crate does not model are kept in `extra` so that a shallow
/// `merge` never drops data written by another client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    #[serde(rename = "type", default = "settings_type")]
    pub doc_type: String,
    #[serde(default = "new_document_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_pins")]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub date_edited: i64,
    #[serde(default)]
    pub date_created: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsDocument {
    pub fn fresh() -> Self {
        Self {
            doc_type: settings_type(),
            id: new_document_id(),
            pins: Vec::new(),
            date_edited: 0,
            date_created: now_millis(),
            extra: Map::new(),
        }
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.pins.iter().position(|p| p.id() == id)
    }

    /// Bumps `date_edited`, never moving it backwards if the clock does.
    pub(crate) fn touch(&mut self) {
        self.date_edited = now_millis().max(self.date_edited);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    Notebook,
    Topic,
    Tag,
}

impl fmt::Display for PinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PinKind::Notebook => "notebook",
            PinKind::Topic => "topic",
            PinKind::Tag => "tag",
        };
        f.write_str(s)
    }
}

impl FromStr for PinKind {
    type Err = NotekitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "notebook" => Ok(PinKind::Notebook),
            "topic" => Ok(PinKind::Topic),
            "tag" => Ok(PinKind::Tag),
            other => Err(NotekitError::InvalidPinType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRef {
    pub id: String,
    pub notebook_id: String,
}

/// A pinned reference, stored as `{"type": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Pin {
    Notebook(EntityRef),
    Topic(TopicRef),
    Tag(EntityRef),
}

impl Pin {
    pub fn notebook(id: impl Into<String>) -> Self {
        Pin::Notebook(EntityRef { id: id.into() })
    }

    pub fn topic(notebook_id: impl Into<String>, id: impl Into<String>) -> Self {
        Pin::Topic(TopicRef {
            id: id.into(),
            notebook_id: notebook_id.into(),
        })
    }

    pub fn tag(id: impl Into<String>) -> Self {
        Pin::Tag(EntityRef { id: id.into() })
    }

    /// Builds a pin from loosely typed input, e.g. CLI arguments.
    pub fn from_parts(kind: &str, id: &str, notebook_id: Option<&str>) -> Result<Self> {
        match kind.parse::<PinKind>()? {
            PinKind::Notebook => Ok(Pin::notebook(id)),
            PinKind::Tag => Ok(Pin::tag(id)),
            PinKind::Topic => {
                let notebook_id =
                    notebook_id.ok_or_else(|| NotekitError::MissingNotebookId(id.to_string()))?;
                Ok(Pin::topic(notebook_id, id))
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Pin::Notebook(r) | Pin::Tag(r) => &r.id,
            Pin::Topic(t) => &t.id,
        }
    }

    pub fn kind(&self) -> PinKind {
        match self {
            Pin::Notebook(_) => PinKind::Notebook,
            Pin::Topic(_) => PinKind::Topic,
            Pin::Tag(_) => PinKind::Tag,
        }
    }
}
