//! Notebooks, topics and tags: the live entities pins point at.
//!
//! The settings store only records references. Turning a reference back into
//! an entity goes through [`EntityResolver`], so the pinboard can be resolved
//! against this local [`Catalog`] or against any other source of notebooks
//! and tags the host application has.

use crate::error::{NotekitError, Result};
use crate::model::now_millis;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CATALOG_KEY: &str = "catalog";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub date_created: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub title: String,
}

/// Lookup of live entities by id. Implemented by [`Catalog`].
pub trait EntityResolver {
    fn notebook_by_id(&self, id: &str) -> Option<&Notebook>;

    /// Topics are only found within their parent notebook.
    fn topic_by_id(&self, notebook_id: &str, id: &str) -> Option<&Topic>;

    fn tag_by_id(&self, id: &str) -> Option<&Tag>;
}

/// An entity a pin resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedEntity<'a> {
    Notebook(&'a Notebook),
    Topic(&'a Topic),
    Tag(&'a Tag),
}

impl<'a> PinnedEntity<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            PinnedEntity::Notebook(n) => &n.id,
            PinnedEntity::Topic(t) => &t.id,
            PinnedEntity::Tag(t) => &t.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            PinnedEntity::Notebook(n) => &n.title,
            PinnedEntity::Topic(t) => &t.title,
            PinnedEntity::Tag(t) => &t.title,
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub notebooks: Vec<Notebook>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Catalog {
    /// Load the catalog document, or an empty catalog if none was saved yet.
    pub fn load<S: DocumentStore>(store: &S) -> Result<Self> {
        Ok(store.read_doc(CATALOG_KEY)?.unwrap_or_default())
    }

    pub fn save<S: DocumentStore>(&self, store: &S) -> Result<()> {
        store.write_doc(CATALOG_KEY, self)
    }

    pub fn add_notebook(&mut self, title: &str) -> &Notebook {
        self.insert_notebook_with_id(&new_id(), title)
    }

    pub fn insert_notebook_with_id(&mut self, id: &str, title: &str) -> &Notebook {
        self.notebooks.push(Notebook {
            id: id.to_string(),
            title: title.to_string(),
            topics: Vec::new(),
            date_created: now_millis(),
        });
        &self.notebooks[self.notebooks.len() - 1]
    }

    pub fn add_topic(&mut self, notebook_id: &str, title: &str) -> Result<&Topic> {
        self.insert_topic_with_id(notebook_id, &new_id(), title)
    }

    pub fn insert_topic_with_id(
        &mut self,
        notebook_id: &str,
        id: &str,
        title: &str,
    ) -> Result<&Topic> {
        let notebook = self
            .notebooks
            .iter_mut()
            .find(|n| n.id == notebook_id)
            .ok_or_else(|| NotekitError::NotFound(format!("notebook {}", notebook_id)))?;
        notebook.topics.push(Topic {
            id: id.to_string(),
            title: title.to_string(),
        });
        Ok(&notebook.topics[notebook.topics.len() - 1])
    }

    pub fn add_tag(&mut self, title: &str) -> &Tag {
        self.insert_tag_with_id(&new_id(), title)
    }

    pub fn insert_tag_with_id(&mut self, id: &str, title: &str) -> &Tag {
        self.tags.push(Tag {
            id: id.to_string(),
            title: title.to_string(),
        });
        &self.tags[self.tags.len() - 1]
    }

    /// Removes a notebook along with its topics.
    pub fn remove_notebook(&mut self, id: &str) -> Option<Notebook> {
        let idx = self.notebooks.iter().position(|n| n.id == id)?;
        Some(self.notebooks.remove(idx))
    }

    pub fn remove_topic(&mut self, notebook_id: &str, id: &str) -> Option<Topic> {
        let notebook = self.notebooks.iter_mut().find(|n| n.id == notebook_id)?;
        let idx = notebook.topics.iter().position(|t| t.id == id)?;
        Some(notebook.topics.remove(idx))
    }

    pub fn remove_tag(&mut self, id: &str) -> Option<Tag> {
        let idx = self.tags.iter().position(|t| t.id == id)?;
        Some(self.tags.remove(idx))
    }
}

impl EntityResolver for Catalog {
    fn notebook_by_id(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|n| n.id == id)
    }

    fn topic_by_id(&self, notebook_id: &str, id: &str) -> Option<&Topic> {
        self.notebook_by_id(notebook_id)?
            .topics
            .iter()
            .find(|t| t.id == id)
    }

    fn tag_by_id(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }
}
