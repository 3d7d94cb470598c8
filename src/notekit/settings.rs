//! # Pinboard Settings Store
//!
//! [`Settings`] owns one [`SettingsDocument`] and keeps it in sync with a
//! [`DocumentStore`]: every mutation is written through as a whole document,
//! there is no batching and no rollback. Reads always see the in-memory copy;
//! the store is only read back by [`Settings::init`].
//!
//! Pins are references, not entities. [`Settings::pins`] turns them into live
//! notebooks, topics and tags through an [`EntityResolver`]. What happens to a
//! pin whose target has since been deleted is decided by [`StalePinPolicy`].
//!
//! ## Lifecycle
//!
//! There is no global event bus. The session controller either calls
//! [`Settings::on_logout`] directly or sends [`SessionEvent`]s over a channel
//! that the owner drains with [`Settings::drain_events`].

use crate::catalog::{EntityResolver, PinnedEntity};
use crate::error::{NotekitError, Result};
use crate::model::{Pin, SettingsDocument};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::Receiver;
use tracing::{debug, warn};

pub const DEFAULT_SETTINGS_KEY: &str = "settings";

/// What the pinboard view does with pins whose target no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePinPolicy {
    /// Listed with no entity attached.
    #[default]
    Keep,
    /// Left out of the view but kept in the document.
    Skip,
    /// Left out of the view and removed from the document by `prune_stale`.
    Unpin,
}

impl fmt::Display for StalePinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StalePinPolicy::Keep => "keep",
            StalePinPolicy::Skip => "skip",
            StalePinPolicy::Unpin => "unpin",
        };
        f.write_str(s)
    }
}

impl FromStr for StalePinPolicy {
    type Err = NotekitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "keep" => Ok(StalePinPolicy::Keep),
            "skip" => Ok(StalePinPolicy::Skip),
            "unpin" => Ok(StalePinPolicy::Unpin),
            other => Err(NotekitError::Api(format!(
                "Unknown stale pin policy '{}' (expected keep, skip or unpin)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedOut,
}

/// A stored pin together with the entity it points at, if that still exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPin<'a> {
    pub pin: Pin,
    pub entity: Option<PinnedEntity<'a>>,
}

impl ResolvedPin<'_> {
    pub fn is_stale(&self) -> bool {
        self.entity.is_none()
    }
}

pub fn resolve_pin<'r, R: EntityResolver>(pin: &Pin, resolver: &'r R) -> Option<PinnedEntity<'r>> {
    match pin {
        Pin::Notebook(r) => resolver.notebook_by_id(&r.id).map(PinnedEntity::Notebook),
        Pin::Topic(t) => resolver
            .topic_by_id(&t.notebook_id, &t.id)
            .map(PinnedEntity::Topic),
        Pin::Tag(r) => resolver.tag_by_id(&r.id).map(PinnedEntity::Tag),
    }
}

pub struct Settings<S: DocumentStore> {
    store: S,
    key: String,
    doc: SettingsDocument,
    stale_pins: StalePinPolicy,
}

impl<S: DocumentStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SETTINGS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            doc: SettingsDocument::fresh(),
            stale_pins: StalePinPolicy::default(),
        }
    }

    pub fn with_stale_pin_policy(mut self, policy: StalePinPolicy) -> Self {
        self.stale_pins = policy;
        self
    }

    pub fn stale_pin_policy(&self) -> StalePinPolicy {
        self.stale_pins
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn raw(&self) -> &SettingsDocument {
        &self.doc
    }

    /// Load the stored document, or write the current fresh one if the
    /// store has none yet.
    pub fn init(&mut self) -> Result<()> {
        match self.store.read_doc::<SettingsDocument>(&self.key)? {
            Some(doc) => {
                debug!(key = %self.key, pins = doc.pins.len(), "settings loaded");
                self.doc = doc;
            }
            None => {
                debug!(key = %self.key, "no stored settings, writing a fresh document");
                self.persist()?;
            }
        }
        Ok(())
    }

    pub fn persist(&self) -> Result<()> {
        self.store.write_doc(&self.key, &self.doc)
    }

    /// Shallow merge: top-level keys in `partial` replace the current ones.
    ///
    /// Fails without touching the in-memory document if the result is not a
    /// valid settings document (e.g. `pins` replaced by a string).
    pub fn merge(&mut self, partial: Map<String, Value>) -> Result<()> {
        let mut merged = serde_json::to_value(&self.doc)?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(partial);
        }
        self.doc = serde_json::from_value(merged)?;
        self.persist()
    }

    /// Append `pin` unless something with the same id is already pinned.
    /// Returns whether the pin was added.
    pub fn pin(&mut self, pin: Pin) -> Result<bool> {
        if self.is_pinned(pin.id()) {
            return Ok(false);
        }
        debug!(kind = %pin.kind(), id = pin.id(), "pinning");
        self.doc.pins.push(pin);
        self.doc.touch();
        self.persist()?;
        Ok(true)
    }

    /// Remove the first pin with this id. Returns whether one was removed.
    pub fn unpin(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.doc.position_of(id) else {
            return Ok(false);
        };
        debug!(id, "unpinning");
        self.doc.pins.remove(index);
        self.doc.touch();
        self.persist()?;
        Ok(true)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.doc.position_of(id).is_some()
    }

    /// Resolve every pin, in pin order. Stale pins are listed or left out
    /// according to the configured [`StalePinPolicy`].
    pub fn pins<'r, R: EntityResolver>(&self, resolver: &'r R) -> Vec<ResolvedPin<'r>> {
        self.doc
            .pins
            .iter()
            .map(|pin| ResolvedPin {
                pin: pin.clone(),
                entity: resolve_pin(pin, resolver),
            })
            .filter(|resolved| self.stale_pins == StalePinPolicy::Keep || !resolved.is_stale())
            .collect()
    }

    /// Remove every pin that no longer resolves. Persists once if anything
    /// was removed and returns the removed pins.
    pub fn prune_stale<R: EntityResolver>(&mut self, resolver: &R) -> Result<Vec<Pin>> {
        let (kept, stale): (Vec<Pin>, Vec<Pin>) = self
            .doc
            .pins
            .drain(..)
            .partition(|pin| resolve_pin(pin, resolver).is_some());
        self.doc.pins = kept;

        if !stale.is_empty() {
            warn!(count = stale.len(), "removing pins whose targets no longer exist");
            self.doc.touch();
            self.persist()?;
        }
        Ok(stale)
    }

    /// Replace the document with a fresh one. Nothing is written; the next
    /// mutation persists the new document.
    pub fn on_logout(&mut self) {
        debug!(key = %self.key, "session ended, resetting settings");
        self.doc = SettingsDocument::fresh();
    }

    pub fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::LoggedOut => self.on_logout(),
        }
    }

    /// Apply every event already queued on `events` without blocking.
    /// Returns how many were handled.
    pub fn drain_events(&mut self, events: &Receiver<SessionEvent>) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::store::memory::fixtures::{sample_catalog, StoreFixture};
    use crate::store::memory::InMemoryStore;
    use serde_json::json;
    use std::sync::mpsc;

    fn ready(store: InMemoryStore) -> Settings<InMemoryStore> {
        let mut settings = Settings::new(store);
        settings.init().unwrap();
        settings
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn init_writes_fresh_document_when_store_is_empty() {
        let settings = ready(InMemoryStore::new());
        let stored: SettingsDocument = settings.store().read_doc("settings").unwrap().unwrap();
        assert_eq!(&stored, settings.raw());
        assert!(stored.pins.is_empty());
    }

    #[test]
    fn init_adopts_stored_document() {
        let fixture = StoreFixture::new().with_pins(vec![Pin::tag("t1")]);
        let settings = ready(fixture.store);
        assert!(settings.is_pinned("t1"));
        assert_eq!(settings.store().write_count(), 1);
    }

    #[test]
    fn init_survives_pins_of_unknown_type() {
        let store = InMemoryStore::new();
        store
            .write(
                "settings",
                &json!({
                    "type": "settings",
                    "id": "from-web",
                    "pins": [
                        {"type": "tag", "data": {"id": "t1"}},
                        {"type": "note", "data": {"id": "n"}}
                    ],
                    "dateEdited": 3,
                    "dateCreated": 1
                }),
            )
            .unwrap();

        let mut settings = ready(store);
        assert_eq!(settings.raw().id, "from-web");
        assert_eq!(settings.raw().pins, vec![Pin::tag("t1")]);
        assert!(!settings.is_pinned("n"));

        settings.pin(Pin::notebook("nb")).unwrap();
        assert_eq!(settings.raw().pins.len(), 2);
    }

    #[test]
    fn init_accepts_document_without_id() {
        let store = InMemoryStore::new();
        store
            .write("settings", &json!({"type": "settings", "pins": []}))
            .unwrap();
        let settings = ready(store);
        assert!(!settings.raw().id.is_empty());
    }

    #[test]
    fn pin_then_unpin_restores_pin_list() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::notebook("n1")).unwrap();
        let before = settings.raw().pins.clone();
        let edited_before = settings.raw().date_edited;

        settings.pin(Pin::tag("t1")).unwrap();
        assert!(settings.unpin("t1").unwrap());

        assert_eq!(settings.raw().pins, before);
        assert!(settings.raw().date_edited >= edited_before);
    }

    #[test]
    fn pinning_same_id_twice_keeps_one_entry() {
        let mut settings = ready(InMemoryStore::new());
        assert!(settings.pin(Pin::tag("x")).unwrap());
        assert!(!settings.pin(Pin::tag("x")).unwrap());
        assert_eq!(settings.raw().pins.len(), 1);
    }

    #[test]
    fn duplicate_check_is_by_id_across_kinds() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::notebook("same")).unwrap();
        assert!(!settings.pin(Pin::tag("same")).unwrap());
        assert_eq!(settings.raw().pins, vec![Pin::notebook("same")]);
    }

    #[test]
    fn is_pinned_tracks_mutations_immediately() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::topic("nb", "tp")).unwrap();
        assert!(settings.is_pinned("tp"));
        settings.unpin("tp").unwrap();
        assert!(!settings.is_pinned("tp"));
    }

    #[test]
    fn unpin_of_missing_id_does_not_write() {
        let mut settings = ready(InMemoryStore::new());
        let writes = settings.store().write_count();
        assert!(!settings.unpin("nothing").unwrap());
        assert_eq!(settings.store().write_count(), writes);
        assert_eq!(settings.raw().date_edited, 0);
    }

    #[test]
    fn pin_bumps_date_edited_and_persists() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("t1")).unwrap();
        assert!(settings.raw().date_edited > 0);

        let stored: SettingsDocument = settings.store().read_doc("settings").unwrap().unwrap();
        assert_eq!(stored.pins, vec![Pin::tag("t1")]);
    }

    #[test]
    fn write_failure_propagates_and_keeps_memory_state() {
        let mut settings = ready(InMemoryStore::new());
        settings.store().set_simulate_write_error(true);

        let err = settings.pin(Pin::tag("t1")).unwrap_err();
        assert!(matches!(err, NotekitError::Storage(_)));
        assert!(settings.is_pinned("t1"));

        let stored: SettingsDocument = settings.store().read_doc("settings").unwrap().unwrap();
        assert!(stored.pins.is_empty());
    }

    #[test]
    fn merge_overwrites_given_keys_and_keeps_the_rest() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("t1")).unwrap();
        let id = settings.raw().id.clone();

        settings
            .merge(as_map(json!({"dateCreated": 42, "theme": "dark"})))
            .unwrap();

        assert_eq!(settings.raw().date_created, 42);
        assert_eq!(settings.raw().id, id);
        assert_eq!(settings.raw().pins, vec![Pin::tag("t1")]);
        assert_eq!(settings.raw().extra.get("theme"), Some(&json!("dark")));

        let stored = settings.store().read("settings").unwrap().unwrap();
        assert_eq!(stored["theme"], json!("dark"));
    }

    #[test]
    fn merge_can_replace_pins_wholesale() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("t1")).unwrap();
        settings
            .merge(as_map(json!({"pins": [{"type": "notebook", "data": {"id": "n9"}}]})))
            .unwrap();
        assert_eq!(settings.raw().pins, vec![Pin::notebook("n9")]);
    }

    #[test]
    fn invalid_merge_leaves_document_untouched() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("t1")).unwrap();
        let before = settings.raw().clone();

        let err = settings.merge(as_map(json!({"pins": "oops"}))).unwrap_err();
        assert!(matches!(err, NotekitError::Serialization(_)));
        assert_eq!(settings.raw(), &before);
    }

    #[test]
    fn pins_resolve_each_kind() {
        let catalog = sample_catalog();
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::notebook("nb1")).unwrap();
        settings.pin(Pin::topic("nb1", "tp1")).unwrap();
        settings.pin(Pin::tag("t1")).unwrap();

        let titles: Vec<&str> = settings
            .pins(&catalog)
            .iter()
            .map(|r| r.entity.unwrap().title())
            .collect();
        assert_eq!(titles, vec!["Work", "Meetings", "urgent"]);
    }

    #[test]
    fn topic_pin_with_wrong_parent_is_stale() {
        let mut catalog = sample_catalog();
        catalog.insert_notebook_with_id("nb2", "Home");
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::topic("nb2", "tp1")).unwrap();

        let resolved = settings.pins(&catalog);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].is_stale());
    }

    #[test]
    fn stale_pins_follow_policy() {
        let catalog = sample_catalog();
        let mut settings =
            Settings::new(InMemoryStore::new()).with_stale_pin_policy(StalePinPolicy::Skip);
        settings.init().unwrap();
        settings.pin(Pin::tag("t1")).unwrap();
        settings.pin(Pin::tag("deleted")).unwrap();

        assert_eq!(settings.pins(&catalog).len(), 1);
        assert_eq!(settings.raw().pins.len(), 2);

        let mut keep = Settings::new(InMemoryStore::new());
        keep.pin(Pin::tag("deleted")).unwrap();
        let resolved = keep.pins(&catalog);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].is_stale());
    }

    #[test]
    fn prune_stale_removes_and_persists_once() {
        let catalog = sample_catalog();
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("gone")).unwrap();
        settings.pin(Pin::notebook("nb1")).unwrap();
        settings.pin(Pin::notebook("also-gone")).unwrap();
        let writes = settings.store().write_count();

        let removed = settings.prune_stale(&catalog).unwrap();
        assert_eq!(removed, vec![Pin::tag("gone"), Pin::notebook("also-gone")]);
        assert_eq!(settings.raw().pins, vec![Pin::notebook("nb1")]);
        assert_eq!(settings.store().write_count(), writes + 1);

        assert!(settings.prune_stale(&catalog).unwrap().is_empty());
        assert_eq!(settings.store().write_count(), writes + 1);
    }

    #[test]
    fn logout_resets_without_writing() {
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("t1")).unwrap();
        let old_id = settings.raw().id.clone();
        let writes = settings.store().write_count();

        settings.on_logout();

        assert!(settings.raw().pins.is_empty());
        assert_ne!(settings.raw().id, old_id);
        assert_eq!(settings.store().write_count(), writes);

        let stored: SettingsDocument = settings.store().read_doc("settings").unwrap().unwrap();
        assert_eq!(stored.id, old_id);
    }

    #[test]
    fn logout_event_over_channel_resets() {
        let (tx, rx) = mpsc::channel();
        let mut settings = ready(InMemoryStore::new());
        settings.pin(Pin::tag("t1")).unwrap();

        assert_eq!(settings.drain_events(&rx), 0);
        tx.send(SessionEvent::LoggedOut).unwrap();
        assert_eq!(settings.drain_events(&rx), 1);
        assert!(!settings.is_pinned("t1"));
    }

    #[test]
    fn end_to_end_pin_resolve_unpin() {
        let catalog: Catalog = sample_catalog();
        let mut settings = ready(InMemoryStore::new());

        settings.pin(Pin::from_parts("tag", "t1", None).unwrap()).unwrap();
        let resolved = settings.pins(&catalog);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity.unwrap().id(), "t1");

        settings.unpin("t1").unwrap();
        assert!(settings.pins(&catalog).is_empty());
    }

    #[test]
    fn custom_key_is_used_for_persistence() {
        let mut settings = Settings::with_key(InMemoryStore::new(), "prefs");
        settings.init().unwrap();
        assert_eq!(settings.key(), "prefs");
        assert!(settings.store().read("prefs").unwrap().is_some());
        assert!(settings.store().read("settings").unwrap().is_none());
    }

    #[test]
    fn policy_parses_from_str() {
        assert_eq!("unpin".parse::<StalePinPolicy>().unwrap(), StalePinPolicy::Unpin);
        assert!("drop".parse::<StalePinPolicy>().is_err());
        assert_eq!(StalePinPolicy::Skip.to_string(), "skip");
    }
}
