//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for notekit operations, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the settings store (and through it the document store) for a session
//! - **Dispatches** to the appropriate command function
//! - **Loads** the catalog so commands can resolve pins against it
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic (that lives in `commands/*.rs`) and no I/O
//! beyond what the store and config do.
//!
//! ## Generic Over DocumentStore
//!
//! `NotekitApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `NotekitApi<FileStore>`
//! - Testing: `NotekitApi<InMemoryStore>`

use crate::catalog::Catalog;
use crate::commands;
use crate::config::NotekitConfig;
use crate::error::Result;
use crate::search::SearchOptions;
use crate::settings::Settings;
use crate::store::DocumentStore;

pub struct NotekitApi<S: DocumentStore> {
    settings: Settings<S>,
}

impl<S: DocumentStore> NotekitApi<S> {
    /// Load the config document, then initialise the settings store with
    /// the configured key and stale pin policy.
    pub fn open(store: S) -> Result<Self> {
        let config = NotekitConfig::load(&store)?;
        let mut settings = Settings::with_key(store, config.settings_key.clone())
            .with_stale_pin_policy(config.stale_pins);
        settings.init()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    /// The config as currently stored, e.g. for default search options.
    pub fn load_config(&self) -> Result<NotekitConfig> {
        NotekitConfig::load(self.settings.store())
    }

    pub fn pin(
        &mut self,
        kind: &str,
        id: &str,
        notebook_id: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let catalog = Catalog::load(self.settings.store())?;
        commands::pinning::pin(&mut self.settings, &catalog, kind, id, notebook_id)
    }

    pub fn unpin(&mut self, id: &str) -> Result<commands::CmdResult> {
        commands::pinning::unpin(&mut self.settings, id)
    }

    pub fn is_pinned(&self, id: &str) -> commands::CmdResult {
        commands::pinning::is_pinned(&self.settings, id)
    }

    pub fn list_pins(&mut self) -> Result<commands::CmdResult> {
        let catalog = Catalog::load(self.settings.store())?;
        commands::pinning::list(&mut self.settings, &catalog)
    }

    pub fn logout(&mut self) -> Result<commands::CmdResult> {
        commands::session::logout(&mut self.settings)
    }

    pub fn catalog(&self) -> Result<commands::CmdResult> {
        commands::catalog::show(self.settings.store())
    }

    pub fn add_notebook(&self, title: &str) -> Result<commands::CmdResult> {
        commands::catalog::add_notebook(self.settings.store(), title)
    }

    pub fn add_topic(&self, notebook_id: &str, title: &str) -> Result<commands::CmdResult> {
        commands::catalog::add_topic(self.settings.store(), notebook_id, title)
    }

    pub fn add_tag(&self, title: &str) -> Result<commands::CmdResult> {
        commands::catalog::add_tag(self.settings.store(), title)
    }

    pub fn remove_notebook(&mut self, id: &str) -> Result<commands::CmdResult> {
        commands::catalog::remove_notebook(&mut self.settings, id)
    }

    pub fn remove_topic(&mut self, notebook_id: &str, id: &str) -> Result<commands::CmdResult> {
        commands::catalog::remove_topic(&mut self.settings, notebook_id, id)
    }

    pub fn remove_tag(&mut self, id: &str) -> Result<commands::CmdResult> {
        commands::catalog::remove_tag(&mut self.settings, id)
    }

    pub fn find(
        &self,
        text: &str,
        term: &str,
        options: SearchOptions,
    ) -> Result<commands::CmdResult> {
        commands::find::run(text, term, options)
    }

    pub fn replace(
        &self,
        text: &str,
        term: &str,
        options: SearchOptions,
        replacement: &str,
        target: ReplaceTarget,
    ) -> Result<commands::CmdResult> {
        commands::find::replace(text, term, options, replacement, target)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(self.settings.store(), action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::find::ReplaceTarget;
pub use commands::{CmdMessage, CmdResult, MatchView, MessageLevel, PinView};
