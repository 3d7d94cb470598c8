use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotekitError, Result};
use crate::settings::Settings;
use crate::store::DocumentStore;

pub fn show<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let catalog = Catalog::load(store)?;
    let mut result = CmdResult::default();
    if catalog.notebooks.is_empty() && catalog.tags.is_empty() {
        result.add_message(CmdMessage::info("The catalog is empty."));
    }
    Ok(result.with_catalog(catalog))
}

pub fn add_notebook<S: DocumentStore>(store: &S, title: &str) -> Result<CmdResult> {
    let title = non_empty(title)?;
    let mut catalog = Catalog::load(store)?;
    let id = catalog.add_notebook(title).id.clone();
    catalog.save(store)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created notebook '{}' ({})",
        title, id
    )));
    Ok(result)
}

pub fn add_topic<S: DocumentStore>(store: &S, notebook_id: &str, title: &str) -> Result<CmdResult> {
    let title = non_empty(title)?;
    let mut catalog = Catalog::load(store)?;
    let id = catalog.add_topic(notebook_id, title)?.id.clone();
    catalog.save(store)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created topic '{}' ({}) in notebook {}",
        title, id, notebook_id
    )));
    Ok(result)
}

pub fn add_tag<S: DocumentStore>(store: &S, title: &str) -> Result<CmdResult> {
    let title = non_empty(title)?;
    let mut catalog = Catalog::load(store)?;
    let id = catalog.add_tag(title).id.clone();
    catalog.save(store)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Created tag '{}' ({})", title, id)));
    Ok(result)
}

/// Deletes a notebook and unpins it together with any of its topics.
pub fn remove_notebook<S: DocumentStore>(settings: &mut Settings<S>, id: &str) -> Result<CmdResult> {
    let mut catalog = Catalog::load(settings.store())?;
    let notebook = catalog
        .remove_notebook(id)
        .ok_or_else(|| NotekitError::NotFound(format!("notebook {}", id)))?;
    catalog.save(settings.store())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted notebook '{}'",
        notebook.title
    )));

    let pinned_ids = std::iter::once(notebook.id.as_str())
        .chain(notebook.topics.iter().map(|t| t.id.as_str()));
    for pinned in pinned_ids {
        if settings.unpin(pinned)? {
            result.add_message(CmdMessage::info(format!("Unpinned {}", pinned)));
        }
    }
    Ok(result)
}

pub fn remove_topic<S: DocumentStore>(
    settings: &mut Settings<S>,
    notebook_id: &str,
    id: &str,
) -> Result<CmdResult> {
    let mut catalog = Catalog::load(settings.store())?;
    let topic = catalog
        .remove_topic(notebook_id, id)
        .ok_or_else(|| NotekitError::NotFound(format!("topic {} in notebook {}", id, notebook_id)))?;
    catalog.save(settings.store())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted topic '{}'", topic.title)));
    if settings.unpin(&topic.id)? {
        result.add_message(CmdMessage::info(format!("Unpinned {}", topic.id)));
    }
    Ok(result)
}

pub fn remove_tag<S: DocumentStore>(settings: &mut Settings<S>, id: &str) -> Result<CmdResult> {
    let mut catalog = Catalog::load(settings.store())?;
    let tag = catalog
        .remove_tag(id)
        .ok_or_else(|| NotekitError::NotFound(format!("tag {}", id)))?;
    catalog.save(settings.store())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted tag '{}'", tag.title)));
    if settings.unpin(&tag.id)? {
        result.add_message(CmdMessage::info(format!("Unpinned {}", tag.id)));
    }
    Ok(result)
}

fn non_empty(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(NotekitError::Api("Title cannot be empty".into()));
    }
    Ok(title)
}
