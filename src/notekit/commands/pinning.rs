use crate::catalog::{Catalog, EntityResolver};
use crate::commands::{CmdMessage, CmdResult, PinView};
use crate::error::Result;
use crate::model::Pin;
use crate::settings::{resolve_pin, Settings, StalePinPolicy};
use crate::store::DocumentStore;

pub fn pin<S: DocumentStore>(
    settings: &mut Settings<S>,
    catalog: &Catalog,
    kind: &str,
    id: &str,
    notebook_id: Option<&str>,
) -> Result<CmdResult> {
    let target = Pin::from_parts(kind, id, notebook_id)?;
    let mut result = CmdResult::default();

    if resolve_pin(&target, catalog).is_none() {
        result.add_message(CmdMessage::warning(format!(
            "No {} with id {} in the catalog, pinning anyway",
            target.kind(),
            id
        )));
    }

    if settings.pin(target.clone())? {
        result.add_message(CmdMessage::success(format!(
            "Pinned {} {}",
            target.kind(),
            describe(&target, catalog)
        )));
    } else {
        result.add_message(CmdMessage::info(format!("{} is already pinned", id)));
    }
    Ok(result)
}

pub fn unpin<S: DocumentStore>(settings: &mut Settings<S>, id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if settings.unpin(id)? {
        result.add_message(CmdMessage::success(format!("Unpinned {}", id)));
    } else {
        result.add_message(CmdMessage::info(format!("{} was not pinned", id)));
    }
    Ok(result)
}

pub fn is_pinned<S: DocumentStore>(settings: &Settings<S>, id: &str) -> CmdResult {
    let mut result = CmdResult::default();
    let answer = if settings.is_pinned(id) { "yes" } else { "no" };
    result.add_message(CmdMessage::info(answer));
    result
}

/// The pinboard, in pin order. Under the `unpin` policy stale pins are
/// removed from the document first.
pub fn list<S: DocumentStore>(settings: &mut Settings<S>, catalog: &Catalog) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if settings.stale_pin_policy() == StalePinPolicy::Unpin {
        let removed = settings.prune_stale(catalog)?;
        for pin in &removed {
            result.add_message(CmdMessage::warning(format!(
                "Unpinned {} {}: it no longer exists",
                pin.kind(),
                pin.id()
            )));
        }
    }

    let pins: Vec<PinView> = settings
        .pins(catalog)
        .iter()
        .map(|resolved| PinView::from_resolved(resolved, catalog))
        .collect();

    if pins.is_empty() {
        result.add_message(CmdMessage::info("Nothing pinned."));
    }
    Ok(result.with_pins(pins))
}

fn describe(pin: &Pin, catalog: &Catalog) -> String {
    let title = match pin {
        Pin::Notebook(r) => catalog.notebook_by_id(&r.id).map(|n| n.title.as_str()),
        Pin::Topic(t) => catalog
            .topic_by_id(&t.notebook_id, &t.id)
            .map(|t| t.title.as_str()),
        Pin::Tag(r) => catalog.tag_by_id(&r.id).map(|t| t.title.as_str()),
    };
    match title {
        Some(title) => format!("'{}' ({})", title, pin.id()),
        None => pin.id().to_string(),
    }
}
