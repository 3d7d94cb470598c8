use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::{SessionEvent, Settings};
use crate::store::DocumentStore;

/// End the session: reset the settings document and write the fresh one so
/// the reset outlives this process.
pub fn logout<S: DocumentStore>(settings: &mut Settings<S>) -> Result<CmdResult> {
    let dropped = settings.raw().pins.len();
    settings.handle_event(&SessionEvent::LoggedOut);
    settings.persist()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Logged out, cleared {} pin{}",
        dropped,
        if dropped == 1 { "" } else { "s" }
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pin, SettingsDocument};
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn logout_persists_a_fresh_document() {
        let fixture = StoreFixture::new().with_pins(vec![Pin::tag("a"), Pin::tag("b")]);
        let mut settings = Settings::new(fixture.store);
        settings.init().unwrap();
        let old_id = settings.raw().id.clone();

        let result = logout(&mut settings).unwrap();
        assert!(result.messages[0].content.contains("cleared 2 pins"));

        let stored: SettingsDocument = settings.store().read_doc("settings").unwrap().unwrap();
        assert!(stored.pins.is_empty());
        assert_ne!(stored.id, old_id);
    }
}
