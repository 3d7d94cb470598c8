use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotekitConfig;
use crate::error::Result;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run<S: DocumentStore>(store: &S, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = NotekitConfig::load(store)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = NotekitConfig::load(store)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Ok(val) => result.add_message(CmdMessage::info(val)),
                Err(e) => result.add_message(CmdMessage::error(e.to_string())),
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = NotekitConfig::load(store)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(store)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}
