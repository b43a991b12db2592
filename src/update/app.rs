//! Application lifecycle

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::PlaygroundModel;

use super::format::flush_now;

/// Handle app messages
pub fn update_app(model: &mut PlaygroundModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Started => {
            let mut cmds = vec![Cmd::ApplyTheme(model.theme), flush_now(model)];
            if let Some(path) = model.config.version_file.clone() {
                cmds.push(Cmd::LoadVersion { path });
            }
            Some(Cmd::batch(cmds))
        }

        AppMsg::VersionLoaded(Ok(descriptor)) => {
            tracing::info!("Running {}", descriptor.label());
            model.version = Some(descriptor.clone());
            Some(Cmd::ShowVersion(descriptor))
        }

        AppMsg::VersionLoaded(Err(e)) => {
            tracing::warn!("Version descriptor unavailable: {}", e);
            None
        }
    }
}
