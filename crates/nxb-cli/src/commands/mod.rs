pub mod config;
pub mod ls;
pub mod shell;

use std::sync::Arc;

use anyhow::Result;
use nxb_application::BrowserController;
use nxb_core::settings::ConnectionSettings;
use nxb_infrastructure::{NuxeoConnector, ThumbnailCache, TomlSettingsRepository};

use crate::presenter::TerminalPresenter;

/// Wires the controller to the REST client and the terminal.
pub fn build_controller(
    repository: TomlSettingsRepository,
    settings: ConnectionSettings,
) -> Result<BrowserController> {
    Ok(BrowserController::new(
        settings,
        Arc::new(repository),
        Arc::new(NuxeoConnector),
        ThumbnailCache::new()?,
        Arc::new(TerminalPresenter),
    ))
}
