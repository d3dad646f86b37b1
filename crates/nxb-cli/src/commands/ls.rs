use anyhow::Result;
use nxb_core::settings::ConnectionSettings;
use nxb_infrastructure::TomlSettingsRepository;

use crate::render;

/// Lists one directory and exits.
pub async fn run(
    repository: TomlSettingsRepository,
    settings: ConnectionSettings,
    path: String,
) -> Result<()> {
    let mut controller = super::build_controller(repository, settings)?;
    controller.set_path_input(path);
    controller.start().await;
    println!("{}", render::listing(&controller));
    Ok(())
}
