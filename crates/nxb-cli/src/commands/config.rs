use anyhow::Result;
use colored::Colorize;
use nxb_core::settings::SettingsRepository;
use nxb_infrastructure::TomlSettingsRepository;

pub fn show(repository: &TomlSettingsRepository) -> Result<()> {
    let settings = repository.load()?;
    println!("{}", repository.path().display().to_string().bright_black());
    println!("server_url = {}", settings.server_url);
    println!("username   = {}", settings.username);
    println!("password   = {}", "*".repeat(settings.password.chars().count()));
    Ok(())
}

pub fn set_server(repository: &TomlSettingsRepository, url: &str) -> Result<()> {
    let settings = repository.load()?.with_server_url(url.trim());
    repository.save(&settings)?;
    println!("{}", format!("Server set to {}", settings.server_url).green());
    Ok(())
}

pub fn set_auth(repository: &TomlSettingsRepository, username: &str, password: &str) -> Result<()> {
    let settings = repository.load()?.with_credentials(username, password);
    repository.save(&settings)?;
    println!("{}", format!("Credentials saved for {username}").green());
    Ok(())
}
