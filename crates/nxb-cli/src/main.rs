use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use nxb_core::settings::{ConnectionSettings, SettingsRepository};
use nxb_infrastructure::TomlSettingsRepository;
use nxb_infrastructure::logging::{self, LogConfig};

mod commands;
mod presenter;
mod render;

#[derive(Parser)]
#[command(name = "nxb")]
#[command(about = "Nuxeo Browser - browse, upload and review documents in a Nuxeo repository", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides of the saved connection, for this run only.
#[derive(Args, Debug, Default)]
struct ConnectionArgs {
    /// Server URL, e.g. http://localhost:8080/nuxeo
    #[arg(long = "server", env = "NXB_SERVER_URL", global = true)]
    server_url: Option<String>,

    #[arg(long, env = "NXB_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "NXB_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,
}

impl ConnectionArgs {
    fn apply(&self, mut settings: ConnectionSettings) -> ConnectionSettings {
        if let Some(server_url) = &self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(username) = &self.username {
            settings.username = username.clone();
        }
        if let Some(password) = &self.password {
            settings.password = password.clone();
        }
        settings
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browser shell
    Shell {
        /// Directory to open first
        #[arg(long, default_value = nxb_application::DEFAULT_PATH)]
        path: String,
    },
    /// List a directory and exit
    Ls {
        #[arg(default_value = nxb_application::DEFAULT_PATH)]
        path: String,
    },
    /// Show or change the saved connection
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved connection (password masked)
    Show,
    /// Save a new server URL
    SetServer { url: String },
    /// Save new credentials
    SetAuth { username: String, password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&LogConfig {
        stderr: cli.verbose,
        ..LogConfig::default()
    })?;

    let repository = TomlSettingsRepository::new()?;
    let settings = cli.connection.apply(repository.load()?);
    tracing::debug!(server = %settings.server_url, user = %settings.username, "settings resolved");

    match cli.command {
        Commands::Shell { path } => commands::shell::run(repository, settings, path).await?,
        Commands::Ls { path } => commands::ls::run(repository, settings, path).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&repository)?,
            ConfigAction::SetServer { url } => commands::config::set_server(&repository, &url)?,
            ConfigAction::SetAuth { username, password } => {
                commands::config::set_auth(&repository, &username, &password)?
            }
        },
    }

    Ok(())
}
