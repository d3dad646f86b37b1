//! Interactive shell standing in for the browser window.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use nxb_application::BrowserController;
use nxb_core::settings::ConnectionSettings;
use nxb_infrastructure::TomlSettingsRepository;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::render;

const COMMANDS: &[&str] = &[
    "ls", "cd", "open", "back", "refresh", "mkdir", "rm", "upload", "users", "select", "review",
    "server", "login", "help", "quit",
];

const HELP: &str = "\
ls                     list the current directory
cd <path>|..           go to an absolute path, or to the parent
open <index>           open a row (folders only change directory)
back                   go to the parent directory
refresh                reload the current path
mkdir <title>          create a folder
rm <index>...          delete rows
upload <file>...       upload local files here
users [query]          list reviewers, optionally filtered
select <user>...       tick reviewers for the next review
review <index>         start a parallel review of a row
server <url>           connect to another server
login <user> <pw>      change credentials
quit                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    List,
    Cd(String),
    Open(usize),
    Back,
    Refresh,
    Mkdir(String),
    Rm(Vec<usize>),
    Upload(Vec<PathBuf>),
    Users(String),
    Select(Vec<String>),
    Review(usize),
    Server(String),
    Login { username: String, password: String },
    Help,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match name {
            "ls" => Self::List,
            "cd" if rest == ".." => Self::Back,
            "cd" if rest.starts_with('/') => Self::Cd(rest.to_string()),
            "cd" if !rest.is_empty() => {
                return Err(format!(
                    "'{rest}' is not an absolute path, use 'open <index>' for rows"
                ));
            }
            "open" => Self::Open(single_index(&args)?),
            "back" | ".." => Self::Back,
            "refresh" => Self::Refresh,
            "mkdir" if !rest.is_empty() => Self::Mkdir(rest.to_string()),
            "rm" if !args.is_empty() => Self::Rm(indices(&args)?),
            "upload" if !args.is_empty() => {
                Self::Upload(args.iter().map(PathBuf::from).collect())
            }
            "users" => Self::Users(rest.to_string()),
            "select" if !args.is_empty() => {
                Self::Select(args.iter().map(|user| user.to_string()).collect())
            }
            "review" => Self::Review(single_index(&args)?),
            "server" if args.len() == 1 => Self::Server(args[0].to_string()),
            "login" if args.len() == 2 => Self::Login {
                username: args[0].to_string(),
                password: args[1].to_string(),
            },
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other if COMMANDS.contains(&other) => {
                return Err(format!("Missing arguments for '{other}', see 'help'"));
            }
            other => return Err(format!("Unknown command '{other}', see 'help'")),
        };
        Ok(command)
    }
}

fn indices(args: &[&str]) -> Result<Vec<usize>, String> {
    args.iter()
        .map(|arg| {
            arg.parse::<usize>()
                .map_err(|_| format!("'{arg}' is not a row index"))
        })
        .collect()
}

fn single_index(args: &[&str]) -> Result<usize, String> {
    match indices(args)?.as_slice() {
        [index] => Ok(*index),
        _ => Err("Expected exactly one row index".to_string()),
    }
}

/// Completes and hints command names.
#[derive(Clone, Default)]
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|command| command.starts_with(line))
            .map(|command| Pair {
                display: command.to_string(),
                replacement: command.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let name = line.split_whitespace().next().unwrap_or_default();
        if COMMANDS.contains(&name) {
            Owned(line.replacen(name, &name.bright_cyan().to_string(), 1))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|command| command.starts_with(line) && command.len() > line.len())
            .map(|command| command[line.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

pub async fn run(
    repository: TomlSettingsRepository,
    settings: ConnectionSettings,
    path: String,
) -> Result<()> {
    let mut controller = super::build_controller(repository, settings)?;

    let busy = controller.busy().clone();
    controller.busy().notifier().subscribe(move |_| {
        if busy.is_busy() {
            eprintln!("{}", "working...".bright_black());
        }
    });

    let mut editor = Editor::new()?;
    editor.set_helper(Some(ShellHelper));

    println!("{}", "=== Nuxeo Browser ===".bright_magenta().bold());
    println!("{}", "Type 'help' for commands or 'quit' to exit.".bright_black());

    controller.set_path_input(path);
    controller.start().await;
    println!("{}", controller.title().bright_magenta());
    println!("{}", render::listing(&controller));

    loop {
        let prompt = format!("{}> ", controller.path_input());
        match editor.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                match ShellCommand::parse(&line) {
                    Ok(ShellCommand::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => execute(&mut controller, command).await,
                    Err(message) => println!("{}", message.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn execute(controller: &mut BrowserController, command: ShellCommand) {
    match command {
        ShellCommand::List => {}
        ShellCommand::Cd(path) => controller.navigate(path).await,
        ShellCommand::Open(index) => controller.open(index).await,
        ShellCommand::Back => controller.back().await,
        ShellCommand::Refresh => controller.refresh().await,
        ShellCommand::Mkdir(title) => controller.create_folder(&title).await,
        ShellCommand::Rm(indices) => {
            let deleted = controller.delete_documents(&indices).await;
            println!("{}", format!("{deleted} deleted").bright_black());
        }
        ShellCommand::Upload(files) => controller.upload_files(&files).await,
        ShellCommand::Users(query) => {
            controller.filter_users(&query);
            println!("{}", render::users(&controller.visible_users()));
            return;
        }
        ShellCommand::Select(usernames) => {
            for username in usernames {
                if !controller.set_user_checked(&username, true) {
                    println!("{}", format!("Unknown user '{username}'").yellow());
                }
            }
            return;
        }
        ShellCommand::Review(index) => controller.start_review(index).await,
        ShellCommand::Server(url) => {
            if !controller.update_server_url(&url).await {
                println!("{}", "Server unchanged".bright_black());
                return;
            }
            println!("{}", controller.title().bright_magenta());
        }
        ShellCommand::Login { username, password } => {
            if !controller.update_credentials(&username, &password).await {
                println!("{}", "Credentials unchanged".bright_black());
                return;
            }
        }
        ShellCommand::Help => {
            println!("{HELP}");
            return;
        }
        ShellCommand::Quit => return,
    }
    println!("{}", render::listing(controller));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(ShellCommand::parse("ls"), Ok(ShellCommand::List));
        assert_eq!(
            ShellCommand::parse("cd /default-domain/workspaces"),
            Ok(ShellCommand::Cd("/default-domain/workspaces".to_string()))
        );
        assert_eq!(ShellCommand::parse("open 2"), Ok(ShellCommand::Open(2)));
        assert_eq!(ShellCommand::parse("  back "), Ok(ShellCommand::Back));
        assert_eq!(ShellCommand::parse("cd .."), Ok(ShellCommand::Back));
    }

    #[test]
    fn test_cd_takes_numeric_path_segments_as_paths() {
        assert_eq!(
            ShellCommand::parse("cd /2024"),
            Ok(ShellCommand::Cd("/2024".to_string()))
        );
        assert!(ShellCommand::parse("cd 2024").unwrap_err().contains("open <index>"));
    }

    #[test]
    fn test_parse_keeps_folder_title_verbatim() {
        assert_eq!(
            ShellCommand::parse("mkdir My Folder!"),
            Ok(ShellCommand::Mkdir("My Folder!".to_string()))
        );
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(ShellCommand::parse("rm 0 2"), Ok(ShellCommand::Rm(vec![0, 2])));
        assert_eq!(
            ShellCommand::parse("select anna bob"),
            Ok(ShellCommand::Select(vec!["anna".to_string(), "bob".to_string()]))
        );
        assert_eq!(
            ShellCommand::parse("login bob pw"),
            Ok(ShellCommand::Login {
                username: "bob".to_string(),
                password: "pw".to_string()
            })
        );
        assert_eq!(ShellCommand::parse("users"), Ok(ShellCommand::Users(String::new())));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("rm a").unwrap_err().contains("not a row index"));
        assert!(ShellCommand::parse("review 1 2").is_err());
        assert!(ShellCommand::parse("mkdir").unwrap_err().starts_with("Missing arguments"));
        assert!(ShellCommand::parse("frobnicate").unwrap_err().starts_with("Unknown command"));
    }
}
