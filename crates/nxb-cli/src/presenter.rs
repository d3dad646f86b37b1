//! Terminal dialogs.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use colored::Colorize;
use nxb_core::ErrorReport;
use nxb_core::presenter::Presenter;

/// Prints errors as red boxes and asks confirmations on stdin.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn report(&self, report: ErrorReport) {
        eprintln!("{}", format!("[{}]", report.title).red().bold());
        for line in report.message.lines() {
            eprintln!("  {}", line.red());
        }
    }

    async fn confirm(&self, title: &str, message: &str) -> bool {
        println!("{}", title.bright_yellow().bold());
        print!("{} {} ", message.yellow(), "[y/N]".bright_black());
        if io::stdout().flush().is_err() {
            return false;
        }

        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            _ => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
