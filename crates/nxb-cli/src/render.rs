//! Plain-text rendering of controller state.

use colored::{ColoredString, Colorize};
use nxb_application::BrowserController;
use nxb_core::color::state_color;
use nxb_core::document::{DocumentRow, Thumbnail};
use nxb_core::user::UserRow;

pub fn listing(controller: &BrowserController) -> String {
    let header = match controller.current_directory() {
        Some(directory) => directory.path.bold().to_string(),
        None => "(no directory)".bright_black().to_string(),
    };

    let mut lines = vec![header];
    lines.extend(
        controller
            .documents()
            .iter()
            .enumerate()
            .map(|(index, row)| document_line(index, row)),
    );
    if controller.documents().is_empty() {
        lines.push("  (empty)".bright_black().to_string());
    }
    lines.join("\n")
}

fn document_line(index: usize, row: &DocumentRow) -> String {
    let kind = if row.is_folder() {
        "dir ".blue()
    } else if row.is_file() {
        "file".normal()
    } else {
        "    ".normal()
    };
    let title = if row.is_folder() {
        row.title().blue().bold()
    } else {
        row.title().normal()
    };
    let thumbnail = match row.thumbnail() {
        Thumbnail::Cached(_) => "*".green(),
        Thumbnail::Placeholder(_) => " ".normal(),
    };

    format!(
        "{:>4}  {} {} {}  {}",
        index.to_string().bright_black(),
        kind,
        thumbnail,
        title,
        state(&row.document().state)
    )
}

fn state(label: &str) -> ColoredString {
    let color = state_color(label);
    label.truecolor(color.r, color.g, color.b)
}

pub fn users(rows: &[&UserRow]) -> String {
    if rows.is_empty() {
        return "  (no users)".bright_black().to_string();
    }
    rows.iter()
        .map(|row| {
            let mark = if row.is_checked() { "[x]".green() } else { "[ ]".normal() };
            format!("  {mark} {}", row.username())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
