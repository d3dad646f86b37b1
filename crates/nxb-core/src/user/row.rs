//! Presentation row for a candidate reviewer.

use chrono::{Local, NaiveDate};

use crate::observable::Notifier;

/// Observable projection of a directory user.
#[derive(Debug, Clone)]
pub struct UserRow {
    username: String,
    is_checked: bool,
    /// Kept for the reviewer picker; the review itself always ends today.
    end_date: NaiveDate,
    notifier: Notifier,
}

impl UserRow {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_checked: false,
            end_date: Local::now().date_naive(),
            notifier: Notifier::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
        self.notifier.notify("Username");
    }

    pub fn set_is_checked(&mut self, is_checked: bool) {
        self.is_checked = is_checked;
        self.notifier.notify("IsChecked");
    }

    pub fn set_end_date(&mut self, end_date: NaiveDate) {
        self.end_date = end_date;
        self.notifier.notify("EndDate");
    }
}
