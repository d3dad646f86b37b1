//! Reviewer search box.

use super::row::UserRow;

/// Whitespace separated search terms. Every term must occur in the username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    terms: Vec<String>,
}

impl UserQuery {
    /// Parses the search box. Blank text clears the filter.
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self::from_terms(text.split_whitespace()))
    }

    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|term| term.as_ref().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive containment of every term.
    pub fn matches(&self, username: &str) -> bool {
        let haystack = username.to_lowercase();
        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Rows whose username matches the query, in their original order.
/// Without a query every row is visible.
pub fn filter_users<'a>(rows: &'a [UserRow], query: Option<&UserQuery>) -> Vec<&'a UserRow> {
    match query {
        Some(query) => rows
            .iter()
            .filter(|row| query.matches(row.username()))
            .collect(),
        None => rows.iter().collect(),
    }
}
