//! Document names derived from user-entered titles.

/// Strips everything outside `[A-Za-z0-9_.]`.
///
/// The result can be empty; the repository then picks a name itself.
pub fn sanitize_name(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .collect()
}
