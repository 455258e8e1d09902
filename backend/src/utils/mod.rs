//! Collection of general utility functions and common traits.
//!
//! This module serves as a repository for small, reusable helper functions
//! that do not fit into other specific domain modules.

pub mod jwt;

/// Derives a URL-safe slug from a display name: lowercased, whitespace runs
/// collapsed to single hyphens.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Rust Web"), "rust-web");
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
        assert_eq!(slugify("single"), "single");
    }
}
