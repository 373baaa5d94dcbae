//! Identifier validation for nodes declared in tree files or grafted at runtime.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Maximum allowed length for node identifiers.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w[\w-]*$").expect("identifier pattern is valid"))
}

/// Validates that an identifier is usable as a node identifier.
///
/// An identifier is valid if:
/// - It is not empty
/// - It is no longer than MAX_IDENTIFIER_LENGTH characters
/// - It starts with a word character and continues with word characters or dashes
///
/// # Examples
///
/// ```
/// use watchtree::validation::validate_identifier;
///
/// assert!(validate_identifier("host1-nginx").is_ok());
/// assert!(validate_identifier("-leading-dash").is_err());
/// assert!(validate_identifier("a.b").is_err());
/// ```
pub fn validate_identifier(identifier: &str) -> Result<()> {
    let invalid = |reason: String| Error::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason,
    };

    if identifier.is_empty() {
        return Err(invalid("identifier cannot be empty".to_string()));
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(invalid(format!(
            "too long: {} characters (max {MAX_IDENTIFIER_LENGTH})",
            identifier.len()
        )));
    }

    if !identifier_pattern().is_match(identifier) {
        return Err(invalid(
            "use word characters and dashes, starting with a word character".to_string(),
        ));
    }

    Ok(())
}

/// Clap value parser for validating identifier arguments.
pub fn clap_identifier_validator(s: &str) -> std::result::Result<String, String> {
    validate_identifier(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
