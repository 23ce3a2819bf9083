//! Small field-level validation helpers shared by the content types.

use crate::error::{DomainError, DomainResult};

/// Require a non-blank string, returning it trimmed.
pub fn required(value: Option<&str>, message: &str) -> DomainResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::validation(message)),
    }
}

/// Require at least `min` characters (after trimming).
pub fn min_chars(value: &str, min: usize, message: &str) -> DomainResult<()> {
    if value.trim().chars().count() < min {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

/// Trim an optional value, dropping it when blank.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Loose address check: one `@`, non-empty local part, dotted domain.
pub fn email(value: &str) -> DomainResult<()> {
    let invalid = || DomainError::validation("Please Provide A Valid Email!");
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  hi "), "x").unwrap(), "hi");
        assert!(required(Some("   "), "x").is_err());
        assert!(required(None, "x").is_err());
    }

    #[test]
    fn min_chars_counts_characters_not_bytes() {
        assert!(min_chars("éé", 2, "short").is_ok());
        assert!(min_chars(" a ", 2, "short").is_err());
    }

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(email("jane@example.com").is_ok());
        assert!(email("jane.doe+tag@mail.example.org").is_ok());
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in ["", "jane", "@example.com", "jane@", "jane@example", "ja ne@example.com", "a@b@c.com"] {
            assert!(email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
