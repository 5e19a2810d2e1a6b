//! Form field checks shared by the workflows.
//!
//! Each helper trims its input and returns the cleaned value, or a
//! [`WorkflowError::ValidationFailed`] naming the field.

use super::error::{WorkflowError, WorkflowResult};

pub(crate) const MAX_USERNAME_LEN: usize = 150;
pub(crate) const MAX_EMAIL_LEN: usize = 150;
pub(crate) const MAX_PASSWORD_LEN: usize = 128;
pub(crate) const MAX_TITLE_LEN: usize = 200;
pub(crate) const MAX_AVATAR_LEN: usize = 150;

/// Trimmed, non-empty, at most `max` characters.
pub(crate) fn required<'a>(field: &str, value: &'a str, max: usize) -> WorkflowResult<&'a str> {
    // ---
    let value = value.trim();
    if value.is_empty() {
        return Err(WorkflowError::validation(format!("{field} is required.")));
    }
    if value.chars().count() > max {
        return Err(WorkflowError::validation(format!(
            "{field} must be at most {max} characters."
        )));
    }
    Ok(value)
}

/// Trimmed, non-empty, no length cap (text bodies).
pub(crate) fn required_text<'a>(field: &str, value: &'a str) -> WorkflowResult<&'a str> {
    // ---
    required(field, value, usize::MAX)
}

/// A plausible address: one `@`, non-empty local part, dotted domain, no whitespace.
pub(crate) fn email(value: &str) -> WorkflowResult<&str> {
    // ---
    let value = required("Email", value, MAX_EMAIL_LEN)?;

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(WorkflowError::validation("Invalid email address."));
    }
    Ok(value)
}

/// Passwords are not trimmed; only emptiness and length are checked.
pub(crate) fn password(value: &str) -> WorkflowResult<&str> {
    // ---
    if value.is_empty() {
        return Err(WorkflowError::validation("Password is required."));
    }
    if value.chars().count() > MAX_PASSWORD_LEN {
        return Err(WorkflowError::validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters."
        )));
    }
    Ok(value)
}

/// File-like reference: ASCII alphanumerics plus `.`, `_`, `-`, `/`.
pub(crate) fn avatar(value: &str) -> WorkflowResult<&str> {
    // ---
    let value = required("Avatar", value, MAX_AVATAR_LEN)?;
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/');

    if !value.chars().all(allowed) || value.contains("..") {
        return Err(WorkflowError::validation(
            "Avatar may only contain letters, digits, '.', '_', '-' and '/'.",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn message(result: WorkflowResult<&str>) -> String {
        match result {
            Err(WorkflowError::ValidationFailed(msg)) => msg,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn required_trims_and_bounds() {
        // ---
        assert_eq!(required("Title", "  T1 ", 200).unwrap(), "T1");
        assert_eq!(message(required("Title", "   ", 200)), "Title is required.");
        assert_eq!(
            message(required("Title", "abcd", 3)),
            "Title must be at most 3 characters."
        );
    }

    #[test]
    fn email_shapes() {
        // ---
        assert_eq!(email(" a@x.com ").unwrap(), "a@x.com");
        for bad in ["", "ax.com", "@x.com", "a@x", "a@@x.com", "a@.com", "a b@x.com"] {
            assert!(email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn password_keeps_spaces() {
        // ---
        assert_eq!(password(" pw1 ").unwrap(), " pw1 ");
        assert!(password("").is_err());
        assert!(password(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }

    #[test]
    fn avatar_charset() {
        // ---
        assert_eq!(avatar("img/me-1_2.png").unwrap(), "img/me-1_2.png");
        assert!(avatar("../etc/passwd").is_err());
        assert!(avatar("me<script>.png").is_err());
    }
}
