use crate::domain::{UniqueField, UniqueViolation};

/// Failure of a workflow operation.
///
/// Each variant maps to one way a page reacts: inline form message,
/// 404 page, redirect with a danger flash, or a generic error page.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Missing or malformed form input.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The caller may not touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate username or email at registration.
    #[error("That {field} is already taken. Please choose a different one.")]
    Conflict { field: UniqueField },

    /// Wrong email or password; deliberately does not say which.
    #[error("Login failed. Check your email and password.")]
    AuthenticationFailed,

    /// The store or session backend failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl WorkflowError {
    // ---
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        WorkflowError::ValidationFailed(message.into())
    }

    /// Classify a `create_user` failure: a typed uniqueness violation becomes
    /// [`WorkflowError::Conflict`], anything else stays a store error.
    pub(crate) fn from_insert(err: anyhow::Error) -> Self {
        // ---
        match err.downcast_ref::<UniqueViolation>() {
            Some(violation) => WorkflowError::Conflict {
                field: violation.field,
            },
            None => WorkflowError::Store(err),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        // ---
        let err: anyhow::Error = UniqueViolation {
            field: UniqueField::Email,
        }
        .into();

        match WorkflowError::from_insert(err) {
            WorkflowError::Conflict { field } => assert_eq!(field, UniqueField::Email),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_insert_errors_stay_store_errors() {
        // ---
        let err = anyhow::anyhow!("connection reset");
        assert!(matches!(
            WorkflowError::from_insert(err),
            WorkflowError::Store(_)
        ));
    }

    #[test]
    fn messages_are_user_facing() {
        // ---
        let conflict = WorkflowError::Conflict {
            field: UniqueField::Username,
        };
        assert_eq!(
            conflict.to_string(),
            "That username is already taken. Please choose a different one."
        );

        let missing = WorkflowError::NotFound {
            entity: "tutorial",
            id: 42,
        };
        assert_eq!(missing.to_string(), "tutorial 42 not found");
    }
}
