//! Registration, login and logout.

use super::error::{WorkflowError, WorkflowResult};
use super::validation;
use crate::domain::{NewUser, Repository, SessionStore, User};
use crate::infrastructure::password::{hash_password, verify_password};
use anyhow::anyhow;

/// Outcome of a successful login.
#[derive(Debug)]
pub struct LoggedIn {
    pub user: User,

    /// Opaque session token for the cookie.
    pub token: String,
}

/// Create an account. Does not log the new user in.
///
/// # Errors
/// - `ValidationFailed` for blank/oversized fields or a malformed email
/// - `Conflict` when the username or email is already registered
pub async fn register(
    repo: &dyn Repository,
    username: &str,
    email: &str,
    password: &str,
) -> WorkflowResult<User> {
    // ---
    let username = validation::required("Username", username, validation::MAX_USERNAME_LEN)?;
    let email = validation::email(email)?;
    let password = validation::password(password)?;

    let password_hash =
        hash_password(password).map_err(|e| anyhow!("Password hashing failed: {e}"))?;

    let user = repo
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
        .map_err(WorkflowError::from_insert)?;

    tracing::info!(user_id = user.id, "Registered user {}", user.username);
    Ok(user)
}

/// Check credentials and open a session.
///
/// # Errors
/// - `ValidationFailed` when a field is blank or the email is malformed
/// - `AuthenticationFailed` for an unknown email or a wrong password alike
pub async fn login(
    repo: &dyn Repository,
    sessions: &dyn SessionStore,
    email: &str,
    password: &str,
) -> WorkflowResult<LoggedIn> {
    // ---
    let email = validation::email(email)?;
    let password = validation::password(password)?;

    let Some(user) = repo.get_user_by_email(email).await? else {
        tracing::warn!("Login rejected: unknown email");
        return Err(WorkflowError::AuthenticationFailed);
    };

    let matches = verify_password(password, &user.password_hash)
        .map_err(|e| anyhow!("Stored password hash for user {} is unreadable: {e}", user.id))?;

    if !matches {
        tracing::warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(WorkflowError::AuthenticationFailed);
    }

    let token = sessions.create_session(user.id, &user.username).await?;

    tracing::info!(user_id = user.id, "User {} logged in", user.username);
    Ok(LoggedIn { user, token })
}

/// End a session. Unknown tokens are ignored.
pub async fn logout(sessions: &dyn SessionStore, token: &str) -> WorkflowResult<()> {
    // ---
    sessions.destroy_session(token).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::UniqueField;
    use crate::infrastructure::database::MemoryRepository;
    use crate::infrastructure::sessions::MemorySessionStore;
    use std::time::Duration;

    fn sessions() -> MemorySessionStore {
        MemorySessionStore::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn register_then_login() {
        // ---
        let repo = MemoryRepository::new();
        let sessions = sessions();

        let user = register(&repo, "alice", "a@x.com", "pw1").await.unwrap();
        assert_ne!(user.password_hash, "pw1");
        assert_eq!(user.avatar, crate::domain::DEFAULT_AVATAR);

        let logged_in = login(&repo, &sessions, "a@x.com", "pw1").await.unwrap();
        assert_eq!(logged_in.user.id, user.id);

        let session = sessions.get_session(&logged_in.token).await.unwrap().unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts_without_new_record() {
        // ---
        let repo = MemoryRepository::new();
        register(&repo, "alice", "a@x.com", "pw1").await.unwrap();

        let err = register(&repo, "alice", "other@x.com", "pw2").await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Conflict {
                field: UniqueField::Username
            }
        ));
        assert!(repo.get_user_by_email("other@x.com").await.unwrap().is_none());

        let err = register(&repo, "alicia", "a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Conflict {
                field: UniqueField::Email
            }
        ));
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        // ---
        let repo = MemoryRepository::new();
        let sessions = sessions();
        register(&repo, "alice", "a@x.com", "pw1").await.unwrap();

        let wrong_password = login(&repo, &sessions, "a@x.com", "nope").await.unwrap_err();
        let unknown_email = login(&repo, &sessions, "b@x.com", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, WorkflowError::AuthenticationFailed));
        assert!(matches!(unknown_email, WorkflowError::AuthenticationFailed));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn invalid_registration_input() {
        // ---
        let repo = MemoryRepository::new();

        for (username, email, password) in [
            ("", "a@x.com", "pw1"),
            ("alice", "not-an-email", "pw1"),
            ("alice", "a@x.com", ""),
        ] {
            let err = register(&repo, username, email, password).await.unwrap_err();
            assert!(matches!(err, WorkflowError::ValidationFailed(_)));
        }
    }

    #[tokio::test]
    async fn logout_ends_session() {
        // ---
        let repo = MemoryRepository::new();
        let sessions = sessions();
        register(&repo, "alice", "a@x.com", "pw1").await.unwrap();
        let logged_in = login(&repo, &sessions, "a@x.com", "pw1").await.unwrap();

        logout(&sessions, &logged_in.token).await.unwrap();
        assert!(sessions.get_session(&logged_in.token).await.unwrap().is_none());
    }
}
