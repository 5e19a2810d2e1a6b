use super::error::{WorkflowError, WorkflowResult};
use super::validation;
use crate::domain::{Repository, User, UserId};

/// The caller's own account.
pub async fn get_account(repo: &dyn Repository, caller: UserId) -> WorkflowResult<User> {
    // ---
    repo.get_user_by_id(caller)
        .await?
        .ok_or(WorkflowError::NotFound {
            entity: "user",
            id: caller,
        })
}

/// Change the caller's avatar reference, the only mutable user field.
pub async fn set_avatar(repo: &dyn Repository, caller: UserId, avatar: &str) -> WorkflowResult<User> {
    // ---
    let avatar = validation::avatar(avatar)?;

    if !repo.update_avatar(caller, avatar).await? {
        return Err(WorkflowError::NotFound {
            entity: "user",
            id: caller,
        });
    }

    tracing::info!(user_id = caller, "Avatar changed");
    get_account(repo, caller).await
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::{NewUser, DEFAULT_AVATAR};
    use crate::infrastructure::database::MemoryRepository;

    #[tokio::test]
    async fn avatar_changes_and_nothing_else() {
        // ---
        let repo = MemoryRepository::new();
        let user = repo
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.avatar, DEFAULT_AVATAR);

        let updated = set_avatar(&repo, user.id, "alice.png").await.unwrap();
        assert_eq!(updated.avatar, "alice.png");
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.password_hash, "hash");
    }

    #[tokio::test]
    async fn invalid_avatar_and_missing_user() {
        // ---
        let repo = MemoryRepository::new();

        let err = set_avatar(&repo, 1, "../../x").await.unwrap_err();
        assert!(matches!(err, WorkflowError::ValidationFailed(_)));

        let err = set_avatar(&repo, 1, "ok.png").await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { entity: "user", .. }));
    }
}
