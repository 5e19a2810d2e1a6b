//! Likes and dislikes.

use super::error::{WorkflowError, WorkflowResult};
use crate::domain::{Reaction, ReactionTally, Repository, TutorialId, UserId};

/// Parse the submitted `action` field.
pub fn parse_action(action: &str) -> WorkflowResult<Reaction> {
    // ---
    action
        .parse::<Reaction>()
        .map_err(|_| WorkflowError::validation("Action must be 'like' or 'dislike'."))
}

/// Record the caller's reaction and return the tutorial's new counters.
///
/// A second reaction from the same caller replaces the first; counters are
/// recomputed from the stored reactions, never incremented.
pub async fn react(
    repo: &dyn Repository,
    tutorial_id: TutorialId,
    caller: UserId,
    action: Reaction,
) -> WorkflowResult<ReactionTally> {
    // ---
    let tally = repo
        .record_reaction(tutorial_id, caller, action)
        .await?
        .ok_or(WorkflowError::NotFound {
            entity: "tutorial",
            id: tutorial_id,
        })?;

    tracing::info!(
        tutorial_id,
        caller,
        %action,
        likes = tally.likes,
        dislikes = tally.dislikes,
        "Reaction recorded"
    );
    Ok(tally)
}

/// The caller's standing reaction to a tutorial, if any.
pub async fn current_reaction(
    repo: &dyn Repository,
    tutorial_id: TutorialId,
    caller: UserId,
) -> WorkflowResult<Option<Reaction>> {
    // ---
    Ok(repo.get_reaction(tutorial_id, caller).await?)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::NewUser;
    use crate::infrastructure::database::MemoryRepository;

    async fn setup(repo: &MemoryRepository, users: &[&str]) -> (TutorialId, Vec<UserId>) {
        // ---
        let mut ids = Vec::new();
        for name in users {
            let user = repo
                .create_user(NewUser {
                    username: name.to_string(),
                    email: format!("{name}@x.com"),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let tutorial = repo.create_tutorial(ids[0], "T1", "body").await.unwrap();
        (tutorial.id, ids)
    }

    #[tokio::test]
    async fn like_then_dislike_switches() {
        // ---
        let repo = MemoryRepository::new();
        let (t, users) = setup(&repo, &["alice"]).await;

        let tally = react(&repo, t, users[0], Reaction::Like).await.unwrap();
        assert_eq!(tally, ReactionTally { likes: 1, dislikes: 0 });

        let tally = react(&repo, t, users[0], Reaction::Dislike).await.unwrap();
        assert_eq!(tally, ReactionTally { likes: 0, dislikes: 1 });

        assert_eq!(repo.reaction_rows(t), 1);
        assert_eq!(
            current_reaction(&repo, t, users[0]).await.unwrap(),
            Some(Reaction::Dislike)
        );
    }

    #[tokio::test]
    async fn counters_track_latest_action_per_user() {
        // ---
        let repo = MemoryRepository::new();
        let (t, users) = setup(&repo, &["alice", "bob", "carol", "dave"]).await;

        let script = [
            (0, Reaction::Like),
            (1, Reaction::Like),
            (2, Reaction::Dislike),
            (1, Reaction::Dislike),
            (0, Reaction::Like),
            (3, Reaction::Like),
            (2, Reaction::Like),
        ];
        let mut last = ReactionTally::default();
        for (who, action) in script {
            last = react(&repo, t, users[who], action).await.unwrap();
        }

        // Latest: alice like, bob dislike, carol like, dave like.
        assert_eq!(last, ReactionTally { likes: 3, dislikes: 1 });
        assert_eq!(repo.reaction_rows(t), 4);

        let stored = repo.get_tutorial(t).await.unwrap().unwrap();
        assert_eq!((stored.likes, stored.dislikes), (3, 1));
    }

    #[tokio::test]
    async fn reacting_to_missing_tutorial_is_not_found() {
        // ---
        let repo = MemoryRepository::new();
        let (_, users) = setup(&repo, &["alice"]).await;

        let err = react(&repo, 999, users[0], Reaction::Like).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { id: 999, .. }));
    }

    #[test]
    fn unknown_action_is_validation_error() {
        // ---
        assert_eq!(parse_action("like").unwrap(), Reaction::Like);
        assert!(matches!(
            parse_action("love"),
            Err(WorkflowError::ValidationFailed(_))
        ));
    }
}
