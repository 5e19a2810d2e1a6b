use super::models::{
    Comment, NewUser, Reaction, ReactionTally, Tutorial, TutorialId, User, UserId,
};
use anyhow::Result;
use std::sync::Arc;

/// Abstraction over the relational store holding users, tutorials,
/// comments and reactions.
///
/// Implementations report a duplicate username or email from
/// [`Repository::create_user`] as an `anyhow::Error` wrapping
/// [`UniqueViolation`], so callers can tell a conflict from a store failure.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Insert a new user.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>>;

    /// Replace a user's avatar reference. Returns false if the user is gone.
    async fn update_avatar(&self, user_id: UserId, avatar: &str) -> Result<bool>;

    /// Insert a tutorial with zero counters.
    async fn create_tutorial(&self, author_id: UserId, title: &str, content: &str)
        -> Result<Tutorial>;

    /// All tutorials, newest first (ties broken by id, descending).
    async fn list_tutorials(&self) -> Result<Vec<Tutorial>>;

    /// Get tutorial by ID.
    async fn get_tutorial(&self, tutorial_id: TutorialId) -> Result<Option<Tutorial>>;

    /// Overwrite title and content, leaving the timestamp alone.
    /// Returns false if the tutorial does not exist.
    async fn update_tutorial(&self, tutorial_id: TutorialId, title: &str, content: &str)
        -> Result<bool>;

    /// Comments on a tutorial, oldest first.
    async fn list_comments(&self, tutorial_id: TutorialId) -> Result<Vec<Comment>>;

    /// Append a comment. Returns `None` if the tutorial does not exist.
    async fn add_comment(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
        content: &str,
    ) -> Result<Option<Comment>>;

    /// Upsert the caller's reaction and recount the tutorial's counters as
    /// one atomic unit. Returns `None` if the tutorial does not exist.
    async fn record_reaction(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
        action: Reaction,
    ) -> Result<Option<ReactionTally>>;

    /// The caller's current reaction to a tutorial, if any.
    async fn get_reaction(&self, tutorial_id: TutorialId, user_id: UserId)
        -> Result<Option<Reaction>>;

    /// Cheap round trip used by the full health check.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;

/// Which unique user field a rejected insert collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

/// A store-level uniqueness violation raised by `create_user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} already exists")]
pub struct UniqueViolation {
    pub field: UniqueField,
}
