mod metrics;
mod models;
mod repository;
mod sessions;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the persistence and session abstractions
pub use models::{
    Comment, LikeDislike, NewUser, Reaction, ReactionTally, Tutorial, TutorialDetail,
    TutorialId, UnknownReaction, User, UserId, DEFAULT_AVATAR,
};
pub use repository::{Repository, RepositoryPtr, UniqueField, UniqueViolation};
pub use sessions::{SessionInfo, SessionStore, SessionStorePtr};
