use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type TutorialId = i64;

/// Avatar reference assigned at registration.
pub const DEFAULT_AVATAR: &str = "default.jpg";

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // ---
    pub id: UserId,
    pub username: String,
    pub email: String,

    /// Argon2id PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub avatar: String,
}

/// Fields needed to insert a [`User`]; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    // ---
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A user-authored content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutorial {
    // ---
    pub id: TutorialId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,

    /// Username of the author, joined in for display.
    pub author: String,

    pub likes: i32,
    pub dislikes: i32,
}

/// A comment on a tutorial, with the commenter's username joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    // ---
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tutorial_id: TutorialId,
    pub user_id: UserId,
    pub author: String,
}

/// A tutorial together with its comments, oldest comment first.
#[derive(Debug, Clone, Serialize)]
pub struct TutorialDetail {
    // ---
    pub tutorial: Tutorial,
    pub comments: Vec<Comment>,
}

/// One user's reaction to a tutorial. At most one exists per (user, tutorial).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeDislike {
    // ---
    pub id: i64,
    pub tutorial_id: TutorialId,
    pub user_id: UserId,
    pub action: Reaction,
}

/// Like or dislike. Stored as the lowercase word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    // ---
    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or submitted action is neither `like` nor `dislike`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reaction: {0:?}")]
pub struct UnknownReaction(pub String);

impl FromStr for Reaction {
    type Err = UnknownReaction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s {
            "like" => Ok(Reaction::Like),
            "dislike" => Ok(Reaction::Dislike),
            other => Err(UnknownReaction(other.to_string())),
        }
    }
}

/// Aggregate counters persisted on a tutorial after a reaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReactionTally {
    // ---
    pub likes: i32,
    pub dislikes: i32,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn reaction_parses_stored_words() {
        // ---
        assert_eq!("like".parse::<Reaction>(), Ok(Reaction::Like));
        assert_eq!("dislike".parse::<Reaction>(), Ok(Reaction::Dislike));
        assert_eq!(
            "LIKE".parse::<Reaction>(),
            Err(UnknownReaction("LIKE".to_string()))
        );
        assert!("".parse::<Reaction>().is_err());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        // ---
        let user = User {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"alice\""));
    }
}
