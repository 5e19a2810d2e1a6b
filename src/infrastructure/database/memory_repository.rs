//! Process-local [`Repository`] used for development and tests.
//!
//! Every operation takes a single mutex over the whole store, so each
//! trait method is atomic with respect to every other one.

use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{
    Comment, LikeDislike, NewUser, Reaction, ReactionTally, Repository, Tutorial, TutorialId,
    UniqueField, UniqueViolation, User, UserId, DEFAULT_AVATAR,
};

pub fn create_memory_repository() -> crate::domain::RepositoryPtr {
    // ---
    std::sync::Arc::new(MemoryRepository::new())
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tutorials: Vec<TutorialRecord>,
    comments: Vec<CommentRecord>,
    like_dislikes: Vec<LikeDislike>,
    next_id: i64,
}

/// Tutorial as stored; the author's username is joined in on read.
struct TutorialRecord {
    id: TutorialId,
    title: String,
    content: String,
    created_at: chrono::DateTime<Utc>,
    author_id: UserId,
    likes: i32,
    dislikes: i32,
}

struct CommentRecord {
    id: i64,
    content: String,
    created_at: chrono::DateTime<Utc>,
    tutorial_id: TutorialId,
    user_id: UserId,
}

impl Tables {
    // ---
    fn allocate_id(&mut self) -> i64 {
        // ---
        self.next_id += 1;
        self.next_id
    }

    fn username_of(&self, user_id: UserId) -> String {
        // ---
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn tutorial(&self, r: &TutorialRecord) -> Tutorial {
        // ---
        Tutorial {
            id: r.id,
            title: r.title.clone(),
            content: r.content.clone(),
            created_at: r.created_at,
            author_id: r.author_id,
            author: self.username_of(r.author_id),
            likes: r.likes,
            dislikes: r.dislikes,
        }
    }

    fn comment(&self, r: &CommentRecord) -> Comment {
        // ---
        Comment {
            id: r.id,
            content: r.content.clone(),
            created_at: r.created_at,
            tutorial_id: r.tutorial_id,
            user_id: r.user_id,
            author: self.username_of(r.user_id),
        }
    }
}

pub struct MemoryRepository {
    // ---
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    // ---
    pub fn new() -> Self {
        // ---
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        // ---
        self.tables
            .lock()
            .map_err(|_| anyhow!("memory store mutex poisoned"))
    }

    /// Stored reaction rows for a tutorial.
    #[cfg(test)]
    pub(crate) fn reaction_rows(&self, tutorial_id: TutorialId) -> usize {
        // ---
        self.tables
            .lock()
            .unwrap()
            .like_dislikes
            .iter()
            .filter(|r| r.tutorial_id == tutorial_id)
            .count()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        // ---
        let mut tables = self.lock()?;

        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Err(UniqueViolation {
                field: UniqueField::Username,
            }
            .into());
        }
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(UniqueViolation {
                field: UniqueField::Email,
            }
            .into());
        }

        let user = User {
            id: tables.allocate_id(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar: DEFAULT_AVATAR.to_string(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        // ---
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        // ---
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn update_avatar(&self, user_id: UserId, avatar: &str) -> Result<bool> {
        // ---
        let mut tables = self.lock()?;
        match tables.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.avatar = avatar.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_tutorial(
        &self,
        author_id: UserId,
        title: &str,
        content: &str,
    ) -> Result<Tutorial> {
        // ---
        let mut tables = self.lock()?;

        if !tables.users.iter().any(|u| u.id == author_id) {
            return Err(anyhow!("author {author_id} does not exist"));
        }

        let record = TutorialRecord {
            id: tables.allocate_id(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            author_id,
            likes: 0,
            dislikes: 0,
        };
        let tutorial = tables.tutorial(&record);
        tables.tutorials.push(record);

        Ok(tutorial)
    }

    async fn list_tutorials(&self) -> Result<Vec<Tutorial>> {
        // ---
        let tables = self.lock()?;

        let mut tutorials: Vec<Tutorial> =
            tables.tutorials.iter().map(|r| tables.tutorial(r)).collect();
        tutorials.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(tutorials)
    }

    async fn get_tutorial(&self, tutorial_id: TutorialId) -> Result<Option<Tutorial>> {
        // ---
        let tables = self.lock()?;
        Ok(tables
            .tutorials
            .iter()
            .find(|r| r.id == tutorial_id)
            .map(|r| tables.tutorial(r)))
    }

    async fn update_tutorial(
        &self,
        tutorial_id: TutorialId,
        title: &str,
        content: &str,
    ) -> Result<bool> {
        // ---
        let mut tables = self.lock()?;
        match tables.tutorials.iter_mut().find(|r| r.id == tutorial_id) {
            Some(record) => {
                record.title = title.to_string();
                record.content = content.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_comments(&self, tutorial_id: TutorialId) -> Result<Vec<Comment>> {
        // ---
        let tables = self.lock()?;
        // Insertion order is creation order.
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.tutorial_id == tutorial_id)
            .map(|c| tables.comment(c))
            .collect())
    }

    async fn add_comment(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
        content: &str,
    ) -> Result<Option<Comment>> {
        // ---
        let mut tables = self.lock()?;

        if !tables.tutorials.iter().any(|r| r.id == tutorial_id) {
            return Ok(None);
        }

        let record = CommentRecord {
            id: tables.allocate_id(),
            content: content.to_string(),
            created_at: Utc::now(),
            tutorial_id,
            user_id,
        };
        let comment = tables.comment(&record);
        tables.comments.push(record);

        Ok(Some(comment))
    }

    async fn record_reaction(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
        action: Reaction,
    ) -> Result<Option<ReactionTally>> {
        // ---
        let mut tables = self.lock()?;

        if !tables.tutorials.iter().any(|r| r.id == tutorial_id) {
            return Ok(None);
        }

        let existing = tables
            .like_dislikes
            .iter_mut()
            .find(|r| r.tutorial_id == tutorial_id && r.user_id == user_id);

        match existing {
            Some(record) => record.action = action,
            None => {
                let id = tables.allocate_id();
                tables.like_dislikes.push(LikeDislike {
                    id,
                    tutorial_id,
                    user_id,
                    action,
                });
            }
        }

        let count = |wanted: Reaction| {
            tables
                .like_dislikes
                .iter()
                .filter(|r| r.tutorial_id == tutorial_id && r.action == wanted)
                .count() as i32
        };
        let tally = ReactionTally {
            likes: count(Reaction::Like),
            dislikes: count(Reaction::Dislike),
        };

        if let Some(record) = tables.tutorials.iter_mut().find(|r| r.id == tutorial_id) {
            record.likes = tally.likes;
            record.dislikes = tally.dislikes;
        }

        Ok(Some(tally))
    }

    async fn get_reaction(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
    ) -> Result<Option<Reaction>> {
        // ---
        let tables = self.lock()?;
        Ok(tables
            .like_dislikes
            .iter()
            .find(|r| r.tutorial_id == tutorial_id && r.user_id == user_id)
            .map(|r| r.action))
    }

    async fn ping(&self) -> Result<()> {
        // ---
        self.lock().map(|_| ())
    }
}
