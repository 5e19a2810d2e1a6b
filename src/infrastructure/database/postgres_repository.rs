use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    Comment, NewUser, Reaction, ReactionTally, Repository, Tutorial, TutorialId, UniqueField,
    UniqueViolation, User, UserId,
};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    avatar: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        // ---
        User {
            id: r.id,
            username: r.username,
            email: r.email,
            password_hash: r.password_hash,
            avatar: r.avatar,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TutorialRow {
    id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    author_id: i64,
    author: String,
    likes: i32,
    dislikes: i32,
}

impl From<TutorialRow> for Tutorial {
    fn from(r: TutorialRow) -> Self {
        // ---
        Tutorial {
            id: r.id,
            title: r.title,
            content: r.content,
            created_at: r.created_at,
            author_id: r.author_id,
            author: r.author,
            likes: r.likes,
            dislikes: r.dislikes,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    created_at: DateTime<Utc>,
    tutorial_id: i64,
    user_id: i64,
    author: String,
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        // ---
        Comment {
            id: r.id,
            content: r.content,
            created_at: r.created_at,
            tutorial_id: r.tutorial_id,
            user_id: r.user_id,
            author: r.author,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TallyRow {
    likes: i32,
    dislikes: i32,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar";

const TUTORIAL_SELECT: &str = "SELECT t.id, t.title, t.content, t.created_at, t.author_id,
        u.username AS author, t.likes, t.dislikes
     FROM tutorials t JOIN users u ON u.id = t.author_id";

pub fn create_postgres_repository(pool: PgPool) -> crate::domain::RepositoryPtr {
    // ---
    std::sync::Arc::new(PostgresRepository::new(pool))
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

/// Turn a unique-constraint failure on `users` into a [`UniqueViolation`].
fn map_user_insert_error(err: sqlx::Error) -> anyhow::Error {
    // ---
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("uq_users_email") => UniqueField::Email,
                _ => UniqueField::Username,
            };
            return UniqueViolation { field }.into();
        }
    }
    err.into()
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_insert_error)?;

        Ok(row.into())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_avatar(&self, user_id: UserId, avatar: &str) -> Result<bool> {
        // ---
        let result = sqlx::query("UPDATE users SET avatar = $1 WHERE id = $2")
            .bind(avatar)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_tutorial(
        &self,
        author_id: UserId,
        title: &str,
        content: &str,
    ) -> Result<Tutorial> {
        // ---
        let row = sqlx::query_as::<_, TutorialRow>(
            "WITH inserted AS (
                 INSERT INTO tutorials (title, content, author_id)
                 VALUES ($1, $2, $3)
                 RETURNING *
             )
             SELECT i.id, i.title, i.content, i.created_at, i.author_id,
                    u.username AS author, i.likes, i.dislikes
             FROM inserted i JOIN users u ON u.id = i.author_id",
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_tutorials(&self) -> Result<Vec<Tutorial>> {
        // ---
        let rows = sqlx::query_as::<_, TutorialRow>(&format!(
            "{TUTORIAL_SELECT} ORDER BY t.created_at DESC, t.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tutorial::from).collect())
    }

    async fn get_tutorial(&self, tutorial_id: TutorialId) -> Result<Option<Tutorial>> {
        // ---
        let row = sqlx::query_as::<_, TutorialRow>(&format!("{TUTORIAL_SELECT} WHERE t.id = $1"))
            .bind(tutorial_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Tutorial::from))
    }

    async fn update_tutorial(
        &self,
        tutorial_id: TutorialId,
        title: &str,
        content: &str,
    ) -> Result<bool> {
        // ---
        let result = sqlx::query("UPDATE tutorials SET title = $1, content = $2 WHERE id = $3")
            .bind(title)
            .bind(content)
            .bind(tutorial_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self, tutorial_id: TutorialId) -> Result<Vec<Comment>> {
        // ---
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT c.id, c.content, c.created_at, c.tutorial_id, c.user_id,
                    u.username AS author
             FROM comments c JOIN users u ON u.id = c.user_id
             WHERE c.tutorial_id = $1
             ORDER BY c.created_at, c.id",
        )
        .bind(tutorial_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn add_comment(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
        content: &str,
    ) -> Result<Option<Comment>> {
        // ---
        // The SELECT yields no row for a missing tutorial, so nothing is inserted.
        let row = sqlx::query_as::<_, CommentRow>(
            "WITH inserted AS (
                 INSERT INTO comments (content, tutorial_id, user_id)
                 SELECT $1, t.id, $3 FROM tutorials t WHERE t.id = $2
                 RETURNING *
             )
             SELECT i.id, i.content, i.created_at, i.tutorial_id, i.user_id,
                    u.username AS author
             FROM inserted i JOIN users u ON u.id = i.user_id",
        )
        .bind(content)
        .bind(tutorial_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Comment::from))
    }

    async fn record_reaction(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
        action: Reaction,
    ) -> Result<Option<ReactionTally>> {
        // ---
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent reactions on the same tutorial
        // until the recount below commits.
        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM tutorials WHERE id = $1 FOR UPDATE")
                .bind(tutorial_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO like_dislikes (tutorial_id, user_id, action)
             VALUES ($1, $2, $3)
             ON CONFLICT (tutorial_id, user_id) DO UPDATE SET action = EXCLUDED.action",
        )
        .bind(tutorial_id)
        .bind(user_id)
        .bind(action.as_str())
        .execute(&mut *tx)
        .await?;

        let tally = sqlx::query_as::<_, TallyRow>(
            "UPDATE tutorials SET
                 likes = (SELECT COUNT(*) FROM like_dislikes
                          WHERE tutorial_id = $1 AND action = 'like')::INT,
                 dislikes = (SELECT COUNT(*) FROM like_dislikes
                             WHERE tutorial_id = $1 AND action = 'dislike')::INT
             WHERE id = $1
             RETURNING likes, dislikes",
        )
        .bind(tutorial_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ReactionTally {
            likes: tally.likes,
            dislikes: tally.dislikes,
        }))
    }

    async fn get_reaction(
        &self,
        tutorial_id: TutorialId,
        user_id: UserId,
    ) -> Result<Option<Reaction>> {
        // ---
        let action: Option<String> = sqlx::query_scalar(
            "SELECT action FROM like_dislikes WHERE tutorial_id = $1 AND user_id = $2",
        )
        .bind(tutorial_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        action
            .map(|a| a.parse::<Reaction>().map_err(|e| anyhow!(e)))
            .transpose()
    }

    async fn ping(&self) -> Result<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
