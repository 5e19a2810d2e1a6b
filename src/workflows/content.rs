//! Tutorials and their comments.

use super::error::{WorkflowError, WorkflowResult};
use super::validation;
use crate::domain::{Comment, Repository, Tutorial, TutorialDetail, TutorialId, UserId};

fn tutorial_not_found(id: TutorialId) -> WorkflowError {
    WorkflowError::NotFound {
        entity: "tutorial",
        id,
    }
}

/// All tutorials, newest first.
pub async fn list_tutorials(repo: &dyn Repository) -> WorkflowResult<Vec<Tutorial>> {
    // ---
    Ok(repo.list_tutorials().await?)
}

/// One tutorial with its comments, oldest comment first.
pub async fn get_tutorial(repo: &dyn Repository, id: TutorialId) -> WorkflowResult<TutorialDetail> {
    // ---
    let tutorial = repo
        .get_tutorial(id)
        .await?
        .ok_or_else(|| tutorial_not_found(id))?;
    let comments = repo.list_comments(id).await?;

    Ok(TutorialDetail { tutorial, comments })
}

/// Publish a new tutorial authored by the caller.
pub async fn create_tutorial(
    repo: &dyn Repository,
    caller: UserId,
    title: &str,
    content: &str,
) -> WorkflowResult<Tutorial> {
    // ---
    let title = validation::required("Title", title, validation::MAX_TITLE_LEN)?;
    let content = validation::required_text("Content", content)?;

    let tutorial = repo.create_tutorial(caller, title, content).await?;

    tracing::info!(tutorial_id = tutorial.id, author_id = caller, "Created tutorial");
    Ok(tutorial)
}

/// Append a comment from the caller.
///
/// The tutorial is checked before the content so a stale link reports
/// NotFound rather than a form error.
pub async fn add_comment(
    repo: &dyn Repository,
    tutorial_id: TutorialId,
    caller: UserId,
    content: &str,
) -> WorkflowResult<Comment> {
    // ---
    if repo.get_tutorial(tutorial_id).await?.is_none() {
        return Err(tutorial_not_found(tutorial_id));
    }
    let content = validation::required_text("Comment", content)?;

    let comment = repo
        .add_comment(tutorial_id, caller, content)
        .await?
        .ok_or_else(|| tutorial_not_found(tutorial_id))?;

    tracing::info!(tutorial_id, comment_id = comment.id, "Comment added");
    Ok(comment)
}

/// Load a tutorial for editing; only its author may.
pub async fn tutorial_for_edit(
    repo: &dyn Repository,
    id: TutorialId,
    caller: UserId,
) -> WorkflowResult<Tutorial> {
    // ---
    let tutorial = repo
        .get_tutorial(id)
        .await?
        .ok_or_else(|| tutorial_not_found(id))?;

    if tutorial.author_id != caller {
        tracing::warn!(tutorial_id = id, caller, "Edit refused: caller is not the author");
        return Err(WorkflowError::Forbidden(
            "You are not authorized to edit this tutorial".to_string(),
        ));
    }
    Ok(tutorial)
}

/// Replace title and content of the caller's own tutorial.
/// The creation timestamp is left as it was.
///
/// # Errors
/// NotFound, then Forbidden, then ValidationFailed, in that order.
pub async fn edit_tutorial(
    repo: &dyn Repository,
    id: TutorialId,
    caller: UserId,
    new_title: &str,
    new_content: &str,
) -> WorkflowResult<Tutorial> {
    // ---
    let mut tutorial = tutorial_for_edit(repo, id, caller).await?;

    let title = validation::required("Title", new_title, validation::MAX_TITLE_LEN)?;
    let content = validation::required_text("Content", new_content)?;

    if !repo.update_tutorial(id, title, content).await? {
        return Err(tutorial_not_found(id));
    }

    tutorial.title = title.to_string();
    tutorial.content = content.to_string();

    tracing::info!(tutorial_id = id, "Tutorial updated");
    Ok(tutorial)
}
