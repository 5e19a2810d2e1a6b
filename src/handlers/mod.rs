// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are visible to the router

mod account;
mod auth;
mod errors;
mod flash;
mod health;
mod home;
mod metrics;
mod reactions;
mod tutorials;
mod viewer;
mod views;

// Core handlers
pub(crate) use errors::fallback_handler;
pub(crate) use health::health_check;
pub(crate) use metrics::{metrics_handler, track_metrics};

// Account lifecycle
pub(crate) use account::{account_page, update_account};
pub(crate) use auth::{login_page, login_submit, logout, register_page, register_submit};

// Tutorials, comments and reactions
pub(crate) use home::home;
pub(crate) use reactions::like_dislike;
pub(crate) use tutorials::{
    create_tutorial, edit_tutorial, edit_tutorial_page, new_tutorial_page, post_comment,
    view_tutorial,
};
