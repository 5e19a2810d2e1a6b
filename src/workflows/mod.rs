//! Request-independent operations.
//!
//! Every function takes the store explicitly and, where a caller matters,
//! the caller's user id. Handlers own cookies, forms and rendering.

mod account;
mod auth;
mod content;
mod error;
mod reactions;
mod validation;

pub use account::{get_account, set_avatar};
pub use auth::{login, logout, register, LoggedIn};
pub use content::{
    add_comment, create_tutorial, edit_tutorial, get_tutorial, list_tutorials, tutorial_for_edit,
};
pub use error::{WorkflowError, WorkflowResult};
pub use reactions::{current_reaction, parse_action, react};
