use crate::client::PostKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid post: {0}")]
    Validation(#[from] ValidationError),

    #[error("access denied: {0}")]
    AccessDenied(Action),

    #[error("request failed: {0}")]
    Transport(anyhow::Error),
}

/// Draft problems caught before anything is sent to the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("description is required")]
    MissingDescription,

    #[error("{0} must have an end date")]
    EndDateRequired(PostKind),

    #[error("end date precedes the post date")]
    EndBeforeStart,

    #[error("`{0}` is not a role of this event")]
    UnknownRole(String),

    #[error("post kind cannot change after creation")]
    KindChanged,

    #[error("author cannot change")]
    AuthorChanged,

    #[error("missing identifier")]
    MissingId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        })
    }
}
