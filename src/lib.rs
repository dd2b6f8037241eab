//! Collaborative event workspaces: derived lifecycle state, role-based
//! visibility, and deterministic listing projections over data fetched
//! from a remote store.
//!
//! Everything that decides something here is a pure function of its
//! inputs; the only suspending operations are the store accessors and the
//! [`lifecycle::PostController`] writes built on them.

pub mod access;
pub mod client;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod pipeline;
pub mod session;
pub mod status;
pub mod task;
pub mod time;

pub use client::{Ballot, Client, Event, FormQuestion, Post, PostBody, PostDraft, PostKind, Staff, User, Viewer, EVERYONE};
pub use error::{Error, ValidationError};
pub use lifecycle::{PostController, PostStore};
pub use listing::{EventListing, EventScope, PostBoard};
pub use pipeline::{Listed, Projection, SortBy};
pub use session::Session;
pub use status::{event_status, post_status, PostStatus, Status};
pub use task::Task;
