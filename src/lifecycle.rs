//! Create, update and delete posts.
//!
//! The controller validates and normalizes a draft, dispatches it to the
//! store exactly once, and reports the outcome. It never retries and never
//! touches local state: after a confirmed success the caller re-fetches
//! the collection instead of merging the response. Access is the caller's
//! concern; the resolver is consulted before ever reaching this layer.

use crate::{
    client::{Event, Post, PostDraft, EVERYONE},
    error::{Error, ValidationError},
    task::Task,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Write accessor for the backing store. Implemented by the HTTP client
/// and by in-memory mocks in tests.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, event_id: &str, post: Post) -> Result<Post>;
    async fn update_post(&self, post: Post) -> Result<Post>;
    async fn delete_post(&self, event_id: &str, post_id: &str) -> Result<()>;
}

pub struct PostController<S> {
    store: Arc<S>,
}

impl<S: PostStore + 'static> PostController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, event: &Event, draft: PostDraft, now: DateTime<Utc>) -> Result<Post, Error> {
        let post = prepare(event, draft, now, None)?;
        debug!("creating {} post in event {}", post.kind(), event.id);
        self.store
            .create_post(&event.id, post)
            .await
            .map_err(Error::Transport)
    }

    /// Full-record replace. The kind, author and identifier are immutable;
    /// a draft that disagrees with the stored record is rejected outright.
    pub async fn update(&self, event: &Event, existing: &Post, draft: PostDraft, now: DateTime<Utc>) -> Result<Post, Error> {
        if draft.kind() != existing.kind() {
            return Err(ValidationError::KindChanged.into());
        }
        if draft.author != existing.author {
            return Err(ValidationError::AuthorChanged.into());
        }
        if existing.id.is_empty() {
            return Err(ValidationError::MissingId.into());
        }
        let post = prepare(event, draft, now, Some(existing))?;
        debug!("updating post {}", post.id);
        self.store.update_post(post).await.map_err(Error::Transport)
    }

    pub async fn delete(&self, event_id: &str, post_id: &str) -> Result<(), Error> {
        if post_id.is_empty() || event_id.is_empty() {
            return Err(ValidationError::MissingId.into());
        }
        self.store
            .delete_post(event_id, post_id)
            .await
            .map_err(Error::Transport)
    }

    /// Fire-and-poll variants: the returned handle resolves whenever the
    /// write does, even if a newer operation has been issued since.
    pub fn create_task(&self, event: Event, draft: PostDraft, now: DateTime<Utc>) -> Task<Result<Post, Error>> {
        let store = Arc::clone(&self.store);
        Task::new(async move {
            let post = prepare(&event, draft, now, None)?;
            store.create_post(&event.id, post).await.map_err(Error::Transport)
        })
    }

    pub fn delete_task(&self, event_id: String, post_id: String) -> Task<Result<(), Error>> {
        let store = Arc::clone(&self.store);
        Task::new(async move {
            if post_id.is_empty() || event_id.is_empty() {
                return Err(ValidationError::MissingId.into());
            }
            store.delete_post(&event_id, &post_id).await.map_err(Error::Transport)
        })
    }
}

/// Validation followed by normalization, producing the outgoing record.
/// Nothing is sent if this fails.
fn prepare(event: &Event, draft: PostDraft, now: DateTime<Utc>, existing: Option<&Post>) -> Result<Post, ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    if draft.kind().requires_end_date() && draft.end_date.is_none() {
        return Err(ValidationError::EndDateRequired(draft.kind()));
    }
    if let Some(end) = draft.end_date {
        if end < now {
            return Err(ValidationError::EndBeforeStart);
        }
    }

    let mut assign_to = draft.assign_to;
    if draft.public {
        assign_to.clear();
    } else if assign_to.iter().any(|it| it == EVERYONE) {
        assign_to = vec![EVERYONE.to_owned()];
    } else {
        for role in &assign_to {
            if !event.roles.iter().any(|it| it == role) {
                return Err(ValidationError::UnknownRole(role.clone()));
            }
        }
    }

    Ok(Post {
        id: existing.map(|it| it.id.clone()).unwrap_or_default(),
        event: event.id.clone(),
        title: draft.title,
        description: draft.description,
        assign_to,
        public: draft.public,
        post_date: now,
        end_date: draft.end_date,
        author: draft.author,
        body: draft.body,
    })
}
