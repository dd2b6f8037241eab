//! Listing state shared by the event and post surfaces.
//!
//! One projection drives both the "all events" and "joined events" views;
//! the only difference is the relationship predicate. The same goes for
//! the post board, which additionally filters by kind and by visibility.

use crate::{
    access,
    client::{Client, Event, Post, PostKind, Viewer},
    pipeline::{Projection, SortBy},
    status::Status,
    task::Task,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventScope {
    #[default]
    All,
    /// Only events where the viewer is staff or a participant.
    Joined,
}

pub struct EventListing {
    events: Vec<Event>,
    scope: EventScope,
    pub search: String,
    pub sort: SortBy,
    /// When set, keeps only events currently in this lifecycle state.
    pub status: Option<Status>,
    fetch_task: Option<Task<Result<Vec<Event>>>>,
}

impl EventListing {
    pub fn new(scope: EventScope) -> Self {
        Self {
            events: Vec::new(),
            scope,
            search: String::new(),
            sort: SortBy::default(),
            status: None,
            fetch_task: None,
        }
    }

    pub fn refresh(&mut self) {
        self.fetch_task = Some(Task::new(Client::fetch_events()));
    }

    pub fn loading(&self) -> bool {
        self.fetch_task.is_some()
    }

    /// Polls the pending fetch. Returns true when fresh data landed.
    pub fn poll(&mut self) -> bool {
        if let Some(task) = &mut self.fetch_task {
            if let Some(result) = task.take() {
                self.fetch_task = None;
                match result {
                    Ok(events) => {
                        self.events = events;
                        return true;
                    }
                    Err(err) => {
                        warn!("failed to fetch events: {err:?}");
                    }
                }
            }
        }
        false
    }

    /// Replaces the collection wholesale, e.g. after a confirmed write.
    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub fn view(&self, viewer: &Viewer, now: DateTime<Utc>) -> Vec<Event> {
        let mut proj = Projection::new().search(self.search.as_str()).sort(self.sort);
        if let Some(status) = self.status {
            proj = proj.keep(move |event: &Event| event.status(now) == status);
        }
        if self.scope == EventScope::Joined {
            let id = viewer.id.clone();
            proj = proj.keep(move |event: &Event| event.involves(&id));
        }
        proj.apply(&self.events)
    }
}

pub struct PostBoard {
    event: Event,
    posts: Vec<Post>,
    pub filter: Option<PostKind>,
    pub search: String,
    pub sort: SortBy,
    fetch_task: Option<Task<Result<Vec<Post>>>>,
}

impl PostBoard {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            posts: Vec::new(),
            filter: None,
            search: String::new(),
            sort: SortBy::default(),
            fetch_task: None,
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn refresh(&mut self) {
        let id = self.event.id.clone();
        self.fetch_task = Some(Task::new(async move { Client::fetch_posts(&id).await }));
    }

    pub fn poll(&mut self) -> bool {
        if let Some(task) = &mut self.fetch_task {
            if let Some(result) = task.take() {
                self.fetch_task = None;
                match result {
                    Ok(posts) => {
                        self.posts = posts;
                        return true;
                    }
                    Err(err) => {
                        warn!("failed to fetch posts: {err:?}");
                    }
                }
            }
        }
        false
    }

    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    /// Everything the viewer is allowed to see, filtered and ordered.
    pub fn view(&self, viewer: &Viewer) -> Vec<Post> {
        let mut proj = Projection::new().search(self.search.as_str()).sort(self.sort);
        if let Some(kind) = self.filter {
            proj = proj.keep(move |post: &Post| post.kind() == kind);
        }
        proj = proj.keep(|post: &Post| access::can_view(post, viewer));
        proj.apply(&self.posts)
    }

    pub fn can_join(&self, viewer: &Viewer, now: DateTime<Utc>) -> bool {
        self.event.can_join(&viewer.id, now)
    }
}
