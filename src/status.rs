//! Lifecycle state derived from timestamps. Runs on every read; there is no
//! scheduler anywhere, so these must stay pure.

use chrono::{DateTime, Utc};
use std::fmt;

/// Where an event sits relative to its `[start, end]` window. The interval
/// is closed: `now == start` and `now == end` are both `Ongoing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Upcoming,
    Ongoing,
    Ended,
}

pub fn event_status(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Status {
    if now < start {
        Status::Upcoming
    } else if now > end {
        Status::Ended
    } else {
        Status::Ongoing
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upcoming => "Upcoming",
            Self::Ongoing => "Ongoing",
            Self::Ended => "Ended",
        })
    }
}

/// A post has no start bound, and its end bound is optional. Without one
/// there is no "closed" state to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    Open,
    Closed,
    Undetermined,
}

pub fn post_status(now: DateTime<Utc>, end: Option<DateTime<Utc>>) -> PostStatus {
    match end {
        None => PostStatus::Undetermined,
        Some(end) if now > end => PostStatus::Closed,
        Some(_) => PostStatus::Open,
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "Open",
            Self::Closed => "Ended",
            Self::Undetermined => "Uncertain",
        })
    }
}
