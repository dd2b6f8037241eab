use super::{Object, EVERYONE};
use crate::{
    pipeline::Listed,
    status::{event_status, Status},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(rename = "stdID")]
    pub std_id: String,
    pub role: String,
}

/// A time-bounded workspace with a participant/staff roster.
///
/// `start_date <= end_date` is a store-side integrity guarantee; nothing
/// here re-checks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub event_name: String,
    #[serde(default)]
    pub event_description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default, rename = "role")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Event {
    pub fn status(&self, now: DateTime<Utc>) -> Status {
        event_status(now, self.start_date, self.end_date)
    }

    /// Appends the `everyone` sentinel if absent. Called once when the
    /// record is loaded, so repeated renders cannot accumulate duplicates.
    pub fn normalize_roles(&mut self) {
        if !self.roles.iter().any(|it| it == EVERYONE) {
            self.roles.push(EVERYONE.to_owned());
        }
    }

    pub fn is_staff(&self, user_id: &str) -> bool {
        self.staff.iter().any(|it| it.std_id == user_id)
    }

    /// Whether the user belongs to this event, as staff or participant.
    pub fn involves(&self, user_id: &str) -> bool {
        self.is_staff(user_id) || self.participants.iter().any(|it| it == user_id)
    }

    /// Joining is open until the event ends, and only to outsiders.
    pub fn can_join(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        self.status(now) != Status::Ended && !self.involves(user_id)
    }
}

impl Object for Event {
    const QUERY_PATH: &'static str = "event";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Listed for Event {
    fn display_name(&self) -> &str {
        &self.event_name
    }

    fn sort_date(&self) -> DateTime<Utc> {
        self.start_date
    }
}
