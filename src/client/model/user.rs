use super::{Event, Object};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Ordered privilege tier: 1 member, 2 staff-with-create-rights.
    /// Higher tiers retain lower-tier privileges.
    #[serde(default = "default_access")]
    pub access: i32,
}

fn default_access() -> i32 {
    1
}

impl Object for User {
    const QUERY_PATH: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

/// The principal evaluating access, snapshotted per event: the roles are
/// the ones the viewer holds on that event's staff roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
    pub access_level: i32,
    pub roles: Vec<String>,
}

impl Viewer {
    pub fn for_event(id: impl Into<String>, access_level: i32, event: &Event) -> Self {
        let id = id.into();
        let roles = event
            .staff
            .iter()
            .filter(|it| it.std_id == id)
            .map(|it| it.role.clone())
            .collect();
        Self { id, access_level, roles }
    }
}
