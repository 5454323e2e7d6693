use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Play session id (opaque string from the backend).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Player group id (opaque string from the backend).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

/// A scheduled play session, as shown on an invite screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaySession {
    pub id: SessionId,
    pub title: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub host_name: String,
    pub player_limit: Option<u32>,
}

/// A player group, as shown on a group-invite screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerGroup {
    pub id: GroupId,
    pub name: String,
    pub member_count: u32,
}
