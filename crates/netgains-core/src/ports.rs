use async_trait::async_trait;

use crate::{
    domain::{GroupId, PlaySession, PlayerGroup, SessionId},
    Result,
};

/// Remote lookup of play sessions (Supabase in production).
///
/// `Ok(None)` means the session does not exist (cancelled/expired); `Err`
/// means the lookup itself failed. The resolver collapses both into a
/// user-visible not-found state, so implementations should not retry.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    async fn session_by_id(&self, id: &SessionId) -> Result<Option<PlaySession>>;
}

/// Remote lookup of player groups for invite display.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn group_for_invite(&self, id: &GroupId) -> Result<Option<PlayerGroup>>;
}

/// Per-device key-value persistence (AsyncStorage-shaped: string in,
/// string out, single key per blob).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
