//! Supabase adapter (session/group lookups).
//!
//! Talks to PostgREST (`/rest/v1/<table>`) with the anon key. Row shapes
//! live here; the core only sees domain entities through the directory
//! ports.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use netgains_core::{
    domain::{GroupId, PlaySession, PlayerGroup, SessionId},
    errors::Error,
    ports::{GroupDirectory, SessionDirectory},
    Result,
};

const SESSIONS_TABLE: &str = "sessions";
const GROUPS_TABLE: &str = "groups";

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    base: Url,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid SUPABASE_URL {base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            base,
            anon_key: anon_key.into(),
            http,
        })
    }

    /// `GET /rest/v1/<table>?id=eq.<id>&limit=1` — PostgREST returns an
    /// array; an empty array means the row does not exist.
    async fn fetch_by_id<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<Option<T>> {
        let url = self
            .base
            .join(&format!("/rest/v1/{table}"))
            .map_err(|e| Error::Lookup(format!("bad request url: {e}")))?;

        let resp = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&[
                ("id", format!("eq.{id}")),
                ("select", "*".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Lookup(format!("supabase request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Lookup(format!(
                "supabase {table} lookup failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let mut rows: Vec<T> = resp
            .json()
            .await
            .map_err(|e| Error::Lookup(format!("supabase json error: {e}")))?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.swap_remove(0)))
    }
}

#[async_trait]
impl SessionDirectory for SupabaseClient {
    async fn session_by_id(&self, id: &SessionId) -> Result<Option<PlaySession>> {
        let row: Option<SessionRow> = self.fetch_by_id(SESSIONS_TABLE, &id.0).await?;
        Ok(row.map(PlaySession::from))
    }
}

#[async_trait]
impl GroupDirectory for SupabaseClient {
    async fn group_for_invite(&self, id: &GroupId) -> Result<Option<PlayerGroup>> {
        let row: Option<GroupRow> = self.fetch_by_id(GROUPS_TABLE, &id.0).await?;
        Ok(row.map(PlayerGroup::from))
    }
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    id: String,
    title: String,
    #[serde(default)]
    location: String,
    starts_at: DateTime<Utc>,
    #[serde(default)]
    host_name: String,
    player_limit: Option<u32>,
}

impl From<SessionRow> for PlaySession {
    fn from(row: SessionRow) -> Self {
        PlaySession {
            id: SessionId(row.id),
            title: row.title,
            location: row.location,
            starts_at: row.starts_at,
            host_name: row.host_name,
            player_limit: row.player_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroupRow {
    id: String,
    name: String,
    #[serde(default)]
    member_count: u32,
}

impl From<GroupRow> for PlayerGroup {
    fn from(row: GroupRow) -> Self {
        PlayerGroup {
            id: GroupId(row.id),
            name: row.name,
            member_count: row.member_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn session_row_deserializes_and_converts() {
        let json = r#"{
          "id": "abc123",
          "title": "Tuesday open play",
          "location": "Riverside courts",
          "starts_at": "2026-09-01T18:00:00Z",
          "host_name": "Sam",
          "player_limit": 8,
          "created_at": "2026-08-01T00:00:00Z"
        }"#;
        let row: SessionRow = serde_json::from_str(json).unwrap();
        let session = PlaySession::from(row);
        assert_eq!(session.id, SessionId("abc123".to_string()));
        assert_eq!(
            session.starts_at,
            Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap()
        );
        assert_eq!(session.player_limit, Some(8));
    }

    #[test]
    fn session_row_tolerates_missing_optional_columns() {
        let json = r#"{
          "id": "abc123",
          "title": "Drop-in",
          "starts_at": "2026-09-01T18:00:00Z",
          "player_limit": null
        }"#;
        let row: SessionRow = serde_json::from_str(json).unwrap();
        let session = PlaySession::from(row);
        assert_eq!(session.location, "");
        assert_eq!(session.player_limit, None);
    }

    #[test]
    fn group_row_deserializes_and_converts() {
        let json = r#"{"id": "abc123", "name": "Club", "member_count": 12}"#;
        let row: GroupRow = serde_json::from_str(json).unwrap();
        let group = PlayerGroup::from(row);
        assert_eq!(
            group,
            PlayerGroup {
                id: GroupId("abc123".to_string()),
                name: "Club".to_string(),
                member_count: 12,
            }
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = SupabaseClient::new("not a url", "key", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
