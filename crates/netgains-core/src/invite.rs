use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    domain::{GroupId, PlaySession, PlayerGroup, SessionId},
    ports::{GroupDirectory, SessionDirectory},
};

/// Reserved prefix marking a group invite id in a deep link.
pub const GROUP_INVITE_PREFIX: &str = "g-";

/// Reserved marker for sessions that exist client-side but have not been
/// persisted yet. Such ids must never reach the backend.
pub const TEMP_SESSION_PREFIX: &str = "temp-";

const MSG_MISSING_ID: &str = "missing identifier";
const MSG_SESSION_PENDING: &str = "session not yet available";
const MSG_SESSION_GONE: &str = "This session may have been cancelled or the link has expired.";
const MSG_GROUP_GONE: &str = "This group may have been deleted or the link has expired.";
const MSG_LOOKUP_FAILED: &str = "Unable to load invite details. Please try again.";

/// Classified invite identifier.
///
/// Classification is a pure function of the raw string's prefix; no network
/// call is needed (or allowed) to classify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InviteId {
    Session(SessionId),
    Group(GroupId),
}

impl InviteId {
    /// Classify a raw identifier from a deep link.
    ///
    /// `g-`-prefixed ids are group invites with the prefix stripped;
    /// everything else is a session invite, raw string unmodified.
    /// Empty input is not classifiable.
    pub fn classify(raw: &str) -> Option<InviteId> {
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix(GROUP_INVITE_PREFIX) {
            Some(group_id) => Some(InviteId::Group(GroupId(group_id.to_string()))),
            None => Some(InviteId::Session(SessionId(raw.to_string()))),
        }
    }
}

/// Render-ready outcome of resolving an invite identifier.
///
/// Exactly one state is active; `Loading` is the initial state of an
/// [`InviteFlow`] and is never re-entered once resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum InviteResolution {
    Loading,
    Session(PlaySession),
    Group(PlayerGroup),
    NotFound(String),
    Invalid(String),
}

impl InviteResolution {
    pub fn is_loading(&self) -> bool {
        matches!(self, InviteResolution::Loading)
    }
}

/// Turns a raw invite identifier into an [`InviteResolution`].
///
/// Stateless; safe to share and to re-invoke with the same identifier
/// (resolution is idempotent, no retries happen internally).
#[derive(Clone)]
pub struct InviteResolver {
    sessions: Arc<dyn SessionDirectory>,
    groups: Arc<dyn GroupDirectory>,
}

impl InviteResolver {
    pub fn new(sessions: Arc<dyn SessionDirectory>, groups: Arc<dyn GroupDirectory>) -> Self {
        Self { sessions, groups }
    }

    /// Resolve a raw identifier. Never returns `Loading`.
    ///
    /// Lookup failures are collapsed into `NotFound` (logged here); the
    /// presentation layer only offers a "go back" affordance, not a retry.
    pub async fn resolve(&self, raw: &str) -> InviteResolution {
        let Some(id) = InviteId::classify(raw) else {
            return InviteResolution::Invalid(MSG_MISSING_ID.to_string());
        };

        match id {
            InviteId::Session(session_id) => {
                if session_id.0.starts_with(TEMP_SESSION_PREFIX) {
                    return InviteResolution::Invalid(MSG_SESSION_PENDING.to_string());
                }
                match self.sessions.session_by_id(&session_id).await {
                    Ok(Some(session)) => InviteResolution::Session(session),
                    Ok(None) => InviteResolution::NotFound(MSG_SESSION_GONE.to_string()),
                    Err(e) => {
                        warn!(session_id = %session_id.0, error = %e, "session lookup failed");
                        InviteResolution::NotFound(MSG_LOOKUP_FAILED.to_string())
                    }
                }
            }
            InviteId::Group(group_id) => match self.groups.group_for_invite(&group_id).await {
                Ok(Some(group)) => InviteResolution::Group(group),
                Ok(None) => InviteResolution::NotFound(MSG_GROUP_GONE.to_string()),
                Err(e) => {
                    warn!(group_id = %group_id.0, error = %e, "group lookup failed");
                    InviteResolution::NotFound(MSG_LOOKUP_FAILED.to_string())
                }
            },
        }
    }
}

/// Single-shot resolution state machine for one invite identifier.
///
/// Starts in `Loading`; the first `run()` resolves and caches the terminal
/// state, later calls return the cached state without touching the
/// providers. A new identifier (e.g. navigation re-entry with a different
/// link) gets a fresh `InviteFlow` rather than mutating this one.
pub struct InviteFlow {
    resolver: InviteResolver,
    raw: String,
    state: Mutex<InviteResolution>,
}

impl InviteFlow {
    pub fn new(resolver: InviteResolver, raw: impl Into<String>) -> Self {
        Self {
            resolver,
            raw: raw.into(),
            state: Mutex::new(InviteResolution::Loading),
        }
    }

    pub fn raw_id(&self) -> &str {
        &self.raw
    }

    /// Resolve once. Holding the state lock across the provider call keeps
    /// concurrent `run()`s single-shot: the second caller observes the
    /// terminal state instead of racing a second lookup.
    pub async fn run(&self) -> InviteResolution {
        let mut st = self.state.lock().await;
        if !st.is_loading() {
            return st.clone();
        }
        let resolved = self.resolver.resolve(&self.raw).await;
        *st = resolved.clone();
        resolved
    }

    pub async fn current(&self) -> InviteResolution {
        self.state.lock().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading()
    }
}
