use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::ports::KeyValueStore;

/// Single storage key for the whole dashboard layout: the collection is
/// persisted as one JSON array, not one key per widget.
pub const WIDGET_STORE_KEY: &str = "dashboard_widgets";

/// Known dashboard widget kinds.
///
/// `Unknown` is the forward-compat fallback: blobs written by a newer app
/// version must still deserialize on this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    DuprRating,
    UpcomingSessions,
    MyGroups,
    OpenInvites,
    #[serde(other)]
    Unknown,
}

/// One dashboard widget entry. `order` defines the display position;
/// ties keep their array position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub id: String,
    pub kind: WidgetKind,
    pub title: String,
    pub enabled: bool,
    pub order: u32,
}

/// The canonical widget set shipped with the app. `load()` backfills these
/// into persisted state written by older versions.
pub fn default_widgets() -> Vec<WidgetDescriptor> {
    [
        ("dupr", WidgetKind::DuprRating, "DUPR Rating"),
        ("upcoming", WidgetKind::UpcomingSessions, "Upcoming Sessions"),
        ("groups", WidgetKind::MyGroups, "My Groups"),
        ("invites", WidgetKind::OpenInvites, "Open Invites"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (id, kind, title))| WidgetDescriptor {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        enabled: true,
        order: i as u32,
    })
    .collect()
}

/// Authoritative in-memory ordering of dashboard widgets, synchronized
/// with per-device storage.
///
/// Sole writer of the persisted blob. Storage failures are absorbed and
/// logged; the user at worst sees a stale or default layout.
pub struct WidgetOrderStore {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<Option<Vec<WidgetDescriptor>>>,
}

impl WidgetOrderStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Mutex::new(None),
        }
    }

    /// Load the persisted layout, reconciling with the canonical default
    /// set: canonical widgets missing from the blob are appended, unknown
    /// widgets in the blob are retained, result sorted by ascending order.
    ///
    /// Fail-open: a missing, unreadable, or unparseable blob yields the
    /// canonical defaults instead of an error.
    pub async fn load(&self) -> Vec<WidgetDescriptor> {
        let widgets = match self.store.get(WIDGET_STORE_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<WidgetDescriptor>>(&blob) {
                Ok(persisted) => reconcile_with_defaults(persisted),
                Err(e) => {
                    warn!(error = %e, "widget blob unparseable, using defaults");
                    default_widgets()
                }
            },
            Ok(None) => default_widgets(),
            Err(e) => {
                warn!(error = %e, "widget store read failed, using defaults");
                default_widgets()
            }
        };

        *self.state.lock().await = Some(widgets.clone());
        widgets
    }

    /// Apply a drag-reorder: `order` becomes the 0-based index in the new
    /// sequence. The in-memory state is replaced before the write, and the
    /// write never fails from the caller's perspective — on persistence
    /// failure the optimistic state stays and the next successful `load()`
    /// reconciles.
    pub async fn reorder(&self, new_sequence: Vec<WidgetDescriptor>) {
        let widgets: Vec<WidgetDescriptor> = new_sequence
            .into_iter()
            .enumerate()
            .map(|(i, mut w)| {
                w.order = i as u32;
                w
            })
            .collect();

        *self.state.lock().await = Some(widgets.clone());
        self.persist(&widgets).await;
    }

    /// Enable or disable one widget. No-op if the id is unknown.
    pub async fn toggle(&self, id: &str, enabled: bool) {
        let widgets = {
            let mut st = self.state.lock().await;
            let Some(widgets) = st.as_mut() else {
                return;
            };
            let Some(widget) = widgets.iter_mut().find(|w| w.id == id) else {
                return;
            };
            widget.enabled = enabled;
            widgets.clone()
        };
        self.persist(&widgets).await;
    }

    /// Persist the canonical defaults verbatim, then reload.
    pub async fn reset_to_default(&self) -> Vec<WidgetDescriptor> {
        self.persist(&default_widgets()).await;
        self.load().await
    }

    /// Current in-memory collection (empty until the first `load()`).
    pub async fn current(&self) -> Vec<WidgetDescriptor> {
        self.state.lock().await.clone().unwrap_or_default()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.lock().await.is_some()
    }

    async fn persist(&self, widgets: &[WidgetDescriptor]) {
        let blob = match serde_json::to_string(widgets) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "widget blob serialization failed");
                return;
            }
        };
        if let Err(e) = self.store.set(WIDGET_STORE_KEY, &blob).await {
            warn!(error = %e, "widget store write failed, keeping optimistic state");
        }
    }
}

/// Union of persisted state and the canonical set: persisted entries keep
/// their order/enabled values, missing canonical entries are appended,
/// unknown persisted entries survive. Stable sort keeps array position for
/// equal orders.
fn reconcile_with_defaults(mut widgets: Vec<WidgetDescriptor>) -> Vec<WidgetDescriptor> {
    for default in default_widgets() {
        if widgets.iter().any(|w| w.id == default.id) {
            continue;
        }
        widgets.push(default);
    }
    // sort_by_key is stable, so equal orders keep their array position.
    widgets.sort_by_key(|w| w.order);
    widgets
}
