use crate::dashboard::layout::{reconcile_hidden, reconcile_order, LayoutState, SyncState};
use crate::dashboard::persistence::{LocalLayoutStore, PersistedLayout};
use crate::dashboard::registry::WidgetRegistry;
use crate::dashboard::sync::{DashboardSettingsPayload, SettingsApi};
use crate::dashboard::view::{ordered_widgets, OrderedWidget};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

/// Notifications emitted after the layout or its sync status changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    Changed,
    Loaded,
    LoadFailed,
    Saved,
    SaveFailed,
}

pub type EventCallback = Arc<dyn Fn(DashboardEvent) + Send + Sync>;

/// Shared handle to the dashboard layout.
///
/// One store is created at startup and cloned into every consumer. All
/// mutations go through the methods below; each one writes the local record
/// before returning. Server calls never run while the state lock is held.
#[derive(Clone)]
pub struct DashboardStore {
    registry: Arc<WidgetRegistry>,
    state: Arc<Mutex<LayoutState>>,
    local: Arc<LocalLayoutStore>,
    api: Arc<dyn SettingsApi>,
    event_cb: Option<EventCallback>,
}

impl DashboardStore {
    /// Create the store, hydrating the layout from `local`.
    pub fn new(
        registry: WidgetRegistry,
        local: LocalLayoutStore,
        api: Arc<dyn SettingsApi>,
        event_cb: Option<EventCallback>,
    ) -> Self {
        let state = local.load(&registry);
        tracing::debug!(
            path = %local.path().display(),
            widgets = state.order.len(),
            hidden = state.hidden.len(),
            "dashboard layout restored"
        );
        Self {
            registry: Arc::new(registry),
            state: Arc::new(Mutex::new(state)),
            local: Arc::new(local),
            api,
            event_cb,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LayoutState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: DashboardEvent) {
        if let Some(cb) = &self.event_cb {
            (cb)(event);
        }
    }

    fn persist(&self, state: &LayoutState) {
        if let Err(e) = self.local.save(state) {
            tracing::warn!(error = %e, "failed to persist dashboard layout");
        }
    }

    fn mutate(&self, f: impl FnOnce(&mut LayoutState, &WidgetRegistry)) {
        {
            let mut state = self.lock();
            f(&mut state, &self.registry);
            self.persist(&state);
        }
        self.emit(DashboardEvent::Changed);
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> LayoutState {
        self.lock().clone()
    }

    pub fn order(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    pub fn hidden(&self) -> Vec<String> {
        self.lock().hidden_ids()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.lock().edit_mode
    }

    pub fn sync_state(&self) -> SyncState {
        self.lock().sync_state
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Widgets in render order with their visibility.
    pub fn ordered_widgets(&self) -> Vec<OrderedWidget> {
        ordered_widgets(&self.lock(), &self.registry)
    }

    /// Enter or leave edit mode. Leaving edit mode on a synced layout pushes it
    /// to the server in the background and returns the worker handle.
    pub fn set_edit_mode(&self, enabled: bool) -> Option<JoinHandle<()>> {
        let should_save = {
            let mut state = self.lock();
            let was_editing = state.edit_mode;
            state.edit_mode = enabled;
            was_editing && !enabled && state.sync_state.is_synced()
        };
        self.emit(DashboardEvent::Changed);
        if should_save {
            Some(self.save_to_server())
        } else {
            None
        }
    }

    pub fn toggle_visibility(&self, id: &str) {
        self.mutate(|state, _| state.toggle_hidden(id));
    }

    /// Replace the order wholesale. The input is trusted; the next
    /// reconciliation repairs anything that is not a permutation.
    pub fn reorder(&self, new_order: Vec<String>) {
        self.mutate(move |state, _| state.order = new_order);
    }

    /// Move `from` to the position currently held by `to`.
    pub fn move_widget(&self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let order = self.order();
        let Some(new_order) = moved(&order, from, to) else {
            tracing::debug!(from, to, "ignoring move of widget outside the layout");
            return;
        };
        self.reorder(new_order);
    }

    pub fn reset_to_default(&self) {
        self.mutate(|state, registry| state.reset(registry));
    }

    /// Fetch the server layout on a background thread.
    pub fn load_from_server(&self) -> JoinHandle<()> {
        let store = self.clone();
        thread::spawn(move || {
            let _ = store.load_from_server_blocking();
        })
    }

    /// Fetch the server layout and install it on success.
    ///
    /// The result overwrites any local edits made while the request was in
    /// flight. On failure the current layout is kept and the error is logged.
    pub fn load_from_server_blocking(&self) -> anyhow::Result<()> {
        self.lock().loading = true;
        let result = self.api.fetch();

        let mut state = self.lock();
        state.loading = false;
        let remote = match result {
            Ok(remote) => remote,
            Err(e) => {
                tracing::error!(error = %e, "failed to load dashboard settings");
                if !state.sync_state.is_synced() {
                    state.sync_state = SyncState::LoadFailed;
                }
                drop(state);
                self.emit(DashboardEvent::LoadFailed);
                return Err(e);
            }
        };

        let mut warnings = Vec::new();
        if let Some(order) = remote.widget_order {
            let (order, w) = reconcile_order(&order, &self.registry);
            warnings.extend(w);
            state.order = order;
        }
        if let Some(hidden) = remote.hidden_widgets {
            let (hidden, w) = reconcile_hidden(&hidden, &self.registry.default_order());
            warnings.extend(w);
            state.hidden = hidden;
        }
        warnings.extend(state.reconcile(&self.registry));
        for w in warnings {
            tracing::debug!("{w}");
        }
        state.sync_state = SyncState::Synced;
        state.last_synced_at = Some(Utc::now());
        self.persist(&state);
        drop(state);

        tracing::info!("dashboard settings loaded from server");
        self.emit(DashboardEvent::Loaded);
        Ok(())
    }

    /// Push the current layout on a background thread.
    pub fn save_to_server(&self) -> JoinHandle<()> {
        let store = self.clone();
        thread::spawn(move || {
            let _ = store.save_to_server_blocking();
        })
    }

    /// Send the current layout to the server. Local state is never rolled back
    /// and failed saves are not retried.
    pub fn save_to_server_blocking(&self) -> anyhow::Result<()> {
        let payload = {
            let state = self.lock();
            let persisted = PersistedLayout::from_state(&state);
            DashboardSettingsPayload {
                widget_order: persisted.order,
                hidden_widgets: persisted.hidden,
            }
        };
        match self.api.update(&payload) {
            Ok(()) => {
                self.lock().last_synced_at = Some(Utc::now());
                tracing::info!("dashboard settings saved to server");
                self.emit(DashboardEvent::Saved);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save dashboard settings");
                self.emit(DashboardEvent::SaveFailed);
                Err(e)
            }
        }
    }
}

/// Remove `from` and reinsert it at the index `to` occupied.
fn moved(order: &[String], from: &str, to: &str) -> Option<Vec<String>> {
    let old_index = order.iter().position(|id| id == from)?;
    let new_index = order.iter().position(|id| id == to)?;
    let mut new_order = order.to_vec();
    let id = new_order.remove(old_index);
    new_order.insert(new_index, id);
    Some(new_order)
}
