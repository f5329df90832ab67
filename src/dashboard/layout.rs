use crate::dashboard::registry::WidgetRegistry;
use chrono::{DateTime, Utc};
use hashlink::LinkedHashSet;
use std::collections::HashSet;

/// Whether the layout has been confirmed against the server this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    NotLoaded,
    Synced,
    /// The last load attempt failed. Behaves like `NotLoaded`: the layout is
    /// local-only and exiting edit mode does not push it.
    LoadFailed,
}

impl SyncState {
    pub fn is_synced(self) -> bool {
        matches!(self, SyncState::Synced)
    }
}

/// Mutable dashboard layout for the running session.
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub order: Vec<String>,
    /// Hidden widget ids in the order they were hidden.
    pub hidden: LinkedHashSet<String>,
    pub edit_mode: bool,
    pub sync_state: SyncState,
    pub loading: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl LayoutState {
    /// Fresh layout: registry order, nothing hidden.
    pub fn new(registry: &WidgetRegistry) -> Self {
        Self {
            order: registry.default_order(),
            hidden: LinkedHashSet::new(),
            edit_mode: false,
            sync_state: SyncState::NotLoaded,
            loading: false,
            last_synced_at: None,
        }
    }

    /// Build a reconciled layout from untrusted candidate data.
    pub fn from_candidate(
        order: &[String],
        hidden: &[String],
        registry: &WidgetRegistry,
    ) -> (Self, Vec<String>) {
        let mut state = Self::new(registry);
        let (order, mut warnings) = reconcile_order(order, registry);
        let (hidden, hidden_warnings) = reconcile_hidden(hidden, &order);
        warnings.extend(hidden_warnings);
        state.order = order;
        state.hidden = hidden;
        (state, warnings)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn hidden_ids(&self) -> Vec<String> {
        self.hidden.iter().cloned().collect()
    }

    /// Flip membership of `id` in the hidden set.
    pub fn toggle_hidden(&mut self, id: &str) {
        if !self.hidden.remove(id) {
            self.hidden.insert(id.to_string());
        }
    }

    pub fn reset(&mut self, registry: &WidgetRegistry) {
        self.order = registry.default_order();
        self.hidden.clear();
    }

    /// Re-apply the registry rules to the current order and hidden set.
    ///
    /// Returns a description of every change that was made.
    pub fn reconcile(&mut self, registry: &WidgetRegistry) -> Vec<String> {
        let (order, mut warnings) = reconcile_order(&self.order, registry);
        let hidden: Vec<String> = self.hidden_ids();
        let (hidden, hidden_warnings) = reconcile_hidden(&hidden, &order);
        warnings.extend(hidden_warnings);
        self.order = order;
        self.hidden = hidden;
        warnings
    }
}

/// Filter `candidate` down to registry members (first occurrence wins, relative
/// order kept) and append any missing registry ids in registry order.
pub fn reconcile_order(
    candidate: &[String],
    registry: &WidgetRegistry,
) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut seen = HashSet::with_capacity(registry.len());
    let mut order = Vec::with_capacity(registry.len());

    for id in candidate {
        if !registry.contains(id) {
            warnings.push(format!("unknown dashboard widget '{id}' dropped"));
            continue;
        }
        if !seen.insert(id.as_str()) {
            warnings.push(format!("duplicate dashboard widget '{id}' dropped"));
            continue;
        }
        order.push(id.clone());
    }

    for id in registry.ids() {
        if !seen.contains(id) {
            warnings.push(format!("missing dashboard widget '{id}' appended"));
            order.push(id.to_string());
        }
    }

    (order, warnings)
}

/// Keep only hidden ids that are part of `order`.
pub fn reconcile_hidden(
    candidate: &[String],
    order: &[String],
) -> (LinkedHashSet<String>, Vec<String>) {
    let known: HashSet<&str> = order.iter().map(String::as_str).collect();
    let mut warnings = Vec::new();
    let mut hidden = LinkedHashSet::new();
    for id in candidate {
        if known.contains(id.as_str()) {
            hidden.insert(id.clone());
        } else {
            warnings.push(format!("hidden flag for unknown widget '{id}' dropped"));
        }
    }
    (hidden, warnings)
}
