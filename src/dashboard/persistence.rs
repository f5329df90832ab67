use crate::dashboard::layout::LayoutState;
use crate::dashboard::registry::WidgetRegistry;
use crate::dashboard::string_list;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const LAYOUT_FILE: &str = "dashboard-settings.json";

/// On-disk shape of the layout. Edit mode and sync status are session-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedLayout {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl PersistedLayout {
    pub fn from_state(state: &LayoutState) -> Self {
        Self {
            order: state.order.clone(),
            hidden: state.hidden_ids(),
        }
    }

    /// Parse leniently. Fields that are missing or of the wrong type are
    /// treated as absent and non-string entries are skipped.
    pub fn parse(content: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(content).ok()?;
        let order = string_list(value.get("order"));
        let hidden = string_list(value.get("hidden"));
        if order.is_none() && hidden.is_none() {
            return None;
        }
        Some(Self {
            order: order.unwrap_or_default(),
            hidden: hidden.unwrap_or_default(),
        })
    }
}

/// Client-local record of the dashboard layout.
#[derive(Debug, Clone)]
pub struct LocalLayoutStore {
    path: PathBuf,
}

impl LocalLayoutStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve `base` to a layout file. Directories get the default file name.
    pub fn path_for(base: &str) -> PathBuf {
        let base = Path::new(base);
        if base.is_dir() {
            base.join(LAYOUT_FILE)
        } else {
            PathBuf::from(base)
        }
    }

    /// Platform data directory location, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs_next::data_local_dir()
            .map(|dir| dir.join("fond-intra").join(LAYOUT_FILE))
            .unwrap_or_else(|| PathBuf::from(LAYOUT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the layout. Never fails: unreadable or corrupted data yields the
    /// registry defaults and every restored id is filtered against `registry`.
    pub fn load(&self, registry: &WidgetRegistry) -> LayoutState {
        let content = std::fs::read_to_string(&self.path).unwrap_or_default();
        if content.trim().is_empty() {
            return LayoutState::new(registry);
        }
        let Some(persisted) = PersistedLayout::parse(&content) else {
            tracing::warn!(path = %self.path.display(), "ignoring unreadable dashboard layout");
            return LayoutState::new(registry);
        };
        let (state, warnings) =
            LayoutState::from_candidate(&persisted.order, &persisted.hidden, registry);
        for w in warnings {
            tracing::debug!("{w}");
        }
        state
    }

    /// Write the layout through a temporary sibling file.
    pub fn save(&self, state: &LayoutState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&PersistedLayout::from_state(state))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
