pub mod layout;
pub mod persistence;
pub mod registry;
pub mod store;
pub mod sync;
pub mod view;

pub use layout::{LayoutState, SyncState};
pub use persistence::LocalLayoutStore;
pub use registry::{WidgetDescriptor, WidgetRegistry};
pub use store::{DashboardEvent, DashboardStore, EventCallback};
pub use sync::{HttpSettingsApi, RemoteSettings, SettingsApi};
pub use view::OrderedWidget;

use serde_json::Value;

/// Read a JSON array of strings. Anything that is not an array counts as
/// absent; non-string entries are skipped.
pub(crate) fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}
