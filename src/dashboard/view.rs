use crate::dashboard::layout::LayoutState;
use crate::dashboard::registry::WidgetRegistry;

/// A widget as the dashboard page renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedWidget {
    pub id: String,
    pub display_name: String,
    pub visible: bool,
}

/// Pair every id in the layout order with its display name and visibility.
///
/// Ids the registry does not know (only reachable through an unvalidated
/// reorder) are skipped.
pub fn ordered_widgets(state: &LayoutState, registry: &WidgetRegistry) -> Vec<OrderedWidget> {
    state
        .order
        .iter()
        .filter_map(|id| {
            let descriptor = registry.get(id)?;
            Some(OrderedWidget {
                id: id.clone(),
                display_name: descriptor.display_name.clone(),
                visible: !state.is_hidden(id),
            })
        })
        .collect()
}

/// Widgets that get drawn: everything in edit mode, only visible ones otherwise.
pub fn rendered_widgets(widgets: Vec<OrderedWidget>, edit_mode: bool) -> Vec<OrderedWidget> {
    if edit_mode {
        widgets
    } else {
        widgets.into_iter().filter(|w| w.visible).collect()
    }
}
