use std::collections::HashMap;

/// Static description of a dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub id: String,
    pub display_name: String,
}

impl WidgetDescriptor {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

const DEFAULT_WIDGETS: &[(&str, &str)] = &[
    ("stats", "Statistics"),
    ("birthdays", "Birthdays"),
    ("news", "Latest news"),
    ("achievements", "Recent achievements"),
    ("leaderboard", "Top 3 leaders"),
    ("kudos", "Kudos"),
    ("okr", "My goals (OKR)"),
    ("bookings", "My bookings"),
    ("ideas", "Top ideas"),
    ("viewHistory", "Recently viewed"),
];

/// Ordered set of widgets the dashboard knows how to render.
///
/// The registry never changes after construction. Any id that is not a member
/// is treated as unknown and filtered out wherever it shows up in persisted or
/// server-provided layouts.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: Vec<WidgetDescriptor>,
    index: HashMap<String, usize>,
}

impl WidgetRegistry {
    /// Build a registry from `descriptors`. Later duplicates of an id are
    /// ignored so the first declaration wins.
    pub fn new(descriptors: impl IntoIterator<Item = WidgetDescriptor>) -> Self {
        let mut reg = Self::default();
        for descriptor in descriptors {
            if reg.index.contains_key(&descriptor.id) {
                tracing::warn!(widget = %descriptor.id, "duplicate widget id ignored");
                continue;
            }
            reg.index.insert(descriptor.id.clone(), reg.widgets.len());
            reg.widgets.push(descriptor);
        }
        reg
    }

    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_WIDGETS
                .iter()
                .map(|(id, name)| WidgetDescriptor::new(id, name)),
        )
    }

    pub fn get(&self, id: &str) -> Option<&WidgetDescriptor> {
        self.index.get(id).map(|&i| &self.widgets[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetDescriptor> {
        self.widgets.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().map(|w| w.id.as_str())
    }

    /// Registry order, used for fresh layouts and resets.
    pub fn default_order(&self) -> Vec<String> {
        self.ids().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
