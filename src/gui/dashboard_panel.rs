use crate::dashboard::view::{rendered_widgets, OrderedWidget};
use crate::dashboard::{DashboardStore, SyncState};
use eframe::egui;

/// User intent collected while drawing a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    EnterEditMode,
    FinishEditing,
    ResetLayout,
    ToggleVisibility(String),
    Move { from: String, to: String },
}

/// Draws the dashboard and its edit-mode controls.
#[derive(Default)]
pub struct DashboardPanel {
    /// Widget ids drawn during the last frame, in order.
    pub rendered: Vec<String>,
}

impl DashboardPanel {
    pub fn ui(&mut self, ui: &mut egui::Ui, store: &DashboardStore) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        let edit_mode = store.is_edit_mode();

        ui.horizontal(|ui| {
            ui.heading("Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if edit_mode {
                    if ui.button("Done").clicked() {
                        actions.push(PanelAction::FinishEditing);
                    }
                    if ui.button("Reset").clicked() {
                        actions.push(PanelAction::ResetLayout);
                    }
                } else if ui.button("Customize").clicked() {
                    actions.push(PanelAction::EnterEditMode);
                }
                sync_status(ui, store);
            });
        });

        if edit_mode {
            ui.label(
                egui::RichText::new(
                    "Use the arrows to reorder widgets and the eye toggle to hide or show them.",
                )
                .small(),
            );
        }
        ui.separator();

        let widgets = rendered_widgets(store.ordered_widgets(), edit_mode);
        self.rendered = widgets.iter().map(|w| w.id.clone()).collect();

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (idx, widget) in widgets.iter().enumerate() {
                    let prev = idx.checked_sub(1).and_then(|i| widgets.get(i));
                    let next = widgets.get(idx + 1);
                    widget_tile(ui, widget, edit_mode, prev, next, &mut actions);
                }
            });

        actions
    }
}

fn sync_status(ui: &mut egui::Ui, store: &DashboardStore) {
    if store.is_loading() {
        ui.spinner();
        return;
    }
    let text = match store.sync_state() {
        SyncState::Synced => "synced",
        SyncState::NotLoaded | SyncState::LoadFailed => "local only",
    };
    ui.label(egui::RichText::new(text).weak());
}

fn widget_tile(
    ui: &mut egui::Ui,
    widget: &OrderedWidget,
    edit_mode: bool,
    prev: Option<&OrderedWidget>,
    next: Option<&OrderedWidget>,
    actions: &mut Vec<PanelAction>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            let mut title = egui::RichText::new(&widget.display_name).strong();
            if !widget.visible {
                title = title.weak();
            }
            ui.label(title);
            if !edit_mode {
                return;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let eye = if widget.visible { "Hide" } else { "Show" };
                if ui.small_button(eye).clicked() {
                    actions.push(PanelAction::ToggleVisibility(widget.id.clone()));
                }
                if ui
                    .add_enabled(next.is_some(), egui::Button::new("⬇").small())
                    .clicked()
                {
                    if let Some(next) = next {
                        actions.push(PanelAction::Move {
                            from: widget.id.clone(),
                            to: next.id.clone(),
                        });
                    }
                }
                if ui
                    .add_enabled(prev.is_some(), egui::Button::new("⬆").small())
                    .clicked()
                {
                    if let Some(prev) = prev {
                        actions.push(PanelAction::Move {
                            from: widget.id.clone(),
                            to: prev.id.clone(),
                        });
                    }
                }
            });
        });
        let body = egui::RichText::new(format!("{} widget", widget.id)).weak();
        ui.label(if widget.visible { body } else { body.italics() });
    });
}

/// Apply collected actions to the store in order.
pub fn apply_actions(store: &DashboardStore, actions: Vec<PanelAction>) {
    for action in actions {
        tracing::debug!(?action, "dashboard action");
        match action {
            PanelAction::EnterEditMode => {
                store.set_edit_mode(true);
            }
            PanelAction::FinishEditing => {
                store.set_edit_mode(false);
            }
            PanelAction::ResetLayout => store.reset_to_default(),
            PanelAction::ToggleVisibility(id) => store.toggle_visibility(&id),
            PanelAction::Move { from, to } => store.move_widget(&from, &to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::sync::{DashboardSettingsPayload, RemoteSettings, SettingsApi};
    use crate::dashboard::{LocalLayoutStore, WidgetRegistry};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct OfflineApi;

    impl SettingsApi for OfflineApi {
        fn fetch(&self) -> anyhow::Result<RemoteSettings> {
            anyhow::bail!("offline")
        }

        fn update(&self, _payload: &DashboardSettingsPayload) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
    }

    fn new_store() -> (TempDir, DashboardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DashboardStore::new(
            WidgetRegistry::with_defaults(),
            LocalLayoutStore::new(dir.path().join("layout.json")),
            Arc::new(OfflineApi),
            None,
        );
        (dir, store)
    }

    fn render(panel: &mut DashboardPanel, store: &DashboardStore) -> Vec<PanelAction> {
        let ctx = egui::Context::default();
        let mut actions = Vec::new();
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                actions = panel.ui(ui, store);
            });
        });
        actions
    }

    #[test]
    fn hidden_widgets_omitted_outside_edit_mode() {
        let (_dir, store) = new_store();
        store.toggle_visibility("news");
        let mut panel = DashboardPanel::default();
        let actions = render(&mut panel, &store);
        assert!(actions.is_empty());
        assert!(!panel.rendered.contains(&"news".to_string()));
        assert_eq!(panel.rendered.len(), store.registry().len() - 1);
    }

    #[test]
    fn hidden_widgets_shown_in_edit_mode() {
        let (_dir, store) = new_store();
        store.toggle_visibility("news");
        store.set_edit_mode(true);
        let mut panel = DashboardPanel::default();
        render(&mut panel, &store);
        assert_eq!(panel.rendered, store.order());
    }

    #[test]
    fn actions_drive_the_store() {
        let (_dir, store) = new_store();
        apply_actions(
            &store,
            vec![
                PanelAction::EnterEditMode,
                PanelAction::Move {
                    from: "birthdays".into(),
                    to: "stats".into(),
                },
                PanelAction::ToggleVisibility("ideas".into()),
            ],
        );
        assert!(store.is_edit_mode());
        assert_eq!(&store.order()[..2], &["birthdays".to_string(), "stats".to_string()]);
        assert_eq!(store.hidden(), vec!["ideas".to_string()]);

        apply_actions(&store, vec![PanelAction::ResetLayout, PanelAction::FinishEditing]);
        assert!(!store.is_edit_mode());
        assert_eq!(store.order(), store.registry().default_order());
        assert!(store.hidden().is_empty());
    }
}
