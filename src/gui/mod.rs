mod dashboard_panel;

pub use dashboard_panel::{apply_actions, DashboardPanel, PanelAction};

use crate::dashboard::DashboardStore;
use eframe::egui;

/// Native window hosting the dashboard.
pub struct DashboardApp {
    store: DashboardStore,
    panel: DashboardPanel,
}

impl DashboardApp {
    pub fn new(store: DashboardStore) -> Self {
        Self {
            store,
            panel: DashboardPanel::default(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let actions = self.panel.ui(ui, &self.store);
            apply_actions(&self.store, actions);
        });
    }
}
