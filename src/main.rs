use eframe::egui;
use fond_dashboard::dashboard::{
    DashboardEvent, DashboardStore, EventCallback, HttpSettingsApi, LocalLayoutStore,
    WidgetRegistry,
};
use fond_dashboard::gui::DashboardApp;
use fond_dashboard::logging;
use fond_dashboard::settings::Settings;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging, settings.log_file.as_ref().map(PathBuf::from));

    let api = HttpSettingsApi::new(
        &settings.api_base_url,
        settings.access_token.clone(),
        settings.request_timeout(),
    )?;
    tracing::info!(endpoint = %api.endpoint(), "dashboard settings endpoint");

    // Background loads and saves finish off the UI thread; wake the window
    // once it exists so the new layout is drawn.
    let egui_ctx: Arc<OnceCell<egui::Context>> = Arc::new(OnceCell::new());
    let repaint = egui_ctx.clone();
    let on_event: EventCallback = Arc::new(move |event: DashboardEvent| {
        tracing::debug!(?event, "dashboard event");
        if let Some(ctx) = repaint.get() {
            ctx.request_repaint();
        }
    });

    let store = DashboardStore::new(
        WidgetRegistry::with_defaults(),
        LocalLayoutStore::new(settings.layout_path()),
        Arc::new(api),
        Some(on_event),
    );
    store.load_from_server();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Fond Intra")
            .with_inner_size([720.0, 560.0])
            .with_min_inner_size([360.0, 240.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Fond Intra",
        native_options,
        Box::new(move |cc| {
            let _ = egui_ctx.set(cc.egui_ctx.clone());
            Box::new(DashboardApp::new(store))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
