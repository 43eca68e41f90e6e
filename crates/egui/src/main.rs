mod app;
mod commands;
mod events;
mod views;

use anyhow::Context as _;
use eframe::egui;
use remote_core::Config;

use crate::app::RemoteApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    // Background tasks are spawned from UI callbacks, so the runtime must be
    // entered on the UI thread for the lifetime of the window.
    let _guard = runtime.enter();

    let config = Config::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DAW Remote",
        options,
        Box::new(|cc| Ok(Box::new(RemoteApp::new(cc.egui_ctx.clone(), config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run UI: {e}"))
}
