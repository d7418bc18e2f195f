//! Main application entry point

use anyhow::Result;
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wd_data::DashboardConfig;

mod app;

use app::DashboardApp;

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "info,wd_core=debug,wd_data=debug,wd_views=debug";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_tracing();

    let config = DashboardConfig::discover().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {}", e);
        DashboardConfig::default()
    });
    info!("Starting wing disc dashboard with data from {}", config.data_dir.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("wingdisc-loader")
        .build()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([900.0, 600.0]),
        default_theme: if config.dark_mode { eframe::Theme::Dark } else { eframe::Theme::Light },
        ..Default::default()
    };

    eframe::run_native(
        "Wing Disc Morphometrics",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
