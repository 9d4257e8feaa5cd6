//! ollamaps tray entry point.

#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]
#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod config;
mod presenter;

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use ollamaps_icon::IconRenderer;
    use ollamaps_tray::{TrayConfig, TrayHandle};
    use tokio_util::sync::CancellationToken;
    use tracing_subscriber::EnvFilter;

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting ollamaps tray");

    let config = config::Config::load();
    let renderer = IconRenderer::load(config.font_path.as_deref());

    let tray_config = TrayConfig {
        tooltip: presenter::LOADING_TOOLTIP.into(),
        icon: presenter::icon_for(&renderer, 0),
        ..TrayConfig::default()
    };
    let (handle, event_tx, update_rx) = TrayHandle::new();
    let cancel = CancellationToken::new();

    let rt = tokio::runtime::Runtime::new()?;
    let core = rt.spawn(app::run(config, handle, renderer, cancel.clone()));

    // The tray icon is !Send and lives on the main thread until quit.
    let tray_result = ollamaps_tray::run_event_loop(tray_config, event_tx, update_rx);

    cancel.cancel();
    rt.block_on(core)??;
    tray_result?;

    tracing::info!("tray shut down cleanly");
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    println!("Windows only.");
    std::process::exit(1);
}
