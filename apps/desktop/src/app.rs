//! Application orchestrator: wires the poller, renderer and tray together.

use std::sync::Arc;
use std::time::Duration;

use ollamaps_icon::IconRenderer;
use ollamaps_status::Poller;
use ollamaps_tray::{TrayEvent, TrayHandle};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::presenter::{self, ModelSource, Presenter, PresenterState};

/// How often the core checks for tray menu events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the tray core until quit is selected or `cancel` fires.
pub async fn run(
    config: Config,
    handle: TrayHandle,
    renderer: IconRenderer,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let source = ModelSource::new(
        Poller::new(config.command.clone(), config.timeout()),
        config.columns,
    );
    let updater = handle.updater();

    let presenter = Presenter::new(source.clone(), renderer, updater.clone());
    let refresh = tokio::spawn(refresh_loop(presenter, config.interval(), cancel.clone()));

    tracing::info!(
        command = %config.command,
        interval_secs = config.interval().as_secs(),
        "tray core ready"
    );

    let source = Arc::new(source);
    let events = {
        let updater = updater.clone();
        let popup_limit = config.popup_limit;
        async move {
            loop {
                let event = handle.try_recv_event();
                match event {
                    Some(TrayEvent::ShowModelsRequested) => {
                        let source = Arc::clone(&source);
                        let updater = updater.clone();
                        // Independent of the periodic cycle; the two polls may overlap.
                        tokio::spawn(async move {
                            presenter::show_models(&source, &updater, popup_limit).await;
                        });
                    }
                    Some(TrayEvent::QuitRequested) => break,
                    None => tokio::time::sleep(EVENT_POLL_INTERVAL).await,
                }
            }
        }
    };

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
        _ = events => {
            tracing::info!("quit requested via tray");
        }
    }

    cancel.cancel();
    let state = refresh.await?;
    tracing::debug!(?state, "refresh loop finished");

    updater.shutdown();
    Ok(())
}

/// Refreshes the tray every `interval` until cancelled.
///
/// Cycles never overlap: the sleep starts after a cycle completes.
pub async fn refresh_loop(
    mut presenter: Presenter,
    interval: Duration,
    cancel: CancellationToken,
) -> PresenterState {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            count = presenter.refresh() => {
                if count.is_none() {
                    tracing::debug!("tray closed, stopping refresh loop");
                    break;
                }
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    presenter.stop();
    presenter.state()
}

#[cfg(all(test, unix))]
mod tests {
    use ollamaps_status::ColumnMap;
    use ollamaps_tray::TrayUpdate;

    use super::*;

    fn presenter(command: &str, handle: &TrayHandle) -> Presenter {
        Presenter::new(
            ModelSource::new(
                Poller::new(command, Duration::from_secs(5)),
                ColumnMap::default(),
            ),
            IconRenderer::builtin(),
            handle.updater(),
        )
    }

    #[tokio::test]
    async fn refresh_loop_stops_on_cancel() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(refresh_loop(
            presenter("echo NAME; echo 'a b c d e'; echo 'f g h i j'", &handle),
            Duration::from_millis(20),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();

        let state = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state, PresenterState::Stopped);

        let tooltips: Vec<String> = update_rx
            .try_iter()
            .filter_map(|u| match u {
                TrayUpdate::Refresh { tooltip, .. } => Some(tooltip),
                _ => None,
            })
            .collect();
        assert!(tooltips.len() >= 2);
        assert!(tooltips.iter().all(|t| t == "Model(s) loaded: 2"));
    }

    #[tokio::test]
    async fn refresh_loop_cancels_hung_poll() {
        let (handle, _event_tx, _update_rx) = TrayHandle::new();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(refresh_loop(
            presenter("sleep 5", &handle),
            Duration::from_secs(1),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        let state = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state, PresenterState::Stopped);
    }

    #[tokio::test]
    async fn refresh_loop_stops_when_tray_closes() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        drop(update_rx);
        let state = tokio::time::timeout(
            Duration::from_secs(2),
            refresh_loop(
                presenter("echo x", &handle),
                Duration::from_millis(10),
                CancellationToken::new(),
            ),
        )
        .await
        .unwrap();
        assert_eq!(state, PresenterState::Stopped);
    }

    #[tokio::test]
    async fn run_handles_show_models_then_quit() {
        let (handle, event_tx, update_rx) = TrayHandle::new();
        let config = Config {
            command: "echo HEADER; echo 'llama3 id 4.1 GB 100%'".into(),
            ..Config::default()
        };
        let cancel = CancellationToken::new();
        let app = tokio::spawn(run(config, handle, IconRenderer::builtin(), cancel.clone()));

        event_tx.send(TrayEvent::ShowModelsRequested).unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        event_tx.send(TrayEvent::QuitRequested).unwrap();

        tokio::time::timeout(Duration::from_secs(3), app)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(cancel.is_cancelled());

        let updates: Vec<TrayUpdate> = update_rx.try_iter().collect();
        assert!(updates.iter().any(|u| matches!(
            u,
            TrayUpdate::Notify { body, .. } if body == "HEADER\nllama3 (Mem: 4.1, CPU: 100%)"
        )));
        assert!(updates.iter().any(|u| matches!(
            u,
            TrayUpdate::Refresh { tooltip, .. } if tooltip == "Model(s) loaded: 1"
        )));
        assert!(matches!(updates.last(), Some(TrayUpdate::Shutdown)));
    }

    #[tokio::test]
    async fn run_stops_on_external_cancel() {
        let (handle, _event_tx, _update_rx) = TrayHandle::new();
        let cancel = CancellationToken::new();
        let app = tokio::spawn(run(
            Config {
                command: "echo x".into(),
                ..Config::default()
            },
            handle,
            IconRenderer::builtin(),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(3), app)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
