//! Tray presentation: turns status polls into icon, tooltip and popup text.

use ollamaps_icon::{ICON_SIZE, IconRenderer};
use ollamaps_status::{ColumnMap, Poller, parse_with};
use ollamaps_tray::{IconImage, TrayUpdater};

/// Tooltip shown before the first poll completes.
pub const LOADING_TOOLTIP: &str = "Loading...";

/// Title of the models popup.
pub const POPUP_TITLE: &str = "Ollama model(s)";

/// Popup body when the poll produced nothing.
pub const POPUP_EMPTY: &str = "Model(s) not found or error.";

/// Appended to popup text cut at the character limit.
pub const POPUP_ELLIPSIS: &str = "\n...";

/// Lifecycle of the tray presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    /// Before the first poll completes.
    Loading,
    /// The icon reflects the last poll.
    Idle,
    /// Quit was requested; no further refreshes.
    Stopped,
}

/// Polls the status command and parses its output.
#[derive(Debug, Clone)]
pub struct ModelSource {
    poller: Poller,
    columns: ColumnMap,
}

impl ModelSource {
    pub fn new(poller: Poller, columns: ColumnMap) -> Self {
        Self { poller, columns }
    }

    /// Runs one poll and returns the summary lines.
    pub async fn summaries(&self) -> Vec<String> {
        parse_with(&self.poller.poll().await, &self.columns)
    }
}

/// Displayed model count. The status output carries a header row, so one
/// line is subtracted; an empty or failed poll shows `-1`.
pub fn loaded_count(summaries: &[String]) -> i64 {
    summaries.len() as i64 - 1
}

pub fn tooltip(count: i64) -> String {
    format!("Model(s) loaded: {count}")
}

/// Joins summaries one per line, keeping at most `limit` characters.
pub fn popup_text(summaries: &[String], limit: usize) -> String {
    if summaries.is_empty() {
        return POPUP_EMPTY.to_string();
    }

    let joined = summaries.join("\n");
    match joined.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{POPUP_ELLIPSIS}", &joined[..cut]),
        None => joined,
    }
}

/// Renders `count` into an icon for the tray.
pub fn icon_for(renderer: &IconRenderer, count: i64) -> Option<IconImage> {
    let image = renderer.render(count);
    match IconImage::from_rgba(image.into_raw(), ICON_SIZE, ICON_SIZE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(count, "failed to build tray icon: {e}");
            None
        }
    }
}

/// Polls for "Show models" and hands the popup to the tray.
pub async fn show_models(source: &ModelSource, updater: &TrayUpdater, limit: usize) {
    let summaries = source.summaries().await;
    tracing::debug!(lines = summaries.len(), "showing models popup");
    updater.notify(POPUP_TITLE, popup_text(&summaries, limit));
}

/// Owns the periodic refresh: poll, parse, render, update.
pub struct Presenter {
    source: ModelSource,
    renderer: IconRenderer,
    updater: TrayUpdater,
    state: PresenterState,
}

impl Presenter {
    pub fn new(source: ModelSource, renderer: IconRenderer, updater: TrayUpdater) -> Self {
        Self {
            source,
            renderer,
            updater,
            state: PresenterState::Loading,
        }
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    /// Runs one refresh cycle and returns the displayed count.
    ///
    /// Returns `None` once the tray has gone away.
    pub async fn refresh(&mut self) -> Option<i64> {
        let summaries = self.source.summaries().await;
        let count = loaded_count(&summaries);

        if self.state == PresenterState::Loading {
            tracing::info!(count, "first status poll complete");
            self.state = PresenterState::Idle;
        }

        let icon = icon_for(&self.renderer, count);
        self.publish(count, icon)
    }

    /// Sends the tooltip for `count`, and `icon` when it rendered.
    fn publish(&self, count: i64, icon: Option<IconImage>) -> Option<i64> {
        if !self.updater.refresh(icon, tooltip(count)) {
            return None;
        }

        tracing::debug!(count, "tray refreshed");
        Some(count)
    }

    /// Marks the presenter as stopped.
    pub fn stop(&mut self) {
        self.state = PresenterState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ollamaps_tray::{TrayHandle, TrayUpdate};

    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn count_subtracts_header_row() {
        assert_eq!(loaded_count(&[]), -1);
        assert_eq!(loaded_count(&lines(&["NAME ID SIZE"])), 0);
        assert_eq!(loaded_count(&lines(&["header", "a", "b"])), 2);
    }

    #[test]
    fn tooltip_format() {
        assert_eq!(tooltip(3), "Model(s) loaded: 3");
        assert_eq!(tooltip(-1), "Model(s) loaded: -1");
    }

    #[test]
    fn popup_empty_message() {
        assert_eq!(popup_text(&[], 1000), "Model(s) not found or error.");
    }

    #[test]
    fn popup_joins_with_newlines() {
        let text = popup_text(&lines(&["a (Mem: 1, CPU: 2)", "b"]), 1000);
        assert_eq!(text, "a (Mem: 1, CPU: 2)\nb");
    }

    #[test]
    fn popup_at_limit_is_untouched() {
        let exact = "x".repeat(1000);
        assert_eq!(popup_text(&[exact.clone()], 1000), exact);
    }

    #[test]
    fn popup_over_limit_is_truncated() {
        let long = vec!["y".repeat(600), "z".repeat(600)];
        let text = popup_text(&long, 1000);
        let joined = long.join("\n");
        assert_eq!(text, format!("{}\n...", &joined[..1000]));
        assert_eq!(text.chars().count(), 1004);
    }

    #[test]
    fn popup_truncation_counts_characters() {
        let wide = "модель".repeat(200);
        let text = popup_text(&[wide.clone()], 1000);
        let expected: String = wide.chars().take(1000).collect();
        assert_eq!(text, format!("{expected}\n..."));
    }

    #[test]
    fn icon_is_full_size() {
        let icon = icon_for(&IconRenderer::builtin(), 0).unwrap();
        assert_eq!((icon.width, icon.height), (64, 64));
        assert_eq!(icon.rgba.len(), 64 * 64 * 4);
    }

    #[cfg(unix)]
    fn source(command: &str) -> ModelSource {
        ModelSource::new(
            Poller::new(command, Duration::from_secs(5)),
            ColumnMap::default(),
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn refresh_updates_icon_and_tooltip() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        let mut presenter = Presenter::new(
            source("echo 'NAME ID SIZE PROCESSOR UNTIL'; echo 'llama3 abc 4.1 GB 100% GPU'"),
            IconRenderer::builtin(),
            handle.updater(),
        );
        assert_eq!(presenter.state(), PresenterState::Loading);

        assert_eq!(presenter.refresh().await, Some(1));
        assert_eq!(presenter.state(), PresenterState::Idle);

        match update_rx.try_recv().unwrap() {
            TrayUpdate::Refresh { icon, tooltip } => {
                assert_eq!(tooltip, "Model(s) loaded: 1");
                assert_eq!(icon.map(|i| i.width), Some(64));
            }
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_poll_shows_minus_one() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        let mut presenter =
            Presenter::new(source("exit 1"), IconRenderer::builtin(), handle.updater());

        assert_eq!(presenter.refresh().await, Some(-1));
        assert!(matches!(
            update_rx.try_recv().unwrap(),
            TrayUpdate::Refresh { ref tooltip, .. } if tooltip == "Model(s) loaded: -1"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn refresh_reports_closed_tray() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        drop(update_rx);
        let mut presenter = Presenter::new(source("echo x"), IconRenderer::builtin(), handle.updater());
        assert_eq!(presenter.refresh().await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn show_models_sends_popup() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        let source = source("echo 'modelA 1GB 0% cpu 12%'; echo 'modelB 2GB 0% cpu 5%'");

        show_models(&source, &handle.updater(), 1000).await;

        match update_rx.try_recv().unwrap() {
            TrayUpdate::Notify { title, body } => {
                assert_eq!(title, "Ollama model(s)");
                assert_eq!(body, "modelA (Mem: 0%, CPU: 12%)\nmodelB (Mem: 0%, CPU: 5%)");
            }
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn show_models_on_error() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        show_models(&source("exit 2"), &handle.updater(), 1000).await;

        assert!(matches!(
            update_rx.try_recv().unwrap(),
            TrayUpdate::Notify { ref body, .. } if body == "Model(s) not found or error."
        ));
    }

    #[test]
    fn missing_icon_still_updates_tooltip() {
        let (handle, _event_tx, update_rx) = TrayHandle::new();
        let presenter = Presenter::new(
            ModelSource::new(Poller::default(), ColumnMap::default()),
            IconRenderer::builtin(),
            handle.updater(),
        );

        assert_eq!(presenter.publish(4, None), Some(4));
        assert!(matches!(
            update_rx.try_recv().unwrap(),
            TrayUpdate::Refresh { icon: None, ref tooltip } if tooltip == "Model(s) loaded: 4"
        ));
    }

    #[test]
    fn stop_is_terminal() {
        let (handle, _event_tx, _update_rx) = TrayHandle::new();
        let mut presenter = Presenter::new(
            ModelSource::new(Poller::default(), ColumnMap::default()),
            IconRenderer::builtin(),
            handle.updater(),
        );
        presenter.stop();
        assert_eq!(presenter.state(), PresenterState::Stopped);
    }
}
