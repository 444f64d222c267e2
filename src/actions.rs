use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;

/// Placeholder latencies for backend calls that do not exist yet. Real
/// archive/OAuth calls will replace the sleeps; the completion contract
/// (one event per started action, busy flag cleared on every path) stays.
pub const DOWNLOAD_DELAY: Duration = Duration::from_secs(1);
pub const REFRESH_DELAY: Duration = Duration::from_secs(2);
pub const REFRESH_ALL_DELAY: Duration = Duration::from_secs(3);

/// Completion events sent back to the draw loop by simulated actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    DownloadFinished { id: u32 },
    RefreshFinished { service_id: String },
    RefreshAllFinished,
}

pub fn spawn_download(tx: mpsc::Sender<Completion>, id: u32, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Completion::DownloadFinished { id }).await;
    });
}

pub fn spawn_refresh(tx: mpsc::Sender<Completion>, service_id: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Completion::RefreshFinished { service_id }).await;
    });
}

pub fn spawn_refresh_all(tx: mpsc::Sender<Completion>, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Completion::RefreshAllFinished).await;
    });
}

/// Hand a URL to the platform opener (browser for https links).
pub fn open_url(url: &str) -> Result<()> {
    tracing::info!(url, "opening external link");
    open::that(url).with_context(|| format!("Failed to open {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mock_attachments;
    use crate::ui::{AttachmentState, OauthState};

    const TICK: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn test_download_completion_carries_id() {
        let (tx, mut rx) = mpsc::channel(8);
        spawn_download(tx, 3, TICK);
        assert_eq!(rx.recv().await, Some(Completion::DownloadFinished { id: 3 }));
    }

    #[tokio::test]
    async fn test_download_busy_flag_true_only_between_start_and_completion() {
        let mut state = AttachmentState::new(mock_attachments());
        let (tx, mut rx) = mpsc::channel(8);

        assert!(!state.is_downloading(1));
        assert!(state.begin_download(1));
        spawn_download(tx, 1, TICK);
        assert!(state.is_downloading(1));

        let Some(Completion::DownloadFinished { id }) = rx.recv().await else {
            panic!("expected download completion");
        };
        state.finish_download(id);
        assert!(!state.is_downloading(1));
    }

    #[tokio::test]
    async fn test_concurrent_downloads_tracked_independently() {
        let mut state = AttachmentState::new(mock_attachments());
        let (tx, mut rx) = mpsc::channel(8);

        assert!(state.begin_download(1));
        assert!(state.begin_download(2));
        spawn_download(tx.clone(), 1, TICK);
        spawn_download(tx, 2, Duration::from_millis(30));

        let Some(Completion::DownloadFinished { id }) = rx.recv().await else {
            panic!("expected download completion");
        };
        state.finish_download(id);
        assert!(!state.is_downloading(1));
        assert!(state.is_downloading(2));

        let Some(Completion::DownloadFinished { id }) = rx.recv().await else {
            panic!("expected download completion");
        };
        state.finish_download(id);
        assert!(!state.is_downloading(2));
    }

    #[tokio::test]
    async fn test_refresh_one_service_leaves_other_idle() {
        let mut state = OauthState::new(crate::models::mock_oauth_services());
        let (tx, mut rx) = mpsc::channel(8);

        assert!(state.begin_refresh("gmail"));
        spawn_refresh(tx, "gmail".to_string(), TICK);
        assert!(state.is_refreshing("gmail"));
        assert!(!state.is_refreshing("drive"));

        let Some(Completion::RefreshFinished { service_id }) = rx.recv().await else {
            panic!("expected refresh completion");
        };
        state.finish_refresh(&service_id);
        assert!(!state.is_refreshing("gmail"));
        assert!(!state.is_refreshing("drive"));
    }

    #[tokio::test]
    async fn test_refresh_all_sets_and_clears_every_service() {
        let mut state = OauthState::new(crate::models::mock_oauth_services());
        let (tx, mut rx) = mpsc::channel(8);

        assert!(state.begin_refresh_all());
        spawn_refresh_all(tx, TICK);
        assert!(state.refresh_all_in_flight);
        assert!(state.is_refreshing("gmail"));
        assert!(state.is_refreshing("drive"));

        assert_eq!(rx.recv().await, Some(Completion::RefreshAllFinished));
        state.finish_refresh_all();
        assert!(!state.refresh_all_in_flight);
        assert!(!state.is_refreshing("gmail"));
        assert!(!state.is_refreshing("drive"));
    }
}
