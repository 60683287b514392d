use geoprospect_analysis::StatusUpdate;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.blue} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Mirror the status of `run_id` onto the spinner until the run ends
pub fn follow_status(
    mut rx: watch::Receiver<StatusUpdate>,
    run_id: u64,
    spinner: ProgressBar,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let update = *rx.borrow_and_update();
            if update.run_id > run_id {
                break;
            }
            if update.run_id == run_id {
                spinner.set_message(update.status.label());
                if update.status.is_terminal() {
                    break;
                }
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Wait for a status follower; returns false if it panicked or was cancelled
pub async fn join_follower(follower: JoinHandle<()>, run_id: u64) -> bool {
    match follower.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(run_id, error = %e, "Status follower ended abnormally");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoprospect_core::models::AnalysisStatus;

    #[tokio::test]
    async fn test_follower_stops_on_terminal_status() {
        let (tx, rx) = watch::channel(StatusUpdate { run_id: 1, status: AnalysisStatus::Uploading });
        let follower = follow_status(rx, 1, ProgressBar::hidden());

        tx.send_replace(StatusUpdate { run_id: 1, status: AnalysisStatus::Complete });
        assert!(join_follower(follower, 1).await);
    }

    #[tokio::test]
    async fn test_cancelled_follower_is_reported() {
        let follower = tokio::spawn(std::future::pending::<()>());
        follower.abort();
        assert!(!join_follower(follower, 7).await);
    }
}
