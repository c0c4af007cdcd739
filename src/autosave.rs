use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::document::{self, SharedDocument};
use crate::error::DocumentError;

#[derive(Debug)]
pub enum TickOutcome {
    NoFile,
    Saved(PathBuf),
    Failed(DocumentError),
}

/// One auto-save pass. Only writes when the document already has a file;
/// never picks one.
pub fn tick(shared: &SharedDocument) -> TickOutcome {
    // Snapshot under the lock, write after releasing it.
    let snapshot = shared.lock().snapshot();
    let Some((path, text)) = snapshot else {
        return TickOutcome::NoFile;
    };
    match document::write_file(&path, &text) {
        Ok(()) => {
            info!(target: "autosave", path = %path.display(), "auto-saved");
            TickOutcome::Saved(path)
        }
        Err(e) => {
            error!(target: "autosave", path = %path.display(), error = %e, "auto-save failed");
            TickOutcome::Failed(e)
        }
    }
}

/// Spawns the periodic ticker. The first pass runs one `period` after the
/// call; late ticks are skipped rather than bunched up.
pub fn spawn(
    runtime: &tokio::runtime::Handle,
    shared: SharedDocument,
    period: Duration,
) -> JoinHandle<()> {
    runtime.spawn(run(shared, period))
}

async fn run(shared: SharedDocument, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        tick(&shared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn tick_without_file_is_a_noop() {
        let shared = SharedDocument::default();
        shared.lock().buffer.insert_str("unsaved");
        assert!(matches!(tick(&shared), TickOutcome::NoFile));
        assert!(shared.lock().file.is_none());
    }

    #[test]
    fn tick_writes_current_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc").unwrap();

        let mut document = Document::new();
        document.replace(path.clone(), "abc");
        document.buffer.insert_str("def");
        let shared = SharedDocument::new(document);

        assert!(matches!(tick(&shared), TickOutcome::Saved(p) if p == path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdef");
    }

    #[test]
    fn tick_failure_keeps_file_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing/a.txt");
        let mut document = Document::new();
        document.replace(path.clone(), "text");
        let shared = SharedDocument::new(document);

        assert!(matches!(tick(&shared), TickOutcome::Failed(DocumentError::Save { .. })));
        assert_eq!(shared.lock().file.as_deref(), Some(path.as_path()));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_waits_one_period_then_repeats() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc").unwrap();

        let mut document = Document::new();
        document.replace(path.clone(), "abc");
        document.buffer.insert_str("def");
        let shared = SharedDocument::new(document);

        let handle = tokio::spawn(run(shared.clone(), Duration::from_secs(5)));

        time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc");

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdef");

        shared.lock().buffer.insert_str("!");
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdef!");

        handle.abort();
    }
}
