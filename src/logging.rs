use std::path::PathBuf;
use std::sync::Once;

use crossterm::terminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::editor::restore_screen;

const LOG_FILE: &str = "smart-notepad.log";

fn log_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut dir) => {
            dir.push("smart-notepad");
            dir
        }
        None => PathBuf::from("."),
    }
}

/// Routes tracing output to a log file; the terminal belongs to the UI.
/// The returned guard flushes pending records when dropped.
pub fn init() -> Option<WorkerGuard> {
    let mut dir = log_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        dir = PathBuf::from(".");
    }
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

/// Restores the terminal before the default hook prints the panic.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_screen(&mut std::io::stdout());
            let _ = terminal::disable_raw_mode();
            tracing::error!(target: "runtime.panic", %info, "panic");
            default_panic(info);
        }));
    });
}
