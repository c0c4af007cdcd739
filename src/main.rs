use std::error::Error;
use tracing::info;

mod autosave;
mod buffer;
mod config;
mod document;
mod editor;
mod error;
mod logging;
mod menu;
mod picker;
mod status;
mod theme;

use config::Config;
use document::{Document, SharedDocument};
use editor::Editor;

fn main() -> Result<(), Box<dyn Error>> {
    // Held until exit so buffered log lines get flushed.
    let _log_guard = logging::init();
    logging::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = Config::load();

    // The ticker runs on its own thread, independent of the UI loop below.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("autosave")
        .enable_time()
        .build()?;

    let document = SharedDocument::new(Document::new());
    autosave::spawn(runtime.handle(), document.clone(), config.autosave_interval());

    let mut editor = Editor::new(document)?;
    let result = editor.run();

    // Exit does not wait for, or trigger, a final auto-save.
    runtime.shutdown_background();
    info!(target: "runtime", "shutdown");

    result?;
    Ok(())
}
