// Draft board entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load players and imported ranks
// 4. Load the watchlist/notes store
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use draftboard::app;
use draftboard::store::{Store, StoreData};
use draftboard::tui;
use draftboard_core::config;
use draftboard_core::players::loader;
use draftboard_core::players::ImportedRanks;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Draft board starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: players={}, sort={:?}, page size {}",
        config.data_paths.players, config.board.default_sort.field, config.board.page_size
    );

    // 3. Load players and imported ranks
    let players = loader::load_players(Path::new(&config.data_paths.players))
        .context("failed to load players")?;
    let ranks = match &config.data_paths.imported_ranks {
        Some(path) => loader::load_imported_ranks(Path::new(path)).unwrap_or_else(|e| {
            warn!("Imported ranks unavailable, value vs ADP disabled: {}", e);
            ImportedRanks::new()
        }),
        None => ImportedRanks::new(),
    };

    // 4. Load the watchlist/notes store
    let store = Store::new(config.data_paths.resolved_store_path());
    let data = store.load().unwrap_or_else(|e| {
        warn!("Failed to read store, starting empty: {}", e);
        StoreData::default()
    });
    let app_state = app::AppState::new(Some(store), data);

    // 5. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI (blocks until the user quits)
    let view_state = tui::ViewState::new(Arc::new(players), Arc::new(ranks), config.board);
    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Draft board shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftboard=info,draftboard_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
