//! `itemsvc` entry point.
//!
//! Startup order: logging (best effort), store (fatal on failure),
//! listener (fatal on failure), then serve until Ctrl-C.

use itemsvc_core::{core_version, init_logging, SqliteItemRepository};
use itemsvc_server::{Router, Server, ServerConfig};
use log::{error, info, warn};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = ServerConfig::default();

    match config.resolved_log_dir() {
        Ok(log_dir) => {
            if let Err(err) = init_logging(&config.log_level, &log_dir) {
                eprintln!("itemsvc: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("itemsvc: logging disabled: {err}"),
    }
    info!(
        "event=app_start module=main status=start version={}",
        core_version()
    );

    let store = match config
        .resolved_db_path()
        .map_err(Into::into)
        .and_then(SqliteItemRepository::open)
    {
        Ok(store) => store,
        Err(err) => {
            error!("event=app_start module=main status=error error_code=store_open_failed error={err}");
            eprintln!("itemsvc: failed to open item store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::bind(
        config.bind_addr,
        Router::new(store),
        config.read_buffer_bytes,
    )
    .await
    {
        Ok(server) => server,
        Err(err) => {
            error!("event=app_start module=main status=error error_code=bind_failed error={err}");
            eprintln!("itemsvc: failed to listen on {}: {err}", config.bind_addr);
            return ExitCode::FAILURE;
        }
    };

    println!("Serving items at http://localhost:{}", config.bind_addr.port());
    server
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("event=signal module=main status=error error={err}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    ExitCode::SUCCESS
}
