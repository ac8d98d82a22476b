mod config;

use std::sync::Arc;
use std::time::Duration;

use leeriya_core::generator::remote::RemoteSessionConfig;
use leeriya_core::room_manager::run_idle_reaper;
use leeriya_core::{RoomManager, RoomManagerConfig, TokenCodec};
use leeriya_net::AppState;
use tokio_util::sync::CancellationToken;

use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env()?;
    log::info!("{} starting in {} mode", config.app_name, config.app_env);

    let remote_config = config.remote_api_key.clone().map(|api_key| RemoteSessionConfig {
        ws_endpoint: config.remote_ws_endpoint.clone(),
        api_key: Some(api_key),
        model: config.remote_model.clone(),
    });

    let room_manager = RoomManager::new(RoomManagerConfig {
        reservation_ttl: config.reservation_ttl,
        room_idle_timeout: config.room_idle_timeout,
        use_mock_generator: config.use_mock_lyria,
        remote_config,
    });

    let reaper_cancel = CancellationToken::new();
    let reaper_handle = tokio::spawn(run_idle_reaper(room_manager.clone(), reaper_cancel.clone()));

    let state = AppState {
        room_manager: room_manager.clone(),
        token_codec: Arc::new(TokenCodec::new(config.token_secret.clone())),
        token_ttl_seconds: config.token_ttl_seconds,
    };
    let router = leeriya_net::build_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("listening on {}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reaper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), reaper_handle).await;
    room_manager.close_all().await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutdown signal received");
}
