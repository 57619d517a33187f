//! Seneye LDE 推送接收与 Prometheus 导出服务。

mod handlers;
mod middleware;
mod routes;

use axum::Router;
use prometheus::Registry;
use seneye_config::AppConfig;
use seneye_ingest::{LdeService, LdeServiceConfig};
use seneye_metrics::register_process_collector;
use seneye_telemetry::init_tracing;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: LdeService,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing(config.log_format, &config.log_level);
    info!(target: "seneye.http", secrets = ?config.secrets, "configuration loaded");

    // 独立注册表：读数、接入计数、进程指标
    let registry = Registry::new();
    register_process_collector(&registry)?;
    let service = LdeService::new(LdeServiceConfig::new(config.secrets.clone(), registry))?;
    let state = AppState { service };

    let lde = routes::create_lde_router(&config.lde_path);
    let metrics = routes::create_metrics_router(&config.metrics_path);
    let apps = if config.shared_listener() {
        vec![(config.lde_addr.clone(), routes::finish(lde.merge(metrics), state))]
    } else {
        vec![
            (config.lde_addr.clone(), routes::finish(lde, state.clone())),
            (config.metrics_addr.clone(), routes::finish(metrics, state)),
        ]
    };

    let mut listeners = Vec::with_capacity(apps.len());
    for (addr, app) in apps {
        let listener = TcpListener::bind(&addr).await?;
        info!(target: "seneye.http", addr = %addr, "listening");
        listeners.push((listener, app));
    }

    serve_all(
        listeners,
        Duration::from_secs(config.shutdown_timeout_seconds),
    )
    .await?;
    Ok(())
}

/// 运行全部监听器，直到 Ctrl-C 或任一监听器退出，然后统一优雅关闭。
async fn serve_all(listeners: Vec<(TcpListener, Router)>, drain: Duration) -> io::Result<()> {
    let (shutdown, _) = watch::channel(false);
    let mut servers = JoinSet::new();
    for (listener, app) in listeners {
        let mut stop = shutdown.subscribe();
        servers.spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop.wait_for(|stop| *stop).await;
                })
                .await
        });
    }

    let mut first_error = None;
    tokio::select! {
        _ = shutdown_signal() => {
            info!(target: "seneye.http", "shutdown requested");
        }
        Some(result) = servers.join_next() => {
            warn!(target: "seneye.http", "listener exited, shutting down the rest");
            record(result, &mut first_error);
        }
    }
    let _ = shutdown.send(true);

    let drained = tokio::time::timeout(drain, async {
        while let Some(result) = servers.join_next().await {
            record(result, &mut first_error);
        }
    })
    .await;
    if drained.is_err() {
        warn!(
            target: "seneye.http",
            timeout_seconds = drain.as_secs(),
            "graceful shutdown timed out, aborting open connections"
        );
        servers.abort_all();
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn record(result: Result<io::Result<()>, JoinError>, first_error: &mut Option<io::Error>) {
    let err = match result {
        Ok(Ok(())) => return,
        Ok(Err(err)) => err,
        Err(err) => io::Error::other(err),
    };
    error!(target: "seneye.http", error = %err, "listener failed");
    first_error.get_or_insert(err);
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target: "seneye.http", error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
