//! 传感器数据采集函数宿主：接收 Pub/Sub 推送，写入 InfluxDB。

mod handlers;
mod ingest;
mod routes;
mod utils;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use ingest::IngestionHandler;
use sensible_config::AppConfig;
use sensible_telemetry::{init_tracing, new_request_ids};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info};

#[derive(Clone)]
struct AppState {
    handler: Arc<IngestionHandler>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 处理器与写入器在进程内只构造一次，所有调用复用
    let handler = Arc::new(IngestionHandler::from_config(&config));
    info!(options = ?handler.options(), "ingestion handler ready");
    let app = build_app(AppState { handler });

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("listening on {}", config.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    routes::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("ctrl-c listener failed: {}", err);
        std::future::pending::<()>().await;
    }
    // 后台未完成的写入随进程退出丢弃
    info!("shutdown requested");
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
