//! Pub/Sub 推送入口
//!
//! - POST /
//! - POST /pubsub/push
//!
//! 完成信号触发后才确认（204），消息总线据此判定投递成功。
//! 投递体本身无法解析时按载荷解码失败的策略处理。

use api_contract::InboundBody;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::sync::oneshot;
use tracing::debug;

use crate::AppState;
use crate::utils::response::{internal_error, invalid_payload_error};

pub async fn receive_push(State(state): State<AppState>, body: Bytes) -> Response {
    let (done_tx, done_rx) = oneshot::channel::<()>();
    let done = move || {
        let _ = done_tx.send(());
    };

    let result = match serde_json::from_slice::<InboundBody>(&body) {
        Ok(body) => {
            if let Some(subscription) = body.subscription() {
                debug!(target: "sensible.ingest", subscription = %subscription, "push_received");
            }
            state.handler.handle(body.into_event(), done).await
        }
        Err(err) => state.handler.handle_malformed(err, done),
    };
    if let Err(err) = result {
        return invalid_payload_error(err.to_string());
    }

    match done_rx.await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(_) => internal_error("completion signal was not fired"),
    }
}
