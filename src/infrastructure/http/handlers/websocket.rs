//! WebSocket Handler - 按监听者推送朗读事件

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// 监听者事件流 WebSocket
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(listener_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_listener_socket(socket, listener_id, state))
}

async fn handle_listener_socket(socket: WebSocket, listener_id: String, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // 注册事件接收器；不要求已有活动会话，事件流可以先于 start 建立
    let mut event_rx = state.event_publisher.register_listener(&listener_id);

    tracing::info!(listener_id = %listener_id, "WebSocket connected");

    let listener_id_for_forward = listener_id.clone();
    let listener_id_for_receive = listener_id.clone();

    // 事件转发任务
    let forward_task = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(
                    listener_id = %listener_id_for_forward,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Ping(_)) => {
                    // pong 由 axum 自动响应
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(listener_id = %listener_id_for_receive, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(listener_id = %listener_id_for_receive, error = %e, "WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    // 等待任一任务完成
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    // 清理
    state.event_publisher.unregister_listener(&listener_id);
    tracing::info!(listener_id = %listener_id, "WebSocket disconnected");
}
