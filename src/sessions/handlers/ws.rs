use crate::app_context::AppContext;
use crate::sessions::message_types::{ClientSentSocketMessage, ServerSentSocketMessage};
use crate::sessions::services::responses::{DestroySessionResponse, SessionActionError};
use crate::storage::interface::{SessionRepo, SessionSocketsRepo};
use crate::storage::sessions::HashMapSessionsStorage;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Response};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use http::StatusCode;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub async fn ws(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> Response {
    if !app_context.sessions.exists(&session_id).await {
        return (
            StatusCode::NOT_FOUND,
            Json(DestroySessionResponse {
                error: true,
                error_code: Some(SessionActionError::SessionNotFound),
            }),
        )
            .into_response();
    }
    ws.on_upgrade(move |socket| async move {
        SessionWsHandler::new(app_context, session_id, socket)
            .await
            .on_client_connected()
            .await
    })
}

pub struct SessionWsHandler {
    app_context: AppContext<HashMapSessionsStorage>,
    session_id: String,
    socket_id: usize,
    client_ws_tx: Option<SplitSink<WebSocket, Message>>,
    client_ws_rx: SplitStream<WebSocket>,
    rx: Option<UnboundedReceiverStream<Message>>,
}

impl SessionWsHandler {
    pub async fn new(
        app_context: AppContext<HashMapSessionsStorage>,
        session_id: String,
        websocket: WebSocket,
    ) -> Self {
        // Split the socket into a sender and receiver of messages.
        // Use an unbounded channel to handle buffering and flushing of messages to the websocket.
        let (client_ws_tx, client_ws_rx) = websocket.split();
        let (tx, rx) = mpsc::unbounded_channel();
        let rx = UnboundedReceiverStream::new(rx);
        let socket_id = app_context.sockets.add(tx).await;
        Self {
            app_context,
            session_id,
            socket_id,
            client_ws_tx: Some(client_ws_tx),
            client_ws_rx,
            rx: Some(rx),
        }
    }

    pub async fn on_client_connected(mut self) {
        let (Some(mut client_ws_tx), Some(mut rx)) = (self.client_ws_tx.take(), self.rx.take())
        else {
            return;
        };
        let socket_id = self.socket_id;
        tokio::task::spawn(async move {
            while let Some(message) = rx.next().await {
                if let Err(err) = client_ws_tx.send(message).await {
                    tracing::warn!(socket_id, error = %err, "Websocket send error.");
                    break;
                }
            }
        });

        if !self
            .app_context
            .sessions
            .add_socket(&self.session_id, socket_id)
            .await
        {
            // The session was removed while the connection was upgrading.
            self.app_context.sockets.remove(socket_id).await;
            return;
        }
        tracing::info!(
            task = "socket_connected",
            session_id = %self.session_id,
            socket_id,
        );
        if let Ok(snapshot) = self.app_context.sessions.snapshot(&self.session_id).await {
            self.send(ServerSentSocketMessage::snapshot(snapshot)).await;
        }

        while let Some(result) = self.client_ws_rx.next().await {
            let message = match result {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(socket_id, error = %err, "Websocket error.");
                    break;
                }
            };
            if let Message::Close(_) = message {
                break;
            }
            self.on_new_message(message).await;
        }
        self.on_client_disconnected().await;
    }

    async fn on_new_message(&self, message: Message) {
        let Message::Text(raw_msg) = message else {
            return;
        };
        match serde_json::from_str::<ClientSentSocketMessage>(&raw_msg) {
            Ok(ClientSentSocketMessage::Ping { .. }) => {
                self.send(ServerSentSocketMessage::pong()).await;
            }
            Err(err) => {
                tracing::warn!(
                    socket_id = self.socket_id,
                    error = %err,
                    raw_msg = %raw_msg,
                    "Failed to deserialize a client message."
                );
            }
        }
    }

    async fn on_client_disconnected(&self) {
        let session_closed = self
            .app_context
            .sessions
            .remove_socket(&self.session_id, self.socket_id)
            .await;
        self.app_context.sockets.remove(self.socket_id).await;
        tracing::info!(
            task = "socket_disconnected",
            session_id = %self.session_id,
            socket_id = self.socket_id,
            session_closed,
        );
    }

    async fn send(&self, message: ServerSentSocketMessage) {
        if let Some(raw_msg) = message.to_json() {
            self.app_context.sockets.send_msg(&raw_msg, self.socket_id).await;
        }
    }
}
