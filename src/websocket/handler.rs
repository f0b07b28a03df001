use crate::{
    card::CardSession,
    websocket::messages::{ClientMessage, NoticeLevel, ServerMessage},
    AppState, SessionInfo,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection. The connection owns one card for
/// its whole lifetime.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    let session_id = Uuid::new_v4();
    state.sessions.insert(session_id, SessionInfo::new());
    tracing::info!("Card session {} opened", session_id);

    let mut session = CardSession::new(
        state.config.card.default_size,
        state.config.card.default_color,
    );

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        if tx.send(ServerMessage::card_state(&session)).await.is_err() {
            return;
        }

        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Some(mut info) = state_for_recv.sessions.get_mut(&session_id) {
                            info.record_action();
                        }
                        if let Err(e) =
                            handle_client_message(client_msg, &mut session, &state_for_recv, &tx)
                                .await
                        {
                            tracing::error!("Error handling message: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client closed card session {}", session_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    if let Some((_, info)) = state.sessions.remove(&session_id) {
        tracing::info!(
            "Card session {} closed after {} actions",
            session_id,
            info.actions
        );
    }
}

/// Apply one client action to the session and reply with the resulting state.
///
/// Card errors are reported to the client as notices and never end the
/// session; only a closed outgoing channel is returned as an error.
pub(crate) async fn handle_client_message(
    msg: ClientMessage,
    session: &mut CardSession,
    state: &AppState,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::SetCell { row, col, value } => {
            match session.set_cell(row, col, value) {
                Ok(()) => tx.send(ServerMessage::card_state(session)).await?,
                Err(e) => warn(tx, e).await?,
            }
        }
        ClientMessage::Resize { size } => match session.resize(size) {
            Ok(size) => {
                tracing::debug!("Card resized to {}x{}", size.get(), size.get());
                tx.send(ServerMessage::card_state(session)).await?;
            }
            Err(e) => warn(tx, e).await?,
        },
        ClientMessage::SetWordList { text } => {
            session.set_word_list(text);
        }
        ClientMessage::FillFromList => match session.fill_from_list() {
            Ok(outcome) => {
                tx.send(ServerMessage::card_state(session)).await?;
                if outcome.discarded > 0 {
                    let message = format!(
                        "Placed {} words, {} extra words were left out",
                        outcome.placed, outcome.discarded
                    );
                    tx.send(ServerMessage::notice(NoticeLevel::Info, message))
                        .await?;
                }
            }
            Err(e) => warn(tx, e).await?,
        },
        ClientMessage::UpdateListFromGrid => {
            let text = session.update_list_from_grid().to_string();
            tx.send(ServerMessage::WordList { text }).await?;
        }
        ClientMessage::Shuffle => {
            let result = session.shuffle(&mut rand::rng());
            match result {
                Ok(()) => tx.send(ServerMessage::card_state(session)).await?,
                Err(e) => warn(tx, e).await?,
            }
        }
        ClientMessage::SetColor { color } => match session.set_color(&color) {
            Ok(_) => tx.send(ServerMessage::card_state(session)).await?,
            Err(e) => warn(tx, e).await?,
        },
        ClientMessage::ToggleListVisibility => {
            session.toggle_list_visibility();
            tx.send(ServerMessage::card_state(session)).await?;
        }
        ClientMessage::Export => match session.export(state.exporter.as_ref()) {
            Ok(artifact) => {
                tracing::info!(
                    "Exported {} ({} bytes)",
                    artifact.file_name,
                    artifact.bytes.len()
                );
                tx.send(ServerMessage::ExportReady {
                    data: artifact.to_base64(),
                    file_name: artifact.file_name,
                    mime_type: artifact.mime_type.to_string(),
                    exported_at: chrono::Utc::now(),
                })
                .await?;
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                tx.send(ServerMessage::notice(
                    NoticeLevel::Error,
                    format!("Export failed: {}", e),
                ))
                .await?;
            }
        },
        ClientMessage::GetState => {
            tx.send(ServerMessage::card_state(session)).await?;
            tx.send(ServerMessage::WordList {
                text: session.word_list().to_string(),
            })
            .await?;
        }
    }

    Ok(())
}

async fn warn(
    tx: &mpsc::Sender<ServerMessage>,
    error: crate::error::CardError,
) -> anyhow::Result<()> {
    tracing::debug!("Rejected card action: {}", error);
    tx.send(ServerMessage::notice(NoticeLevel::Warning, error.to_string()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        card::{GridSize, Rgb},
        config::Config,
        export::{png::tests::png_dimensions, PngExporter},
    };
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    fn test_state() -> AppState {
        AppState::new(Config::default())
    }

    async fn run(
        session: &mut CardSession,
        state: &AppState,
        messages: Vec<ClientMessage>,
    ) -> Vec<ServerMessage> {
        let (tx, mut rx) = mpsc::channel(32);
        for msg in messages {
            handle_client_message(msg, session, state, &tx).await.unwrap();
        }
        drop(tx);
        let mut replies = Vec::new();
        while let Some(reply) = rx.recv().await {
            replies.push(reply);
        }
        replies
    }

    fn nine_words() -> ClientMessage {
        ClientMessage::SetWordList {
            text: "1,2,3,4,5,6,7,8,9".to_string(),
        }
    }

    fn session(n: u8) -> CardSession {
        CardSession::new(GridSize::new(n).unwrap(), Rgb::WHITE)
    }

    #[tokio::test]
    async fn test_set_cell_replies_with_state() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(
            &mut session,
            &state,
            vec![ClientMessage::SetCell {
                row: 0,
                col: 1,
                value: "Free".to_string(),
            }],
        )
        .await;

        assert_eq!(replies.len(), 1);
        match &replies[0] {
            ServerMessage::CardState { rows, .. } => assert_eq!(rows[0][1], "Free"),
            other => panic!("Expected card state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fill_with_too_few_words_sends_warning() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(
            &mut session,
            &state,
            vec![
                ClientMessage::SetWordList {
                    text: "a, b, c".to_string(),
                },
                ClientMessage::FillFromList,
            ],
        )
        .await;

        assert_eq!(replies.len(), 1, "set_word_list sends no reply");
        match &replies[0] {
            ServerMessage::Notice { level, message } => {
                assert_eq!(*level, NoticeLevel::Warning);
                assert!(message.contains("Not enough words"), "got: {}", message);
            }
            other => panic!("Expected notice, got {:?}", other),
        }
        assert!(session.grid().cells().all(str::is_empty));
    }

    #[tokio::test]
    async fn test_fill_reports_discarded_words() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(
            &mut session,
            &state,
            vec![
                ClientMessage::SetWordList {
                    text: "a,b,c,d,e,f,g,h,i,j".to_string(),
                },
                ClientMessage::FillFromList,
            ],
        )
        .await;

        assert!(matches!(replies[0], ServerMessage::CardState { .. }));
        assert!(matches!(
            replies[1],
            ServerMessage::Notice {
                level: NoticeLevel::Info,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_list_from_grid_and_shuffle() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(
            &mut session,
            &state,
            vec![
                nine_words(),
                ClientMessage::FillFromList,
                ClientMessage::Shuffle,
                ClientMessage::UpdateListFromGrid,
            ],
        )
        .await;

        assert_eq!(replies.len(), 3);
        match &replies[2] {
            ServerMessage::WordList { text } => {
                let mut words: Vec<&str> = text.split(", ").collect();
                words.sort_unstable();
                assert_eq!(words, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
            }
            other => panic!("Expected word list, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_resize_sends_warning() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(&mut session, &state, vec![ClientMessage::Resize { size: 12 }]).await;
        assert!(matches!(
            replies[0],
            ServerMessage::Notice {
                level: NoticeLevel::Warning,
                ..
            }
        ));
        assert_eq!(session.grid().size().get(), 3);
    }

    #[tokio::test]
    async fn test_out_of_range_resize_values_send_warning() {
        let state = test_state();
        let mut session = session(4);
        for size in [300, -1, i64::MAX] {
            let replies = run(&mut session, &state, vec![ClientMessage::Resize { size }]).await;
            match &replies[0] {
                ServerMessage::Notice { level, message } => {
                    assert_eq!(*level, NoticeLevel::Warning);
                    assert!(message.contains(&size.to_string()), "{}", message);
                }
                other => panic!("Expected warning, got {:?}", other),
            }
        }
        assert_eq!(session.grid().size().get(), 4);
    }

    #[tokio::test]
    async fn test_toggle_list_visibility() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(&mut session, &state, vec![ClientMessage::ToggleListVisibility]).await;
        assert!(matches!(
            replies[0],
            ServerMessage::CardState {
                list_visible: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_export_sends_artifact() {
        let state = test_state();
        let mut session = session(3);
        let replies = run(
            &mut session,
            &state,
            vec![
                ClientMessage::SetColor {
                    color: "#5C4033".to_string(),
                },
                ClientMessage::Export,
            ],
        )
        .await;

        match &replies[1] {
            ServerMessage::ExportReady {
                file_name,
                mime_type,
                data,
                ..
            } => {
                assert_eq!(file_name, "bingo-card.png");
                assert_eq!(mime_type, "image/png");
                let png = BASE64.decode(data).unwrap();
                // Default layout: 2 * 16 + 3 * 140 + 2 * 4
                assert_eq!(png_dimensions(&png), (460, 460));
            }
            other => panic!("Expected export, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_export_failure_is_reported() {
        for exporter in [PngExporter::new(0, 0, 0), PngExporter::new(1_000_000_000, 4, 16)] {
            let mut state = test_state();
            state.exporter = Box::new(exporter);
            let mut session = session(3);
            let replies = run(&mut session, &state, vec![ClientMessage::Export]).await;
            match &replies[0] {
                ServerMessage::Notice { level, message } => {
                    assert_eq!(*level, NoticeLevel::Error);
                    assert!(message.starts_with("Export failed"));
                }
                other => panic!("Expected error notice, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_closed_channel_is_an_error() {
        let state = test_state();
        let mut session = session(3);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let result = handle_client_message(ClientMessage::GetState, &mut session, &state, &tx).await;
        assert!(result.is_err());
    }
}
