use crate::{
    game::GameSession,
    websocket::{
        messages::{ClientMessage, ServerMessage},
        sink::broadcast,
    },
    ActiveGame, AppState,
};
use anyhow::Context;
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

/// Per-socket bookkeeping
#[derive(Debug, Clone)]
pub struct Connection {
    pub connection_id: Uuid,
    pub game_id: Option<Uuid>,
}

impl Connection {
    pub fn new() -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            game_id: None,
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let mut connection = Connection::new();
    let connection_id = connection.connection_id;

    tracing::info!("WebSocket connection established: {}", connection_id);

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
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &state_for_recv, &tx, &mut connection)
                                .await
                        {
                            tracing::error!("Error handling message: {}", e);
                            let error_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let _ = tx.send(error_msg).await;
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
                    tracing::info!("Client disconnected: {}", connection.connection_id);
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

    detach_everywhere(&state, connection_id);

    tracing::info!("WebSocket connection closed: {}", connection_id);
}

/// Drop a connection from every game it was watching
fn detach_everywhere(state: &AppState, connection_id: Uuid) {
    for mut game in state.active_games.iter_mut() {
        game.subscribers.remove(&connection_id);
    }
}

fn leave_current_game(state: &AppState, connection: &mut Connection) {
    if let Some(game_id) = connection.game_id.take() {
        if let Some(mut game) = state.active_games.get_mut(&game_id) {
            game.subscribers.remove(&connection.connection_id);
        }
        tracing::info!(
            "Connection {} left game {}",
            connection.connection_id,
            game_id
        );
    }
}

fn current_game(connection: &Connection) -> anyhow::Result<Uuid> {
    connection
        .game_id
        .context("Not in a game; create or join one first")
}

/// Handle individual client messages
pub async fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    tx: &mpsc::Sender<ServerMessage>,
    connection: &mut Connection,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::CreateGame { mode } => {
            leave_current_game(state, connection);

            let session = GameSession::new(mode, &state.config.game.settings);
            let tile_order = session.pool().scatter_order(&mut rand::rng());
            let snapshot = session.snapshot();

            let game_id = Uuid::new_v4();
            let mut game = ActiveGame::new(session);
            game.subscribers.insert(connection.connection_id, tx.clone());
            let created_at = game.created_at;
            state.active_games.insert(game_id, game);
            connection.game_id = Some(game_id);

            tracing::info!(
                "Connection {} created {:?} game {}",
                connection.connection_id,
                mode,
                game_id
            );

            tx.send(ServerMessage::GameCreated {
                game_id: game_id.to_string(),
                mode,
                tile_order,
            })
            .await?;
            tx.send(ServerMessage::game_state(&game_id.to_string(), created_at, &snapshot))
                .await?;
        }
        ClientMessage::JoinGame { game_id } => {
            let id = Uuid::parse_str(&game_id).context("Invalid game id")?;
            if connection.game_id != Some(id) {
                leave_current_game(state, connection);
            }

            let state_msg = {
                let mut game = state
                    .active_games
                    .get_mut(&id)
                    .with_context(|| format!("Game {} not found", game_id))?;
                game.subscribers.insert(connection.connection_id, tx.clone());
                game.touch();
                ServerMessage::game_state(&game_id, game.created_at, &game.session.snapshot())
            };
            connection.game_id = Some(id);

            tracing::info!("Connection {} joined game {}", connection.connection_id, id);
            tx.send(state_msg).await?;
        }
        ClientMessage::LeaveGame => {
            leave_current_game(state, connection);
        }
        ClientMessage::PlaceTile { tile_id, position } => {
            let game_id = current_game(connection)?;

            let (result, messages, subscribers) = {
                let mut game = state
                    .active_games
                    .get_mut(&game_id)
                    .context("Game no longer exists")?;
                game.touch();
                let result = game.session.place_tile(tile_id, position).map(|_| ());
                let mode = game.session.mode();
                let messages: Vec<ServerMessage> = game
                    .session
                    .drain_events()
                    .into_iter()
                    .map(|event| ServerMessage::from_event(event, mode))
                    .collect();
                (result, messages, game.subscriber_list())
            };

            match result {
                Ok(()) => broadcast(&subscribers, &messages).await,
                Err(reason) => tx.send(ServerMessage::rejected(tile_id, reason)).await?,
            }
        }
        ClientMessage::ResetGame { force } => {
            let game_id = current_game(connection)?;

            let (messages, subscribers) = {
                let mut game = state
                    .active_games
                    .get_mut(&game_id)
                    .context("Game no longer exists")?;
                game.touch();
                game.session.reset(force)?;

                let mode = game.session.mode();
                let mut messages: Vec<ServerMessage> = game
                    .session
                    .drain_events()
                    .into_iter()
                    .map(|event| ServerMessage::from_event(event, mode))
                    .collect();
                messages.push(ServerMessage::game_state(
                    &game_id.to_string(),
                    game.created_at,
                    &game.session.snapshot(),
                ));
                (messages, game.subscriber_list())
            };

            broadcast(&subscribers, &messages).await;
        }
        ClientMessage::RequestState => {
            let game_id = current_game(connection)?;
            let state_msg = {
                let game = state
                    .active_games
                    .get(&game_id)
                    .context("Game no longer exists")?;
                ServerMessage::game_state(
                    &game_id.to_string(),
                    game.created_at,
                    &game.session.snapshot(),
                )
            };
            tx.send(state_msg).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, GameConfig, ServerConfig},
        game::{GameSettings, PlacementError},
        models::{GameMode, GameOutcome, Player, Position},
    };
    use dashmap::DashMap;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn test_state() -> AppState {
        AppState {
            config: Config {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 0,
                },
                game: GameConfig {
                    settings: GameSettings::default(),
                    session_idle: Duration::from_secs(60),
                },
            },
            active_games: DashMap::new(),
        }
    }

    /// Pull everything currently queued for a client
    fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    async fn create(
        state: &AppState,
        mode: GameMode,
    ) -> (Connection, mpsc::Sender<ServerMessage>, mpsc::Receiver<ServerMessage>) {
        let (tx, mut rx) = mpsc::channel(64);
        let mut connection = Connection::new();
        assert_ok!(
            handle_client_message(ClientMessage::CreateGame { mode }, state, &tx, &mut connection)
                .await
        );
        drain(&mut rx);
        (connection, tx, rx)
    }

    async fn place(
        state: &AppState,
        tx: &mpsc::Sender<ServerMessage>,
        connection: &mut Connection,
        tile_id: usize,
        position: Option<Position>,
    ) {
        assert_ok!(
            handle_client_message(
                ClientMessage::PlaceTile { tile_id, position },
                state,
                tx,
                connection
            )
            .await
        );
    }

    #[tokio::test]
    async fn test_create_game_registers_session() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);
        let mut connection = Connection::new();

        assert_ok!(
            handle_client_message(
                ClientMessage::CreateGame {
                    mode: GameMode::SinglePlayer
                },
                &state,
                &tx,
                &mut connection
            )
            .await
        );

        let messages = drain(&mut rx);
        assert!(matches!(
            &messages[0],
            ServerMessage::GameCreated { tile_order, .. } if tile_order.len() == 16
        ));
        assert!(matches!(messages[1], ServerMessage::GameState { .. }));

        let game_id = connection.game_id.expect("Connection should be in the new game");
        assert!(state.active_games.contains_key(&game_id));
    }

    #[tokio::test]
    async fn test_place_without_game_is_an_error() {
        let state = test_state();
        let (tx, _rx) = mpsc::channel(8);
        let mut connection = Connection::new();

        assert_err!(
            handle_client_message(
                ClientMessage::PlaceTile {
                    tile_id: 0,
                    position: None
                },
                &state,
                &tx,
                &mut connection
            )
            .await
        );
    }

    #[tokio::test]
    async fn test_rejected_placement_goes_to_sender_only() {
        let state = test_state();
        let (mut connection, tx, mut rx) = create(&state, GameMode::TwoPlayer).await;

        place(&state, &tx, &mut connection, 0, None).await;

        let messages = drain(&mut rx);
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            messages[0],
            ServerMessage::PlacementRejected {
                tile_id: 0,
                reason: PlacementError::NoCoordinateResolved,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_two_players_see_the_same_game() {
        let state = test_state();
        let (mut host, host_tx, mut host_rx) = create(&state, GameMode::TwoPlayer).await;
        let game_id = host.game_id.unwrap();

        let (guest_tx, mut guest_rx) = mpsc::channel(64);
        let mut guest = Connection::new();
        assert_ok!(
            handle_client_message(
                ClientMessage::JoinGame {
                    game_id: game_id.to_string()
                },
                &state,
                &guest_tx,
                &mut guest
            )
            .await
        );
        let joined = drain(&mut guest_rx);
        assert!(matches!(joined.as_slice(), [ServerMessage::GameState { .. }]));

        // F wraps around the right edge: (0,3) (0,0) (0,1)
        place(&state, &host_tx, &mut host, 0, Some(Position::new(0, 3))).await;
        place(&state, &guest_tx, &mut guest, 5, Some(Position::new(0, 0))).await;
        place(&state, &host_tx, &mut host, 6, Some(Position::new(2, 2))).await;
        place(&state, &guest_tx, &mut guest, 11, Some(Position::new(0, 1))).await;

        for rx in [&mut host_rx, &mut guest_rx] {
            let messages = drain(rx);
            assert_eq!(
                messages
                    .iter()
                    .filter(|m| matches!(m, ServerMessage::TilePlaced { .. }))
                    .count(),
                4
            );
            match messages.last() {
                Some(ServerMessage::GameOver { outcome, message }) => {
                    assert!(matches!(
                        outcome,
                        GameOutcome::Won {
                            player: Player::Two,
                            ..
                        }
                    ));
                    assert_eq!(message, "Player 2 Wins!");
                }
                other => panic!("Expected game over, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_reset_policy_over_the_wire() {
        let state = test_state();
        let (mut connection, tx, mut rx) = create(&state, GameMode::SinglePlayer).await;
        place(&state, &tx, &mut connection, 0, None).await;
        drain(&mut rx);

        assert_err!(
            handle_client_message(
                ClientMessage::ResetGame { force: false },
                &state,
                &tx,
                &mut connection
            )
            .await
        );

        assert_ok!(
            handle_client_message(
                ClientMessage::ResetGame { force: true },
                &state,
                &tx,
                &mut connection
            )
            .await
        );
        let messages = drain(&mut rx);
        assert!(matches!(messages[0], ServerMessage::BoardReset));
        assert!(matches!(messages[1], ServerMessage::GameState { .. }));

        let game = state.active_games.get(&connection.game_id.unwrap()).unwrap();
        assert_eq!(game.session.board().filled_count(), 0);
    }

    #[tokio::test]
    async fn test_leave_game_unsubscribes() {
        let state = test_state();
        let (mut connection, tx, _rx) = create(&state, GameMode::SinglePlayer).await;
        let game_id = connection.game_id.unwrap();

        assert_ok!(
            handle_client_message(ClientMessage::LeaveGame, &state, &tx, &mut connection).await
        );
        assert_eq!(connection.game_id, None);
        assert!(state.active_games.get(&game_id).unwrap().subscribers.is_empty());
    }

    #[test]
    fn test_new_connection_starts_outside_any_game() {
        let first = Connection::new();
        let second = Connection::default();
        assert_eq!(first.game_id, None);
        assert_eq!(second.game_id, None);
        assert_ne!(first.connection_id, second.connection_id);
    }

    #[test]
    fn test_detach_everywhere_removes_connection() {
        let state = test_state();
        let (tx, _rx) = mpsc::channel(1);
        let connection = Connection::new();

        let mut game = ActiveGame::new(GameSession::new(
            GameMode::TwoPlayer,
            &GameSettings::default(),
        ));
        game.subscribers.insert(connection.connection_id, tx);
        let game_id = Uuid::new_v4();
        state.active_games.insert(game_id, game);

        detach_everywhere(&state, connection.connection_id);
        assert!(state.active_games.get(&game_id).unwrap().subscribers.is_empty());
    }
}
