//! Headless player: a [`GameSession`] driven over a native websocket.
//!
//! Outgoing frames go through an unbounded channel to a writer task that owns
//! the sink, so the session can send synchronously from inside its handlers.
//! Notifications are printed to stdout as JSON lines.

#[cfg(test)]
#[path = "play_test.rs"]
mod play_test;

use std::time::{Duration, Instant};

use canvas::config::Endpoint;
use canvas::engine::{GameSession, Notification, Transport, TransportError};
use canvas::geometry::cell_center;
use canvas::input::PointerInput;
use canvas::storage::{IdentityStore, MemoryStore};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use wire::{GameMap, Point, StructureType};

use crate::{CliError, epoch_ms};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type Session = GameSession<ChannelTransport, MemoryStore>;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayOptions {
    pub ready: bool,
    pub auto_shoot: bool,
}

/// [`Transport`] that queues frames for the writer task.
pub struct ChannelTransport {
    tx: UnboundedSender<Message>,
}

impl ChannelTransport {
    pub fn new(tx: UnboundedSender<Message>) -> Self {
        Self { tx }
    }
}

impl Transport for ChannelTransport {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.tx.send(Message::Text(text.into())).map_err(|_| TransportError::Closed)
    }

    fn close(&mut self, code: u16, reason: &str) {
        let frame = CloseFrame { code: CloseCode::from(code), reason: reason.to_owned().into() };
        if self.tx.send(Message::Close(Some(frame))).is_err() {
            tracing::debug!("close requested after the writer stopped");
        }
    }
}

/// Centre of the map's hole cell.
#[must_use]
pub fn hole_target(map: &GameMap) -> Option<Point> {
    map.find_structure(StructureType::Hole).map(|tile| cell_center(tile.pos))
}

struct Player {
    session: Session,
    options: PlayOptions,
    started: Instant,
    game_over: bool,
}

impl Player {
    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn handle(&mut self, notifications: Vec<Notification>) {
        for notification in notifications {
            report(&notification);
            match notification {
                Notification::Initialized { player_id } => {
                    tracing::info!(player_id, "joined game {}", self.session.game_id());
                    if self.options.ready {
                        self.session.ready(true);
                    }
                }
                Notification::MapEnded { is_game_over: true, .. } => self.game_over = true,
                Notification::ServerError { message } => tracing::warn!(%message, "server error"),
                _ => {}
            }
        }
        if self.options.auto_shoot {
            self.shoot();
        }
    }

    fn shoot(&mut self) {
        if !self.session.shot().has_turn() {
            return;
        }
        let Some(target) = self.session.map().and_then(|map| hole_target(map)) else {
            return;
        };
        tracing::info!(x = target.x, y = target.y, "shooting at the hole");
        let now = self.elapsed_ms();
        self.session.on_pointer_down(PointerInput::mouse(target), now);
    }
}

fn report(notification: &Notification) {
    match serde_json::to_string(notification) {
        Ok(json) => println!("{json}"),
        Err(error) => tracing::warn!(%error, "notification not printable"),
    }
}

/// Join `game_id` and play until the game ends, the socket closes, or ctrl-c.
///
/// # Errors
/// The connection could not be made, or it closed before the game was over.
pub async fn play(endpoint: Endpoint, game_id: &str, name: Option<&str>, options: PlayOptions) -> Result<(), CliError> {
    let mut identities = IdentityStore::new(MemoryStore::new());
    if let Some(name) = name {
        identities.save_name(game_id, name)?;
    }
    let mut session: Session = GameSession::new(game_id, endpoint, identities);
    let url = session.begin_connect(epoch_ms())?;
    tracing::info!(%url, "connecting");

    let (stream, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url.as_str()))
        .await
        .map_err(|_| CliError::Timeout)?
        .map_err(|error| CliError::WsConnect(Box::new(error)))?;
    let (mut sink, mut source) = stream.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            if let Err(error) = sink.send(message).await {
                tracing::warn!(%error, "websocket write failed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    let mut player = Player { session, options, started: Instant::now(), game_over: false };
    let opened = player.session.on_open(ChannelTransport::new(tx));
    player.handle(opened);

    let outcome = loop {
        tokio::select! {
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let now = player.elapsed_ms();
                    let notifications = player.session.handle_message(text.as_str(), now);
                    player.handle(notifications);
                    if player.game_over {
                        break Ok(());
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    let closed = player.session.on_close();
                    player.handle(closed);
                    break Err(CliError::WsClosed);
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => break Err(CliError::WsConnect(Box::new(error))),
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break Ok(());
            }
        }
    };

    player.session.destroy();
    drop(player);
    if let Err(error) = writer.await {
        tracing::warn!(%error, "writer task failed");
    }
    outcome
}
