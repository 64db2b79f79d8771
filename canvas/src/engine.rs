//! Game session: the connection state machine and the fan-out of server
//! events to the layers.
//!
//! [`GameSession`] owns every piece of client state for one game. It never
//! touches a socket directly: the host opens a connection to the URL from
//! [`GameSession::begin_connect`], hands the session a [`Transport`] when it
//! opens, and forwards each text frame to [`GameSession::handle_message`].
//! The returned [`Notification`]s are what the host UI reacts to.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use wire::event::{ClientEvent, EffectKind, PlayerId, PlayerStatus, ServerEvent};
use wire::map::GameMap;
use wire::{GameMapDto, decode_server_event, encode_client_event};

use crate::config::Endpoint;
use crate::input::PointerInput;
use crate::shot::{ShotAction, ShotEngine};
use crate::sprite::{SpriteLayer, balls_from_states};
use crate::storage::{Identity, IdentityStore, KeyValueStore, StorageError};
use crate::tiles::{LayerFilter, MapRenderer};

/// Close code for a deliberate disconnect.
pub const NORMAL_CLOSURE: u16 = 1000;

const WAITING_HEADING: &str = "Waiting for other players";
const GAME_OVER_HEADING: &str = "Game over";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection is not open")]
    Closed,
    #[error("transport error: {0}")]
    Backend(String),
}

/// An open text-message connection to the game server.
pub trait Transport {
    fn is_open(&self) -> bool;

    /// # Errors
    /// The connection refused the frame.
    fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    fn close(&mut self, code: u16, reason: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot connect while {0:?}")]
    NotDisconnected(SessionState),
    #[error("session was destroyed")]
    Destroyed,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Disconnected,
    Connecting,
    /// Open, waiting for `INIT` or `RECONNECT`.
    AwaitingInit,
    InSession,
}

/// Lifecycle events for the host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    Connected,
    Disconnected,
    #[serde(rename_all = "camelCase")]
    Joined { player_id: PlayerId, name: String },
    #[serde(rename_all = "camelCase")]
    Initialized { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    MapStarted { is_demo: bool },
    #[serde(rename_all = "camelCase")]
    MapEnded { is_game_over: bool, scores: BTreeMap<String, Vec<i64>> },
    /// The host should offer to save the demo map; delivered after a short delay.
    SaveDemo { jwt: String },
    ServerError { message: String },
}

pub struct GameSession<T, S> {
    game_id: String,
    endpoint: Endpoint,
    identities: IdentityStore<S>,
    identity: Identity,
    state: SessionState,
    transport: Option<T>,
    destroyed: bool,
    map: Option<Rc<GameMap>>,
    is_demo: bool,
    shot: ShotEngine,
    ground: MapRenderer,
    structures: MapRenderer,
    sprites: SpriteLayer,
}

impl<T: Transport, S: KeyValueStore> GameSession<T, S> {
    pub fn new(game_id: &str, endpoint: Endpoint, identities: IdentityStore<S>) -> Self {
        Self {
            game_id: game_id.to_owned(),
            endpoint,
            identities,
            identity: Identity::default(),
            state: SessionState::Disconnected,
            transport: None,
            destroyed: false,
            map: None,
            is_demo: false,
            shot: ShotEngine::new(),
            ground: MapRenderer::new(LayerFilter::Floor),
            structures: MapRenderer::new(LayerFilter::Solid),
            sprites: SpriteLayer::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn identities(&self) -> &IdentityStore<S> {
        &self.identities
    }

    #[must_use]
    pub fn map(&self) -> Option<&Rc<GameMap>> {
        self.map.as_ref()
    }

    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.is_demo
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn shot(&self) -> &ShotEngine {
        &self.shot
    }

    // --- Layers ---

    pub fn shot_mut(&mut self) -> &mut ShotEngine {
        &mut self.shot
    }

    /// Ground and floor structures, below the balls.
    pub fn ground_mut(&mut self) -> &mut MapRenderer {
        &mut self.ground
    }

    /// Solid structures, above the balls.
    pub fn structures_mut(&mut self) -> &mut MapRenderer {
        &mut self.structures
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteLayer {
        &mut self.sprites
    }

    // --- Connection lifecycle ---

    /// Load the stored identity and return the URL to open.
    ///
    /// # Errors
    ///
    /// Called outside `Disconnected`, after `destroy`, or the identity
    /// store could not be written.
    pub fn begin_connect(&mut self, now_ms: u64) -> Result<String, SessionError> {
        if self.destroyed {
            return Err(SessionError::Destroyed);
        }
        if self.state != SessionState::Disconnected {
            return Err(SessionError::NotDisconnected(self.state));
        }
        self.identity = self.identities.load(&self.game_id, now_ms)?;
        self.state = SessionState::Connecting;
        let url = self.endpoint.game_url(&self.game_id, &self.identity);
        log::info!("connecting to game {}", self.game_id);
        Ok(url)
    }

    /// The connection opened.
    pub fn on_open(&mut self, transport: T) -> Vec<Notification> {
        if self.destroyed {
            let mut transport = transport;
            transport.close(NORMAL_CLOSURE, "session destroyed");
            return Vec::new();
        }
        self.transport = Some(transport);
        self.state = SessionState::AwaitingInit;
        log::info!("connected to game {}", self.game_id);
        vec![Notification::Connected]
    }

    /// The connection closed. Reconnecting is the host's decision.
    pub fn on_close(&mut self) -> Vec<Notification> {
        self.transport = None;
        self.state = SessionState::Disconnected;
        self.shot.set_has_turn(false);
        if self.destroyed {
            return Vec::new();
        }
        log::info!("disconnected from game {}", self.game_id);
        vec![Notification::Disconnected]
    }

    /// Close the connection and stop reacting to it. Safe to call repeatedly
    /// or before any connection was made.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(mut transport) = self.transport.take() {
            if transport.is_open() {
                transport.close(NORMAL_CLOSURE, "");
            }
        }
        self.state = SessionState::Disconnected;
    }

    /// Serialize and send `event`. A send without an open connection is dropped.
    pub fn send(&mut self, event: &ClientEvent) -> bool {
        let Some(transport) = self.transport.as_mut().filter(|t| t.is_open()) else {
            log::warn!("dropping {event:?}: not connected");
            return false;
        };
        let text = match encode_client_event(event) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("dropping {event:?}: {e}");
                return false;
            }
        };
        match transport.send_text(text) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("send failed: {e}");
                false
            }
        }
    }

    /// Tell the server whether this player is ready to start.
    pub fn ready(&mut self, value: bool) -> bool {
        self.send(&ClientEvent::IsReady { value })
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, input: PointerInput, now_ms: f64) {
        let actions = self.shot.on_pointer_down(input, now_ms);
        self.dispatch(actions);
    }

    pub fn on_pointer_move(&mut self, input: PointerInput) {
        self.shot.on_pointer_move(input);
    }

    pub fn on_pointer_up(&mut self, input: PointerInput, now_ms: f64) {
        let actions = self.shot.on_pointer_up(input, now_ms);
        self.dispatch(actions);
    }

    fn dispatch(&mut self, actions: Vec<ShotAction>) {
        for action in actions {
            match action {
                ShotAction::Shot(event) => {
                    self.send(&event);
                }
                ShotAction::Rotated(rotation) => log::debug!("shot rotation {rotation:?}"),
            }
        }
    }

    // --- Server events ---

    /// Apply one text frame. Malformed frames are logged and dropped.
    pub fn handle_message(&mut self, text: &str, now_ms: f64) -> Vec<Notification> {
        if self.destroyed {
            return Vec::new();
        }
        match decode_server_event(text) {
            Ok(event) => self.apply(event, now_ms),
            Err(e) => {
                log::warn!("dropping malformed server event: {e}");
                Vec::new()
            }
        }
    }

    fn apply(&mut self, event: ServerEvent, now_ms: f64) -> Vec<Notification> {
        log::debug!("server event {}", event.kind());
        match event {
            ServerEvent::Join { player_id, name } => vec![Notification::Joined { player_id, name }],
            ServerEvent::Init { player_id, name, token } => {
                self.adopt_identity(player_id, &name, &token);
                self.state = SessionState::InSession;
                self.shot.set_heading(Some(WAITING_HEADING.to_owned()));
                vec![Notification::Initialized { player_id }]
            }
            ServerEvent::Reconnect { game_map, is_demo, player_id, name, is_turn } => {
                self.adopt_identity(player_id, &name, "");
                self.state = SessionState::InSession;
                self.shot.set_has_turn(is_turn);
                let mut out = vec![Notification::Initialized { player_id }];
                if self.load_map(&game_map, is_demo) {
                    out.push(Notification::MapStarted { is_demo });
                }
                out
            }
            ServerEvent::StartMap { game_map, is_demo } => {
                if !self.load_map(&game_map, is_demo) {
                    return Vec::new();
                }
                vec![Notification::MapStarted { is_demo }]
            }
            ServerEvent::EndMap { is_game_over, scores } => {
                self.shot.set_has_turn(false);
                let heading = if is_game_over { GAME_OVER_HEADING } else { WAITING_HEADING };
                self.shot.set_heading(Some(heading.to_owned()));
                vec![Notification::MapEnded { is_game_over, scores }]
            }
            ServerEvent::StatusChange { player_id, status } => {
                if !self.is_local(player_id) {
                    return Vec::new();
                }
                match status {
                    PlayerStatus::IsPlayerTurn => self.shot.set_has_turn(true),
                    PlayerStatus::Other(status) => log::debug!("ignoring status {status}"),
                }
                Vec::new()
            }
            ServerEvent::TurnBegin { player_id } => {
                if self.is_local(player_id) {
                    self.shot.set_has_turn(true);
                }
                Vec::new()
            }
            ServerEvent::Update { player_states } => {
                let balls = balls_from_states(&player_states);
                self.shot.set_balls(balls.clone(), now_ms);
                self.sprites.set_balls(balls);
                Vec::new()
            }
            ServerEvent::Effect { value, player_id } => {
                self.shot.trigger_effect(value.label(), now_ms);
                if value == EffectKind::Hole {
                    if let Some(id) = player_id.or(self.identity.id) {
                        self.sprites.start_hole_animation(id);
                    }
                }
                Vec::new()
            }
            ServerEvent::SaveDemoMap { jwt } => vec![Notification::SaveDemo { jwt }],
            ServerEvent::Error { value } => {
                log::warn!("server error: {value}");
                vec![Notification::ServerError { message: value }]
            }
            ServerEvent::Unknown => Vec::new(),
        }
    }

    fn is_local(&self, player_id: PlayerId) -> bool {
        self.identity.id == Some(player_id)
    }

    fn adopt_identity(&mut self, player_id: PlayerId, name: &str, token: &str) {
        self.identity.id = Some(player_id);
        self.shot.set_player_id(player_id);
        self.sprites.set_player_id(player_id);
        if let Err(e) = self.identities.save_player_id(&self.game_id, player_id) {
            log::warn!("could not store player id: {e}");
        }
        if !name.is_empty() && name != self.identity.name {
            self.identity.name = name.to_owned();
            if let Err(e) = self.identities.save_name(&self.game_id, name) {
                log::warn!("could not store player name: {e}");
            }
        }
        if !token.is_empty() {
            self.identity.token = Some(token.to_owned());
            if let Err(e) = self.identities.save_token(&self.game_id, token) {
                log::warn!("could not store session token: {e}");
            }
        }
    }

    /// Decode and install a map on every layer. A bad map is logged and
    /// leaves the previous one in place.
    fn load_map(&mut self, dto: &GameMapDto, is_demo: bool) -> bool {
        let map = match GameMap::from_dto(dto) {
            Ok(map) => Rc::new(map),
            Err(e) => {
                log::warn!("dropping undecodable map {:?}: {e}", dto.id);
                return false;
            }
        };
        self.ground.set_game_map(Rc::clone(&map));
        self.structures.set_game_map(Rc::clone(&map));
        self.map = Some(map);
        self.is_demo = is_demo;
        self.shot.set_heading(None);
        true
    }
}
