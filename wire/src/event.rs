//! Game connection events.
//!
//! Every message is one JSON object whose `type` field names the variant.
//! The server pushes [`ServerEvent`]s; the client sends [`ClientEvent`]s.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dto::GameMapDto;

/// Numeric player identifier assigned by the server.
pub type PlayerId = i64;

/// One ball as reported by an `UPDATE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shot_count: i64,
}

/// Player status carried by `STATUS_CHANGE`.
///
/// Only the turn status changes client behaviour; every other value is kept
/// verbatim so it can be shown or logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerStatus {
    IsPlayerTurn,
    Other(String),
}

const IS_PLAYER_TURN: &str = "IS_PLAYER_TURN";

impl From<String> for PlayerStatus {
    fn from(value: String) -> Self {
        if value == IS_PLAYER_TURN { Self::IsPlayerTurn } else { Self::Other(value) }
    }
}

impl From<PlayerStatus> for String {
    fn from(value: PlayerStatus) -> Self {
        match value {
            PlayerStatus::IsPlayerTurn => IS_PLAYER_TURN.to_owned(),
            PlayerStatus::Other(value) => value,
        }
    }
}

/// Named transient effect carried by `EFFECT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectKind {
    None,
    Hole,
    Collision,
    Water,
    Other(String),
}

impl EffectKind {
    /// Label shown in the status line.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::None => "NONE",
            Self::Hole => "HOLE",
            Self::Collision => "COLLISION",
            Self::Water => "WATER",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for EffectKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NONE" => Self::None,
            "HOLE" => Self::Hole,
            "COLLISION" => Self::Collision,
            "WATER" => Self::Water,
            _ => Self::Other(value),
        }
    }
}

impl From<EffectKind> for String {
    fn from(value: EffectKind) -> Self {
        match value {
            EffectKind::Other(value) => value,
            known => known.label().to_owned(),
        }
    }
}

/// Messages pushed by the server, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    /// Another player entered the lobby.
    #[serde(rename_all = "camelCase")]
    Join {
        player_id: PlayerId,
        #[serde(default)]
        name: String,
    },
    /// Identity assignment for this connection.
    #[serde(rename_all = "camelCase")]
    Init {
        player_id: PlayerId,
        #[serde(default)]
        name: String,
        #[serde(default)]
        token: String,
    },
    /// Full session restore after a dropped connection.
    #[serde(rename_all = "camelCase")]
    Reconnect {
        game_map: GameMapDto,
        #[serde(default)]
        is_demo: bool,
        player_id: PlayerId,
        #[serde(default)]
        name: String,
        #[serde(default)]
        is_turn: bool,
    },
    #[serde(rename_all = "camelCase")]
    StartMap {
        game_map: GameMapDto,
        #[serde(default)]
        is_demo: bool,
    },
    /// Scores keyed by player id (as a string), one entry per finished map.
    #[serde(rename_all = "camelCase")]
    EndMap {
        #[serde(default)]
        is_game_over: bool,
        #[serde(default)]
        scores: BTreeMap<String, Vec<i64>>,
    },
    #[serde(rename_all = "camelCase")]
    StatusChange { player_id: PlayerId, status: PlayerStatus },
    #[serde(rename_all = "camelCase")]
    Update { player_states: Vec<PlayerState> },
    #[serde(rename_all = "camelCase")]
    Effect {
        value: EffectKind,
        #[serde(default)]
        player_id: Option<PlayerId>,
    },
    /// Permission to persist the current demo map.
    SaveDemoMap { jwt: String },
    Error { value: String },
    /// Older servers announce the turn with this instead of `STATUS_CHANGE`.
    #[serde(rename_all = "camelCase")]
    TurnBegin { player_id: PlayerId },
    #[serde(other)]
    Unknown,
}

impl ServerEvent {
    /// Wire discriminant, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "JOIN",
            Self::Init { .. } => "INIT",
            Self::Reconnect { .. } => "RECONNECT",
            Self::StartMap { .. } => "START_MAP",
            Self::EndMap { .. } => "END_MAP",
            Self::StatusChange { .. } => "STATUS_CHANGE",
            Self::Update { .. } => "UPDATE",
            Self::Effect { .. } => "EFFECT",
            Self::SaveDemoMap { .. } => "SAVE_DEMO_MAP",
            Self::Error { .. } => "ERROR",
            Self::TurnBegin { .. } => "TURN_BEGIN",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Messages the client originates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientEvent {
    /// Stroke as a relative offset from the ball.
    Shot { x: f64, y: f64 },
    IsReady { value: bool },
}
