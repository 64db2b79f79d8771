//! Shared map model and JSON event codec for the minigolf game connection.
//!
//! This crate owns the wire representation used by both the browser engine
//! (`canvas`) and the native `cli`. Course maps travel as a compact
//! column-major DTO ([`dto::GameMapDto`]) and are expanded into the tile
//! objects of [`map::GameMap`] on arrival. Events are single JSON objects
//! discriminated by their `type` field.

pub mod dto;
pub mod event;
pub mod map;

pub use dto::GameMapDto;
pub use event::{ClientEvent, EffectKind, PlayerState, PlayerStatus, ServerEvent};
pub use map::{GameMap, Ground, GroundType, Point, Rotation, Structure, StructureType, Tile};

/// Error returned by the decoders in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be parsed as the expected JSON shape.
    #[error("invalid JSON message: {0}")]
    Json(#[from] serde_json::Error),
    /// An enum code on the wire does not map to a known variant.
    #[error("invalid {kind} code: {code}")]
    InvalidCode { kind: &'static str, code: i64 },
    /// A DTO cell is not four comma-separated known codes.
    #[error("invalid tile cell at column {column}, row {row}: {cell:?}")]
    InvalidCell { column: usize, row: usize, cell: String },
    /// DTO columns do not all have the same number of rows.
    #[error("ragged tile grid: column {column} has {len} rows, expected {expected}")]
    RaggedGrid { column: usize, len: usize, expected: usize },
    /// A tile position is negative or not a multiple of the block size.
    #[error("tile at ({x}, {y}) is not aligned to the block grid")]
    Misaligned { x: f64, y: f64 },
    /// A tile sits beyond the largest grid the codec accepts.
    #[error("tile at column {column}, row {row} is outside the {max}x{max} grid limit")]
    OutOfRange { column: usize, row: usize, max: usize },
    /// Two tiles share one grid cell.
    #[error("duplicate tile at column {column}, row {row}")]
    DuplicateTile { column: usize, row: usize },
    /// The tiles leave a hole in the rectangular grid.
    #[error("missing tile at column {column}, row {row}")]
    MissingTile { column: usize, row: usize },
}

/// Decode one server message.
///
/// Unknown `type` discriminants decode to [`ServerEvent::Unknown`] rather
/// than failing, so newer servers can add events without breaking clients.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the text is not a JSON object of a
/// recognised shape.
pub fn decode_server_event(text: &str) -> Result<ServerEvent, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode one client message as JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails (non-finite floats).
pub fn encode_client_event(event: &ClientEvent) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

/// Encode one server message as JSON text. Used by test harnesses and the
/// CLI's offline tooling.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
