//! Browser engine for the minigolf game client and map editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns
//! rendering the course, ball sprites and the shot overlay on stacked canvases,
//! turning pointer input into shots, the protocol session over the game
//! socket, and the map editor's paint/erase tools with undo. The host page
//! only supplies canvases and reacts to the JSON notifications it is sent.
//!
//! Everything outside [`web`] is plain Rust with no browser dependency and is
//! tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::GameSession`]: connection state machine and event fan-out |
//! | [`shot`] | Shot input, aim lines and the status overlay |
//! | [`sprite`] | Ball sprites and the hole-in animation |
//! | [`tiles`] | Three-pass map renderer for ground and structures |
//! | [`editor`] | Paint/erase controller with live preview |
//! | [`draft`] | The editor's map with undo/redo and key bindings |
//! | [`history`] | Bounded undo/redo buffer |
//! | [`templates`] | Starting tile grids for new maps |
//! | [`storage`] | Persisted player identity and map drafts |
//! | [`config`] | Server endpoint and game socket URL |
//! | [`surface`] | Logical ↔ device mapping, frames and the [`surface::Layer`] trait |
//! | [`paint`] | The [`paint::Painter`] drawing seam and path builders |
//! | [`geometry`] | Vector math for aiming and grid snapping |
//! | [`input`] | Pointer, key and wheel input types |
//! | [`consts`] | Course dimensions, colours and timings |
//! | [`web`] | `web_sys` bindings and the `#[wasm_bindgen]` entry points |

pub mod config;
pub mod consts;
pub mod draft;
pub mod editor;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod input;
pub mod paint;
pub mod shot;
pub mod sprite;
pub mod storage;
pub mod surface;
pub mod templates;
pub mod tiles;
pub mod web;

#[cfg(test)]
pub(crate) mod recorder;
