// Library root
// -----------
// This crate exposes the flashcard client as a library. The binary
// (`main.rs`) wires these modules into a CLI.
//
// Module responsibilities:
// - `api`: HTTP calls to the flashcard server (upload, generate) and the
//   wire types they exchange.
// - `config`: defaults, config file and environment overrides.
// - `controller`: application state and the Extract / Generate / Clear
//   actions.
// - `render`: pure mapping from cards to what is displayed, plus the
//   terminal formatter.
// - `ui`: the interactive terminal menu.
pub mod api;
pub mod config;
pub mod controller;
pub mod render;
pub mod ui;
