//! fundbot is a terminal-first chat client for a remote emergency fund
//! calculation service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the typing indicator, turn sequencing
//!   against the remote service, optional voice input, and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the request/response payloads and the HTTP client for
//!   the calculation service.
//! - [`utils`] holds transcript export, scroll math, and endpoint validation.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions or runs a single turn for `fundbot say`.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
