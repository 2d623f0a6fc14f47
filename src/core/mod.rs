//! Conversation state and the pieces it is built from.
//!
//! [`conversation`] drives a single question/answer turn against the
//! calculation service, [`typing`] owns the animated "calculating" marker and
//! [`voice`] adapts an external speech recognizer. [`app`] gathers all of it
//! into the state object the terminal UI draws.

pub mod app;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod transcript;
pub mod typing;
pub mod voice;
