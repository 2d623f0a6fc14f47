//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal setup, key handling and the event loop that
//!   feeds [`crate::core::app::App`].
//! - [`renderer`]: pure drawing of an `App` into a frame.
//! - [`theme`], [`appearance`] and [`builtin_themes`]: light/dark palettes and
//!   picking the starting one.
//!
//! This layer only presents and captures interaction; conversation rules live
//! in [`crate::core`].

pub mod appearance;
pub mod builtin_themes;
pub mod chat_loop;
pub mod renderer;
pub mod theme;
