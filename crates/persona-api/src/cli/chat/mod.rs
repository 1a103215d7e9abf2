//! Interactive chat session.
//!
//! Reads queries from an async readline prompt, streams the character's
//! replies to the terminal, and handles slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
