//! Encore command-line front end
//!
//! Library half of the `encore` binary: configuration, the headless playback
//! session and the subcommands, kept out of `main.rs` so they can be tested.

pub mod commands;
pub mod config;
pub mod error;
pub mod session;

pub use commands::{App, PlayOptions};
pub use config::EncoreConfig;
pub use error::{CliError, Result};
pub use session::{HeadlessSession, SessionReport};
