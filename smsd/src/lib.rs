//! # SMS Composer Host Runtime
//!
//! This crate runs the composition engine on a workstation.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The composer only draws and asks; the host sends
//! - **Output is frame rendering**: Not terminal state
//! - **Input is explicit key scripts**: Not stdin streams
//! - **Time is simulated**: A fake clock advances in fixed poll steps
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads and validates the composer configuration
//! - Parses keypad scripts into taps, holds and waits
//! - Drives the poll loop against a simulated keypad and clock
//! - Hands outgoing messages to a [`Transport`] and reports the result back
//! - Installs logging for the binary
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Decode keys or edit text (that is `compose_core`)
//! - Talk to a modem or a real network
//! - Sleep in real time

pub mod config;
pub mod key_script;
pub mod logging;
pub mod runtime;
pub mod sim;
pub mod transport;

pub use config::{load_config, parse_config, ConfigLoadError};
pub use key_script::{KeyScript, KeyScriptError, ScriptedInput};
pub use runtime::{HostError, HostRuntime, HostRuntimeConfig, DEFAULT_POLL_MS, DEFAULT_PRESS_MS};
pub use sim::{SimClock, SimKeypad};
pub use transport::{LoopbackTransport, MessageId, SentMessage, Transport, TransportError};
