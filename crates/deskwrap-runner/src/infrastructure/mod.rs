//! Infrastructure layer for deskwrap-runner.
//!
//! The infrastructure layer handles all I/O: reading the configuration file,
//! accepting HTTP connections from the embedded browser view, reading served
//! files from disk, and driving the native window.
//!
//! # Responsibilities
//!
//! - Reading `config.json` from beside the executable
//! - Binding the loopback listener on an OS-assigned port
//! - Parsing HTTP requests and writing static-file responses
//! - Spawning per-connection Tokio tasks
//! - Creating the native window and browser view
//!
//! # What does NOT belong here?
//!
//! - Deciding remote vs. local (that is `deskwrap-core`)
//! - Ordering the startup steps (that is the application layer)

pub mod config_loader;
pub mod http;
pub mod presentation;
pub mod static_server;

// Re-export the primary entry points so the application layer can call them
// concisely.
pub use config_loader::load_config;
pub use presentation::{PresentationError, PresentationHost};
pub use static_server::{LocalContentServer, ServeError, ServerHandle};
