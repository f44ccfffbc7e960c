//! Application layer for deskwrap-runner.
//!
//! The application layer orders the startup steps: it knows *what* happens
//! and in which order, but delegates *how* to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Locating the configuration record and the serving root
//! - Choosing between a remote address and a local content server
//! - Keeping the server alive for as long as the window is shown
//! - Defining the `LaunchError` type for fatal startup failures
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or files (that is infrastructure)
//! - Creating windows (that is the presentation host)

pub mod launch;

pub use launch::{prepare_launch, resolve_address, LaunchError, LaunchOptions, LaunchPlan};
