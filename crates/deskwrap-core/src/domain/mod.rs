//! Domain layer for deskwrap.
//!
//! Pure types and functions with no dependencies on I/O beyond parsing bytes
//! that the caller has already read.  Everything here can be tested without a
//! filesystem, a network, or a display.
//!
//! # What belongs in the domain layer?
//!
//! - The configuration record shape and its validation rules
//! - Target classification (remote vs. local)
//! - Serving-root derivation from an executable path
//! - The resolved address type and its well-formedness invariant
//!
//! # What does NOT belong here?
//!
//! - Reading files, binding sockets, or locating the running executable
//! - Anything async

pub mod address;
pub mod bundle;
pub mod config;
pub mod target;
