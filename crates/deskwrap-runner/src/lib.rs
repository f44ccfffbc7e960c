//! deskwrap-runner library crate.
//!
//! The runner is the executable that ships inside every packaged deskwrap
//! application.  At startup it reads the `config.json` beside itself, decides
//! whether the target is remote or local, starts a loopback static file
//! server for local content, and then opens a native window with an embedded
//! browser view pointed at the result.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! config.json ──► [deskwrap-runner]
//!   ├── domain/           ServerConfig, WindowSpec
//!   ├── application/      Launch sequence: load → resolve → serve → present
//!   └── infrastructure/
//!         ├── config_loader/  Reads the record beside the executable
//!         ├── http/           Request parsing, responses, content types, ranges
//!         ├── static_server/  Loopback accept loop and file lookup (tokio)
//!         └── presentation/   Native window + webview (tao/wry), test double
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `deskwrap-core`, and the
//!   infrastructure entry points it orchestrates.
//! - `infrastructure` owns every socket, file handle, and window.

/// Domain layer: runner-specific configuration types (no I/O).
pub mod domain;

/// Application layer: the launch sequence.
pub mod application;

/// Infrastructure layer: config file, HTTP server, and presentation host.
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;
