//! # deskwrap-core
//!
//! Shared library for deskwrap containing the on-disk configuration record,
//! the decision of how a configured target is displayed, and the resolution of
//! the directory that local content is served from.
//!
//! This crate is used by the runner binary and by anything that produces a
//! runner's configuration (for example a packaging tool).  It has zero
//! dependencies on OS windowing APIs, async runtimes, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! A deskwrap application is a small native executable (the "runner") that
//! opens a window containing an embedded browser view.  Next to the runner
//! sits a `config.json` file that says which page to show.  The page is
//! either a remote web address (`https://example.com`) or a local file that
//! was shipped alongside the application (`index.html`).
//!
//! This crate (`deskwrap-core`) is the pure foundation.  It defines:
//!
//! - **`domain::config`** – The configuration record and its JSON codec.
//!
//! - **`domain::target`** – How a target string is classified as remote or
//!   local, and which entry document a local target names.
//!
//! - **`domain::bundle`** – How the serving root is found when the runner
//!   lives deep inside an application bundle (e.g. `App.app/Contents/MacOS`).
//!
//! - **`domain::address`** – The final address handed to the browser view,
//!   which can only ever be an `http://` or `https://` address.

// Rust will look for the module in src/domain/mod.rs.
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `deskwrap_core::AppConfiguration` instead of the longer module path.
pub use domain::address::{AddressError, ResolvedAddress};
pub use domain::bundle::{serving_root, BundleNesting, MACOS_APP_BUNDLE};
pub use domain::config::{AppConfiguration, ConfigError, CONFIG_FILE_NAME};
pub use domain::target::{classify_target, normalize_target, EntryDocument, ServingMode};
