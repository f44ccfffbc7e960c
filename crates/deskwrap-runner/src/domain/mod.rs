//! Domain layer for deskwrap-runner.
//!
//! Plain configuration structures shared by the application and
//! infrastructure layers.  Nothing here reads the environment or touches the
//! network; the binary and the launch sequence populate these structs.

pub mod server_config;
pub mod window;

pub use server_config::ServerConfig;
pub use window::WindowSpec;
