//! What the presentation host is asked to show.

use deskwrap_core::{AppConfiguration, ResolvedAddress};

/// A fully resolved description of the application window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
    /// Where the browser view navigates once the window exists.
    pub address: ResolvedAddress,
    /// Place the window in the middle of the current monitor.
    pub centered: bool,
    pub resizable: bool,
}

impl WindowSpec {
    /// Builds the window description for `config`, navigating to `address`.
    pub fn new(config: &AppConfiguration, address: ResolvedAddress) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            address,
            centered: true,
            resizable: true,
        }
    }
}
