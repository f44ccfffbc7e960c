//! Presentation hosts: whatever finally shows the resolved address.
//!
//! [`PresentationHost::present`] takes over the calling thread until the user
//! closes the window.  Native windowing toolkits require that this is the
//! process's main thread.
//!
//! | Host                          | When                                        |
//! |-------------------------------|---------------------------------------------|
//! | `WebViewHost`                 | Windows, macOS, or the `webview` feature    |
//! | [`HeadlessHost`]              | other platforms without `webview`           |
//! | [`RecordingPresentationHost`] | tests                                       |
//!
//! [`native_host`] picks the right one for the build.

mod headless;
mod recording;
#[cfg(any(feature = "webview", target_os = "windows", target_os = "macos"))]
mod webview;

pub use headless::HeadlessHost;
pub use recording::RecordingPresentationHost;
#[cfg(any(feature = "webview", target_os = "windows", target_os = "macos"))]
pub use webview::WebViewHost;

use thiserror::Error;
use tokio::runtime::Handle;

use crate::domain::WindowSpec;

/// Whether [`native_host`] opens a real window in this build.
pub const NATIVE_WINDOW: bool = cfg!(any(
    feature = "webview",
    target_os = "windows",
    target_os = "macos"
));

/// Failures while creating or running the window.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// The native window could not be created.
    #[error("failed to create window: {0}")]
    Window(String),

    /// The embedded browser view could not be created.
    #[error("failed to create web view: {0}")]
    WebView(String),

    /// Waiting for the host to finish failed.
    #[error("presentation host stopped unexpectedly: {0}")]
    Interrupted(String),
}

/// Shows a [`WindowSpec`] and blocks until it is dismissed.
pub trait PresentationHost {
    /// Presents `spec`.  Returns once the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PresentationError`] if the window or browser view cannot be
    /// created.
    fn present(&self, spec: WindowSpec) -> Result<(), PresentationError>;
}

/// The host that shows a real window in this build, or [`HeadlessHost`]
/// where no browser view is linked.
///
/// `runtime` is where the local content server runs.
#[cfg(any(feature = "webview", target_os = "windows", target_os = "macos"))]
pub fn native_host(_runtime: Handle) -> Box<dyn PresentationHost> {
    Box::new(WebViewHost::new())
}

/// The host that shows a real window in this build, or [`HeadlessHost`]
/// where no browser view is linked.
///
/// `runtime` is where the local content server runs.
#[cfg(not(any(feature = "webview", target_os = "windows", target_os = "macos")))]
pub fn native_host(runtime: Handle) -> Box<dyn PresentationHost> {
    Box::new(HeadlessHost::new(runtime))
}

/// Top-left position that centres a window of `window` size on a monitor at
/// `monitor_origin` with `monitor` size.  All values are physical pixels.
///
/// A window larger than the monitor is pinned to the monitor's top-left
/// corner so its title bar stays reachable.
pub fn centered_origin(
    monitor_origin: (i32, i32),
    monitor: (u32, u32),
    window: (u32, u32),
) -> (i32, i32) {
    let offset = |screen: u32, win: u32| -> i32 {
        i32::try_from(screen.saturating_sub(win) / 2).unwrap_or(0)
    };
    (
        monitor_origin.0 + offset(monitor.0, window.0),
        monitor_origin.1 + offset(monitor.1, window.1),
    )
}
