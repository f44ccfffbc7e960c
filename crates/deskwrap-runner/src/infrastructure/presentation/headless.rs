//! Host for builds without a native window.

use tokio::runtime::Handle;
use tracing::info;

use super::{PresentationError, PresentationHost};
use crate::domain::WindowSpec;

/// Logs the address for an external browser and blocks until Ctrl+C.
///
/// The local content server keeps running on `runtime` in the meantime.
pub struct HeadlessHost {
    runtime: Handle,
}

impl HeadlessHost {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl PresentationHost for HeadlessHost {
    fn present(&self, spec: WindowSpec) -> Result<(), PresentationError> {
        info!(
            "no browser view in this build; open {} in a browser ({}, {}x{})",
            spec.address, spec.title, spec.width, spec.height
        );
        info!("press Ctrl+C to quit");
        self.runtime
            .block_on(tokio::signal::ctrl_c())
            .map_err(|e| PresentationError::Interrupted(e.to_string()))?;
        info!("Ctrl+C received; shutting down");
        Ok(())
    }
}
