//! Test double that records what it was asked to show.

use std::sync::Mutex;

use super::{PresentationError, PresentationHost};
use crate::domain::WindowSpec;

/// Records every presented [`WindowSpec`] and returns immediately.
///
/// An optional hook runs inside `present`, while the caller is still
/// "showing the window", so tests can observe state that only exists for
/// the lifetime of the presentation (such as the local content server).
#[derive(Default)]
pub struct RecordingPresentationHost {
    presented: Mutex<Vec<WindowSpec>>,
    on_present: Option<Box<dyn Fn(&WindowSpec) + Send + Sync>>,
}

impl RecordingPresentationHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `hook` each time a window is presented.
    pub fn with_hook(hook: impl Fn(&WindowSpec) + Send + Sync + 'static) -> Self {
        Self {
            presented: Mutex::new(Vec::new()),
            on_present: Some(Box::new(hook)),
        }
    }

    /// Everything presented so far, oldest first.
    pub fn presented(&self) -> Vec<WindowSpec> {
        match self.presented.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PresentationHost for RecordingPresentationHost {
    fn present(&self, spec: WindowSpec) -> Result<(), PresentationError> {
        if let Some(hook) = &self.on_present {
            hook(&spec);
        }
        match self.presented.lock() {
            Ok(mut guard) => guard.push(spec),
            Err(poisoned) => poisoned.into_inner().push(spec),
        }
        Ok(())
    }
}
