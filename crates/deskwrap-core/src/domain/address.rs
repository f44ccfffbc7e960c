//! The address the browser view is finally navigated to.
//!
//! A [`ResolvedAddress`] can only be built in two ways, and both guarantee an
//! `http://` or `https://` URL.  A raw filesystem path can never reach the
//! browser view.

use std::fmt;

use thiserror::Error;

/// Error returned when a string is not acceptable as a remote address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The string does not begin with `http://` or `https://`.
    #[error("not an http(s) address: '{0}'")]
    NotHttp(String),
}

/// The final, well-formed address handed to the browser view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    url: String,
    local_port: Option<u16>,
}

impl ResolvedAddress {
    /// Wraps a remote URL, copied verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotHttp`] unless `url` begins with `http://` or
    /// `https://`.
    pub fn remote(url: impl Into<String>) -> Result<Self, AddressError> {
        let url = url.into();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(Self {
                url,
                local_port: None,
            })
        } else {
            Err(AddressError::NotHttp(url))
        }
    }

    /// Builds the address of a local content server listening on `port`.
    pub fn local(port: u16) -> Self {
        Self {
            url: format!("http://localhost:{port}"),
            local_port: Some(port),
        }
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The local server port, or `None` for remote addresses.
    pub fn local_port(&self) -> Option<u16> {
        self.local_port
    }

    /// Returns `true` if the address points at a local content server.
    pub fn is_local(&self) -> bool {
        self.local_port.is_some()
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl From<ResolvedAddress> for String {
    fn from(addr: ResolvedAddress) -> Self {
        addr.url
    }
}
