//! Local content server configuration.
//!
//! [`ServerConfig`] holds the runtime settings of the loopback static file
//! server.  Production code always uses [`ServerConfig::default`]; tests
//! shrink the timeouts and limits to exercise edge cases quickly.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// All runtime settings for the local content server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to.
    ///
    /// Always a loopback address in production: the served files are only
    /// meant for the embedded browser view of the same process.
    pub bind_ip: IpAddr,

    /// Port to bind.  `0` asks the OS for a free ephemeral port, so several
    /// packaged applications can run side by side without colliding.
    pub port: u16,

    /// Upper bound on the size of a request line plus headers.
    pub max_head_bytes: usize,

    /// How long an idle keep-alive connection is held open waiting for the
    /// next request.
    pub keep_alive_timeout: Duration,
}

impl Default for ServerConfig {
    /// | Field              | Default      |
    /// |--------------------|--------------|
    /// | bind_ip            | `127.0.0.1`  |
    /// | port               | `0`          |
    /// | max_head_bytes     | 8 KiB        |
    /// | keep_alive_timeout | 5 seconds    |
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            max_head_bytes: 8 * 1024,
            keep_alive_timeout: Duration::from_secs(5),
        }
    }
}
