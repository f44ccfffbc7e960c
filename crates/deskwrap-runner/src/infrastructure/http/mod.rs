//! Minimal HTTP/1.1 building blocks for the local content server.
//!
//! The server only ever talks to the embedded browser view of the same
//! process, over loopback, and only serves static files.  That narrow job
//! needs a small, fully-understood subset of HTTP:
//!
//! | Module          | Responsibility                                          |
//! |-----------------|---------------------------------------------------------|
//! | `request`       | Request-head parsing and URL-path sanitisation          |
//! | `response`      | Status codes, response heads, and response bodies       |
//! | `content_type`  | `Content-Type` inference from file extensions           |
//! | `range`         | Single `Range: bytes=…` request evaluation              |
//!
//! Everything here is pure except [`response::Body::File`], which carries an
//! open file handle for the connection task to stream.

pub mod content_type;
pub mod range;
pub mod request;
pub mod response;

pub use content_type::content_type_for;
pub use range::{evaluate_range, RangeOutcome};
pub use request::{sanitize_path, HttpVersion, Method, PathError, Request, RequestError};
pub use response::{Body, Reply, ResponseHead, StatusCode};
