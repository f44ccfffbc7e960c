//! Response heads and bodies.

use std::fmt::Write as _;

/// The status codes the local content server can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    PartialContent,
    MovedPermanently,
    Found,
    BadRequest,
    Forbidden,
    NotFound,
    RangeNotSatisfiable,
    RequestHeaderFieldsTooLarge,
    InternalServerError,
    HttpVersionNotSupported,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::PartialContent => 206,
            StatusCode::MovedPermanently => 301,
            StatusCode::Found => 302,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::RangeNotSatisfiable => 416,
            StatusCode::RequestHeaderFieldsTooLarge => 431,
            StatusCode::InternalServerError => 500,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::PartialContent => "Partial Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::RangeNotSatisfiable => "Range Not Satisfiable",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// Status line plus headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusCode,
    headers: Vec<(&'static str, String)>,
}

impl ResponseHead {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Appends a header.  Names are written exactly as given.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Appends a header in place.
    pub fn push_header(&mut self, name: &'static str, value: impl Into<String>) {
        self.headers.push((name, value.into()));
    }

    /// Returns the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serializes the head, including the terminating blank line.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::with_capacity(128);
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "HTTP/1.1 {} {}\r\n",
            self.status.code(),
            self.status.reason()
        );
        for (name, value) in &self.headers {
            let _ = write!(out, "{name}: {value}\r\n");
        }
        out.push_str("\r\n");
        out.into_bytes()
    }
}

/// What follows the head.
#[derive(Debug)]
pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    /// The next `len` bytes of `file`, which is already positioned at the
    /// first byte to send.
    File { file: tokio::fs::File, len: u64 },
}

/// A complete response, ready for the connection task to write.
#[derive(Debug)]
pub struct Reply {
    pub head: ResponseHead,
    pub body: Body,
}

impl Reply {
    /// A short `text/plain` response such as `404 page not found`.
    pub fn text(status: StatusCode, message: &str) -> Self {
        let body = format!("{message}\n").into_bytes();
        let head = ResponseHead::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_header("Content-Length", body.len().to_string());
        Self {
            head,
            body: Body::Bytes(body),
        }
    }

    /// A redirect with an empty body.
    pub fn redirect(status: StatusCode, location: impl Into<String>) -> Self {
        let head = ResponseHead::new(status)
            .with_header("Location", location)
            .with_header("Content-Length", "0");
        Self {
            head,
            body: Body::Empty,
        }
    }

    pub fn not_found() -> Self {
        Self::text(StatusCode::NotFound, "404 page not found")
    }

    pub fn bad_request() -> Self {
        Self::text(StatusCode::BadRequest, "400 bad request")
    }

    pub fn forbidden() -> Self {
        Self::text(StatusCode::Forbidden, "403 Forbidden")
    }

    pub fn internal_error() -> Self {
        Self::text(StatusCode::InternalServerError, "500 Internal Server Error")
    }
}
