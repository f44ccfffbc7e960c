//! HTTP request-head parsing and URL-path sanitisation.
//!
//! A request head looks like this on the wire:
//!
//! ```text
//! GET /docs/guide.html?lang=en HTTP/1.1\r\n
//! Host: localhost:49152\r\n
//! Accept: text/html\r\n
//! \r\n
//! ```
//!
//! [`Request::parse`] turns the head (everything before the blank line) into
//! a [`Request`].  Request bodies are never read; the connection is closed
//! after answering a request that carries one.

use thiserror::Error;

/// Errors in the request line or header block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The request line is not `METHOD SP TARGET SP VERSION`.
    #[error("malformed request line")]
    MalformedRequestLine,

    /// The version token is `HTTP/x.y` but not 1.0 or 1.1.
    #[error("unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// A header line has no `:` or an invalid field name.
    #[error("malformed header line")]
    MalformedHeader,

    /// The request target is not in origin form (`/path?query`).
    #[error("request target must be an absolute path: '{0}'")]
    BadTarget(String),
}

/// Errors while turning a URL path into filesystem segments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A `%` is not followed by two hex digits.
    #[error("invalid percent-escape in path")]
    BadEscape,

    /// The decoded path is not valid UTF-8.
    #[error("path is not valid UTF-8")]
    NotUtf8,

    /// A segment contains a character that could address something outside
    /// the serving root on some platform.
    #[error("path segment contains a forbidden character")]
    ForbiddenCharacter,
}

/// Request method.  Only `HEAD` changes behaviour (no body is sent); every
/// other method is served like `GET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Other(String),
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Other(m) => m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
}

/// A parsed request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// The path part of the target, still percent-encoded.  Always starts
    /// with `/`.
    pub path: String,
    /// The query string without the leading `?`, if any.
    pub query: Option<String>,
    pub version: HttpVersion,
    headers: Vec<(String, String)>,
}

impl Request {
    /// Parses a request head.  Both `\r\n` and bare `\n` line endings are
    /// accepted; parsing stops at the first empty line.
    ///
    /// # Errors
    ///
    /// See [`RequestError`].
    pub fn parse(head: &str) -> Result<Self, RequestError> {
        let mut lines = head.lines();

        let request_line = lines.next().ok_or(RequestError::MalformedRequestLine)?;
        let mut parts = request_line.split(' ');
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(RequestError::MalformedRequestLine);
        };
        if method.is_empty() || target.is_empty() {
            return Err(RequestError::MalformedRequestLine);
        }

        let version = match version {
            "HTTP/1.1" => HttpVersion::Http11,
            "HTTP/1.0" => HttpVersion::Http10,
            v if v.starts_with("HTTP/") => {
                return Err(RequestError::UnsupportedVersion(v.to_string()))
            }
            _ => return Err(RequestError::MalformedRequestLine),
        };

        if !target.starts_with('/') {
            return Err(RequestError::BadTarget(target.to_string()));
        }
        // Browsers never send fragments, but drop one if present.
        let target = target.split('#').next().unwrap_or(target);
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (target.to_string(), None),
        };

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').ok_or(RequestError::MalformedHeader)?;
            if name.is_empty() || name.contains(|c: char| c.is_ascii_whitespace()) {
                return Err(RequestError::MalformedHeader);
            }
            headers.push((name.to_string(), value.trim().to_string()));
        }

        Ok(Self {
            method: Method::parse(method),
            path,
            query,
            version,
            headers,
        })
    }

    /// Returns the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the client is willing to reuse the connection.
    pub fn wants_keep_alive(&self) -> bool {
        let connection = self.header("Connection").unwrap_or("");
        let has_token = |token: &str| {
            connection
                .split(',')
                .any(|t| t.trim().eq_ignore_ascii_case(token))
        };
        match self.version {
            HttpVersion::Http11 => !has_token("close"),
            HttpVersion::Http10 => has_token("keep-alive"),
        }
    }

    /// Whether the request announces a body.  Bodies are never read, so the
    /// connection cannot be reused after such a request.
    pub fn has_body(&self) -> bool {
        if self.header("Transfer-Encoding").is_some() {
            return true;
        }
        self.header("Content-Length")
            .map(|v| v.parse::<u64>().map_or(true, |n| n > 0))
            .unwrap_or(false)
    }
}

/// Decodes and cleans a URL path into filesystem segments.
///
/// - `%XX` escapes are decoded before splitting, so `%2F` acts as a separator
///   and `..%2F` is cleaned like `../`.
/// - Empty and `.` segments are dropped.
/// - `..` removes the previous segment and never climbs above the root.
/// - Segments containing `\` or NUL (and `:` on Windows) are rejected.
///
/// # Errors
///
/// See [`PathError`].
pub fn sanitize_path(raw: &str) -> Result<Vec<String>, PathError> {
    let decoded = String::from_utf8(percent_decode(raw)?).map_err(|_| PathError::NotUtf8)?;

    let mut segments: Vec<String> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => {
                if other.contains(is_forbidden) {
                    return Err(PathError::ForbiddenCharacter);
                }
                segments.push(other.to_string());
            }
        }
    }
    Ok(segments)
}

fn is_forbidden(c: char) -> bool {
    c == '\\' || c == '\0' || (cfg!(windows) && c == ':')
}

fn percent_decode(raw: &str) -> Result<Vec<u8>, PathError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
            let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                _ => return Err(PathError::BadEscape),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
