//! Maps requests onto files under the serving root.
//!
//! | Request                                  | Response                         |
//! |------------------------------------------|----------------------------------|
//! | `/` with a non-index entry document      | `302` → entry document           |
//! | path to a regular file                   | `200` (or `206`/`416` for ranges)|
//! | directory path ending in `/`             | its `index.html`, else `404`     |
//! | directory path without trailing `/`      | `301` → same path plus `/`       |
//! | nothing on disk                          | `404`                            |
//! | undecodable or forbidden path            | `400`                            |
//! | permission denied                        | `403`                            |
//! | any other filesystem error               | `500`                            |

use std::io;
use std::path::{Path, PathBuf};

use deskwrap_core::EntryDocument;
use tokio::io::AsyncSeekExt;
use tracing::warn;

use crate::infrastructure::http::{
    content_type_for, evaluate_range, sanitize_path, Body, RangeOutcome, Reply, Request,
    ResponseHead, StatusCode,
};

/// Name of the file served for a directory request.
pub const INDEX_FILE: &str = "index.html";

/// A read-only static site rooted at a directory.
#[derive(Debug, Clone)]
pub struct StaticSite {
    root: PathBuf,
    entry: Option<EntryDocument>,
}

impl StaticSite {
    /// `entry` is the document a request for `/` is redirected to.  An entry
    /// that is the root index itself is dropped, since `/` already serves it.
    pub fn new(root: PathBuf, entry: Option<EntryDocument>) -> Self {
        let entry = entry.filter(|e| !e.is_root_index());
        Self { root, entry }
    }

    /// Produces the reply for `request`.  Never fails: every problem becomes
    /// an HTTP error status.
    pub async fn respond(&self, request: &Request) -> Reply {
        if request.path == "/" {
            if let Some(entry) = &self.entry {
                return Reply::redirect(StatusCode::Found, entry.url_path());
            }
        }

        let segments = match sanitize_path(&request.path) {
            Ok(segments) => segments,
            Err(e) => {
                warn!("rejecting request path '{}': {e}", request.path);
                return Reply::bad_request();
            }
        };
        let fs_path = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let metadata = match tokio::fs::metadata(&fs_path).await {
            Ok(m) => m,
            Err(e) => return reply_for_io_error(&fs_path, &e),
        };

        if metadata.is_dir() {
            if !request.path.ends_with('/') {
                let location = slash_redirect_location(&request.path, request.query.as_deref());
                return Reply::redirect(StatusCode::MovedPermanently, location);
            }
            let index = fs_path.join(INDEX_FILE);
            return match tokio::fs::metadata(&index).await {
                Ok(m) if m.is_file() => serve_file(&index, m.len(), request).await,
                Ok(_) => Reply::not_found(),
                Err(e) => reply_for_io_error(&index, &e),
            };
        }

        serve_file(&fs_path, metadata.len(), request).await
    }
}

/// `Location` for a directory requested without its trailing slash.
///
/// Relative to the request, so the browser stays on this origin whatever the
/// raw path looks like (`//host/..` must not become a protocol-relative URL).
/// The `./` prefix keeps a segment such as `a:b` from reading as a scheme.
fn slash_redirect_location(raw_path: &str, query: Option<&str>) -> String {
    let last = raw_path.rsplit('/').next().unwrap_or_default();
    let mut location = format!("./{last}/");
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    location
}

/// Opens `path` and builds a `200`, `206`, or `416` reply.
async fn serve_file(path: &Path, len: u64, request: &Request) -> Reply {
    let content_type = content_type_for(path);

    let outcome = request
        .header("Range")
        .map_or(RangeOutcome::Full, |range| evaluate_range(range, len));

    let (mut head, start, body_len) = match outcome {
        RangeOutcome::Full => (ResponseHead::new(StatusCode::Ok), 0, len),
        RangeOutcome::Partial { start, end } => {
            let head = ResponseHead::new(StatusCode::PartialContent)
                .with_header("Content-Range", format!("bytes {start}-{end}/{len}"));
            (head, start, end - start + 1)
        }
        RangeOutcome::Unsatisfiable => {
            let mut reply = Reply::text(StatusCode::RangeNotSatisfiable, "416 Range Not Satisfiable");
            reply.head.push_header("Content-Range", format!("bytes */{len}"));
            return reply;
        }
    };

    let mut file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(e) => return reply_for_io_error(path, &e),
    };
    if start > 0 {
        if let Err(e) = file.seek(io::SeekFrom::Start(start)).await {
            return reply_for_io_error(path, &e);
        }
    }

    head.push_header("Content-Type", content_type);
    head.push_header("Content-Length", body_len.to_string());
    head.push_header("Accept-Ranges", "bytes");

    Reply {
        head,
        body: Body::File {
            file,
            len: body_len,
        },
    }
}

/// Unix `ENOTDIR`: a path component is a regular file.
#[cfg(unix)]
const ENOTDIR: i32 = 20;

fn is_not_found(e: &io::Error) -> bool {
    #[cfg(unix)]
    if e.raw_os_error() == Some(ENOTDIR) {
        return true;
    }
    e.kind() == io::ErrorKind::NotFound
}

fn reply_for_io_error(path: &Path, e: &io::Error) -> Reply {
    if is_not_found(e) {
        Reply::not_found()
    } else if e.kind() == io::ErrorKind::PermissionDenied {
        Reply::forbidden()
    } else {
        warn!("failed to read {}: {e}", path.display());
        Reply::internal_error()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
