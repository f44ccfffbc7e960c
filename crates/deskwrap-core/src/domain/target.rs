//! Classification of a configured target string.
//!
//! A target is either a remote address that the browser view loads directly,
//! or a reference to content shipped next to the application.  The rule is a
//! plain prefix check:
//!
//! | Target                      | Mode   | Entry document     |
//! |-----------------------------|--------|--------------------|
//! | `https://github.com`        | Remote | –                  |
//! | `http://intranet/wiki`      | Remote | –                  |
//! | `index.html`                | Local  | `index.html`       |
//! | `docs/guide.html#install`   | Local  | `docs/guide.html`  |
//! | `/abs/path/page.html`       | Local  | none (root index)  |
//! | `file:///tmp/x.html`        | Local  | none (root index)  |
//!
//! Nothing is rejected here.  A target that points at a file which does not
//! exist is only noticed when the browser view asks the local server for it.

use tracing::warn;

use crate::domain::address::ResolvedAddress;

/// How the runner has to present a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServingMode {
    /// Load the URL as-is; no local server is started.
    Remote { address: ResolvedAddress },
    /// Serve local files and optionally route `/` to a specific document.
    ///
    /// `entry` is `None` when the target names the root index or when it
    /// cannot be expressed as a path inside the serving root.
    Local { entry: Option<EntryDocument> },
}

impl ServingMode {
    /// Returns `true` if a local content server is required.
    pub fn is_local(&self) -> bool {
        matches!(self, ServingMode::Local { .. })
    }
}

/// A document inside the serving root that the browser should land on.
///
/// The path is stored in cleaned form: `/`-separated, no leading slash, no
/// `.` or `..` segments.  Any `?query` or `#fragment` from the original target
/// is kept verbatim in `suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDocument {
    path: String,
    suffix: String,
}

impl EntryDocument {
    /// Parses a relative target into an entry document.
    ///
    /// Returns `None` for targets that name the root itself (`""`, `.`, `./`)
    /// and for targets that cannot live inside the serving root: absolute
    /// paths, Windows drive paths, URLs with any scheme, and paths whose
    /// `..` segments climb above the root.
    pub fn parse(target: &str) -> Option<Self> {
        let target = target.trim();
        if target.contains("://") || is_absolute(target) {
            return None;
        }

        let split_at = target.find(['?', '#']).unwrap_or(target.len());
        let (raw_path, suffix) = target.split_at(split_at);

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw_path.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    // Climbing above the root is not representable.
                    segments.pop()?;
                }
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return None;
        }

        Some(Self {
            path: segments.join("/"),
            suffix: suffix.to_string(),
        })
    }

    /// The cleaned relative path, e.g. `docs/guide.html`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The original `?query`/`#fragment` suffix, possibly empty.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns `true` if this entry is what a plain request for `/` already
    /// serves, so no redirect is needed.
    pub fn is_root_index(&self) -> bool {
        self.path == "index.html" && self.suffix.is_empty()
    }

    /// The absolute URL path (leading `/`, percent-encoded segments) plus the
    /// original suffix, suitable for an HTTP `Location` header.
    pub fn url_path(&self) -> String {
        let mut out = String::with_capacity(self.path.len() + self.suffix.len() + 1);
        for segment in self.path.split('/') {
            out.push('/');
            encode_segment(segment, &mut out);
        }
        out.push_str(&self.suffix);
        out
    }
}

/// Decides how `target` must be presented.
///
/// Targets beginning with `http://` or `https://` are remote and are returned
/// unchanged.  Everything else is local.
pub fn classify_target(target: &str) -> ServingMode {
    if let Ok(address) = ResolvedAddress::remote(target) {
        return ServingMode::Remote { address };
    }

    let entry = EntryDocument::parse(target);
    if entry.is_none() && !names_root(target) {
        warn!("local target '{target}' is not a path inside the serving root; showing the root index instead");
    }
    ServingMode::Local { entry }
}

/// Applies the interactive-prompt heuristic of the packaging tool to a target
/// typed by a user.
///
/// - Surrounding whitespace is trimmed; an empty string stays empty.
/// - Strings that already contain `://` are kept.
/// - Strings ending in lowercase `.html` or `.htm` are kept (they name local
///   files).  The suffix match is case-sensitive.
/// - Anything else is treated as a bare host name and prefixed with `http://`.
pub fn normalize_target(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.contains("://") || trimmed.ends_with(".html") || trimmed.ends_with(".htm") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn names_root(target: &str) -> bool {
    matches!(target.trim(), "" | "." | "./" | ".\\")
}

fn is_absolute(target: &str) -> bool {
    let bytes = target.as_bytes();
    let drive_letter = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    target.starts_with('/') || target.starts_with('\\') || drive_letter
}

/// Percent-encodes one path segment, keeping RFC 3986 `pchar` characters.
fn encode_segment(segment: &str, out: &mut String) {
    for byte in segment.bytes() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'-' | b'.' | b'_' | b'~' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*'
                    | b'+' | b',' | b';' | b'=' | b':' | b'@'
            );
        if keep {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
