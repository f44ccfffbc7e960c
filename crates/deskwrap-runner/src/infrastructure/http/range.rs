//! Evaluation of single byte-range requests.
//!
//! `<video>` and `<audio>` elements in embedded webviews issue `Range`
//! requests to seek.  Only a single range is supported; a syntactically
//! invalid or multi-range header is ignored and the whole file is served.

/// What to send for a given `Range` header and file length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve the whole file with `200 OK`.
    Full,
    /// Serve bytes `start..=end` with `206 Partial Content`.
    Partial { start: u64, end: u64 },
    /// Answer `416 Range Not Satisfiable`.
    Unsatisfiable,
}

/// Evaluates a `Range` header value against a file of `len` bytes.
pub fn evaluate_range(header: &str, len: u64) -> RangeOutcome {
    let Some(spec) = strip_prefix_ignore_case(header.trim(), "bytes=") else {
        return RangeOutcome::Full;
    };
    let spec = spec.trim();
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // Suffix range: the final `n` bytes.
        let Ok(n) = last.parse::<u64>() else {
            return RangeOutcome::Full;
        };
        if n == 0 || len == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial {
            start: len.saturating_sub(n),
            end: len - 1,
        };
    }

    let Ok(start) = first.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<u64>() {
            Ok(end) if end >= start => Some(end),
            _ => return RangeOutcome::Full,
        }
    };

    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }
    let end = end.map_or(len - 1, |e| e.min(len - 1));
    RangeOutcome::Partial { start, end }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
