//! HTTP byte-range planning.
//!
//! Parses a `Range` request header against a known total size and computes
//! the concrete span to serve. The accepted grammar is deliberately narrow:
//! `bytes=<start>-<end>` and `bytes=<start>-`. Everything else (suffix
//! ranges, multi-range, malformed input) falls back to a whole-file transfer
//! rather than an error, matching how permissive clients behave in the wild.
//! Only a start at or past the end of the file is a hard 416.

/// A concrete, inclusive byte span within a file of `total` bytes.
///
/// Invariant: `start <= end <= total - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteRange {
    /// Number of bytes in the span; at least 1 by construction.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a 206 response.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Outcome of planning a range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePlan {
    /// No usable range requested; serve the whole file with status 200.
    NotRequested,
    /// Start lies beyond the file; answer 416 with `Content-Range: bytes */total`.
    Unsatisfiable { total: u64 },
    /// Serve this span with status 206.
    Satisfiable(ByteRange),
}

/// Plan the span to serve for an optional `Range` header against `total` bytes.
pub fn plan(header: Option<&str>, total: u64) -> RangePlan {
    let Some(raw) = header else {
        return RangePlan::NotRequested;
    };

    let Some(range_set) = raw.trim().strip_prefix("bytes=") else {
        return RangePlan::NotRequested;
    };

    // Multi-range requests are out of scope; treat as not requested.
    if range_set.contains(',') {
        return RangePlan::NotRequested;
    }

    let Some((start_str, end_str)) = range_set.split_once('-') else {
        return RangePlan::NotRequested;
    };

    // Suffix ranges ("-500") are not supported.
    let Ok(start) = start_str.trim().parse::<u64>() else {
        return RangePlan::NotRequested;
    };

    let end_str = end_str.trim();
    let requested_end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return RangePlan::NotRequested,
        }
    };

    if let Some(end) = requested_end {
        if end < start {
            return RangePlan::NotRequested;
        }
    }

    if start >= total {
        return RangePlan::Unsatisfiable { total };
    }

    let end = requested_end.unwrap_or(total - 1).min(total - 1);
    RangePlan::Satisfiable(ByteRange { start, end, total })
}
