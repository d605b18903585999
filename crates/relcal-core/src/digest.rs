//! # Content Fingerprints — ETags and Integrity Hashes
//!
//! Defines [`Fingerprint`], the short content digest used both as the HTTP
//! entity tag of a document and as the optimistic-concurrency token that
//! gates writes, plus [`sha256_hex()`] for the full-length integrity hash
//! written into backup sidecars.
//!
//! ## Format
//!
//! A fingerprint is the first 8 bytes of the SHA-256 of the content,
//! rendered as 16 lowercase hex characters and wrapped in double quotes:
//! `"44136fa355b3678a"`. The quotes are part of the value so it can be
//! copied verbatim into an `ETag` header.
//!
//! ## Sentinel
//!
//! Content that does not exist yet, and a zero-length buffer, both map to
//! the single sentinel `"0"` ([`Fingerprint::absent()`]). The fingerprint
//! of an actual empty JSON value (`{}`, `[]`, `""`) is a regular hash and
//! never equals the sentinel.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a fingerprint.
const FINGERPRINT_BYTES: usize = 8;

/// Opaque tag of the "no content yet" sentinel, without quotes.
const ABSENT_TAG: &str = "0";

/// Quoted short digest of a byte sequence, used as an HTTP entity tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The sentinel fingerprint for absent or empty content.
    pub fn absent() -> Self {
        Self(format!("\"{ABSENT_TAG}\""))
    }

    /// Whether this is the "no content yet" sentinel.
    pub fn is_absent(&self) -> bool {
        self.opaque() == ABSENT_TAG
    }

    /// The quoted form, suitable for an `ETag` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag without its surrounding quotes.
    pub fn opaque(&self) -> &str {
        self.0.trim_matches('"')
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a byte sequence.
///
/// Deterministic and side-effect free. A zero-length buffer yields
/// [`Fingerprint::absent()`].
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    if bytes.is_empty() {
        return Fingerprint::absent();
    }
    let hash = Sha256::digest(bytes);
    Fingerprint(format!("\"{}\"", to_hex(&hash[..FINGERPRINT_BYTES])))
}

/// Compute the fingerprint of content that may not exist.
///
/// `None` models a document whose file has not been created yet.
pub fn fingerprint_of(content: Option<&[u8]>) -> Fingerprint {
    content.map_or_else(Fingerprint::absent, fingerprint)
}

/// Full SHA-256 of a byte sequence as 64 lowercase hex characters.
///
/// Used for backup integrity sidecars, where truncation is not wanted.
pub fn sha256_hex(bytes: &[u8]) -> String {
    to_hex(&Sha256::digest(bytes))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Precondition
// ---------------------------------------------------------------------------

/// A parsed `If-Match` precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// `*` — any current representation satisfies the precondition.
    Any,
    /// One or more opaque tags (quotes and weak prefixes removed).
    Tags(Vec<String>),
}

impl Precondition {
    /// Parse an `If-Match` header value.
    ///
    /// Returns `None` for an empty or whitespace-only value, which callers
    /// treat the same as an absent header. Both quoted (`"abc"`) and bare
    /// (`abc`) tags are accepted, and a `W/` prefix is ignored.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        if header.is_empty() {
            return None;
        }
        if header == "*" {
            return Some(Self::Any);
        }
        let tags: Vec<String> = header
            .split(',')
            .map(str::trim)
            .map(|t| t.strip_prefix("W/").unwrap_or(t))
            .map(|t| t.trim_matches('"'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tags.is_empty() {
            return None;
        }
        Some(Self::Tags(tags))
    }

    /// Build a precondition that matches exactly one fingerprint.
    pub fn exact(fp: &Fingerprint) -> Self {
        Self::Tags(vec![fp.opaque().to_string()])
    }

    /// Whether the current fingerprint satisfies this precondition.
    pub fn matches(&self, current: &Fingerprint) -> bool {
        match self {
            Self::Any => true,
            Self::Tags(tags) => tags.iter().any(|t| t == current.opaque()),
        }
    }
}
