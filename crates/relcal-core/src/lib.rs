//! # relcal-core — Foundational Types for the relcal Document Service
//!
//! This crate defines the primitives every other relcal crate builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Fingerprints are opaque tokens.** A [`Fingerprint`] is the quoted
//!    HTTP entity tag of a byte sequence. It is produced by [`fingerprint()`]
//!    and compared through [`Precondition`], never by ad hoc string surgery
//!    in handlers.
//!
//! 2. **One sentinel for "no content".** Absent content and a zero-length
//!    buffer both map to [`Fingerprint::absent()`] (`"0"`). The fingerprint
//!    of a real JSON value such as `{}` is always a hash.
//!
//! 3. **Validated document names.** [`DocumentName`] rejects anything that
//!    could escape the data directory, so a name can always be turned into
//!    a file path.
//!
//! 4. **UTC backup timestamps.** [`BackupStamp`] renders as the fixed-width
//!    `YYYYMMDD-HHMMSS` token, so lexicographic order equals chronological
//!    order.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `relcal-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod name;
pub mod temporal;

pub use digest::{fingerprint, fingerprint_of, sha256_hex, Fingerprint, Precondition};
pub use error::CoreError;
pub use name::DocumentName;
pub use temporal::BackupStamp;
