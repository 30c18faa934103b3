//! Content fingerprinting for shiftwatch.
//!
//! Wraps BLAKE3. Fingerprints are pure functions of the input bytes, so the
//! same content read from disk or from the network yields the same value.

pub mod digest;

pub use digest::{fingerprint, fingerprint_of_file, fingerprint_reader, CycleDigest};
