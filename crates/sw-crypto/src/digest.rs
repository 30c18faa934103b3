use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sw_types::Fingerprint;

/// Fingerprint an in-memory byte sequence.
pub fn fingerprint(data: &[u8]) -> Fingerprint {
    Fingerprint::from_hash(*blake3::hash(data).as_bytes())
}

/// Fingerprint everything a reader yields.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Fingerprint> {
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(Fingerprint::from_hash(*hasher.finalize().as_bytes()))
}

/// Fingerprint a file on disk. Read failures surface unchanged; the digest
/// is the same one [`fingerprint`] gives for the file's bytes.
pub fn fingerprint_of_file(path: &Path) -> io::Result<Fingerprint> {
    fingerprint_reader(File::open(path)?)
}

/// Running digest over the per-item fingerprints of one cycle.
///
/// Each pushed fingerprint contributes its 64-character hex text, so
/// [`finish`](Self::finish) equals `fingerprint(concat(hex_1, hex_2, ...))`
/// in push order.
#[derive(Default)]
pub struct CycleDigest {
    hasher: blake3::Hasher,
    count: usize,
}

impl CycleDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fp: &Fingerprint) {
        self.hasher.update(fp.to_hex().as_bytes());
        self.count += 1;
    }

    /// Number of fingerprints pushed so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn finish(&self) -> Fingerprint {
        Fingerprint::from_hash(*self.hasher.finalize().as_bytes())
    }
}
