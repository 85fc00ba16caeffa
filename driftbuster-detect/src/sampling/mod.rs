//! Bounded byte sampling and best-effort text decoding.

pub mod codec;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The result of reading a bounded prefix of a file.
pub struct Sample {
    pub bytes: Vec<u8>,
    pub bytes_sampled: usize,
    pub truncated: bool,
}

/// Read at most `sample_size` bytes from `path`. Never reads the whole
/// file into memory beyond the requested bound, and never uses `mmap`.
pub fn read_sample(path: &Path, sample_size: usize) -> std::io::Result<Sample> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; sample_size];
    let mut total = 0;
    loop {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
        if total == buf.len() {
            break;
        }
    }
    buf.truncate(total);

    // Determine truncation by checking whether more data follows.
    let mut probe = [0u8; 1];
    let truncated = file.read(&mut probe)? > 0;

    Ok(Sample {
        bytes: buf,
        bytes_sampled: total,
        truncated,
    })
}

/// Lightweight binary-content probe: presence of a NUL byte within the
/// sample. This is the same heuristic widely used by text tools (e.g.
/// `git`/`grep`) without pulling in a dedicated file-type-sniffing crate,
/// since the detector only needs "text-ish or not", not a MIME type.
pub fn looks_binary(sample: &[u8]) -> bool {
    sample.contains(&0)
}
