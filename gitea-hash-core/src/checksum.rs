use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read size used by [`sha256_file`] (64 KiB).
pub const BLOCK_SIZE: usize = 64 * 1024;

/// Lowercase hex SHA-256 of the file at `path`, read in [`BLOCK_SIZE`] blocks.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    sha256_file_with_block_size(path, BLOCK_SIZE)
}

/// Same digest as [`sha256_file`]; `block_size` only changes how the file is read.
pub fn sha256_file_with_block_size(path: &Path, block_size: usize) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; block_size.max(1)];
    loop {
        let n = match f.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
