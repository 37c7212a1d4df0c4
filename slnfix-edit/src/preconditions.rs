use camino::Utf8Path;
use sha2::{Digest, Sha256};
use slnfix_domain::FileView;
use slnfix_types::UpdateError;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Fails with [`UpdateError::ConcurrentModification`] when `path` no longer hashes to `expected`.
pub fn check_unchanged(
    files: &dyn FileView,
    path: &Utf8Path,
    expected: &str,
) -> Result<(), UpdateError> {
    let current = files.read_to_string(path)?;
    let actual = sha256_hex(current.as_bytes());
    if actual == expected {
        Ok(())
    } else {
        tracing::warn!(solution = %path, expected, actual = %actual, "sha mismatch");
        Err(UpdateError::ConcurrentModification {
            path: path.to_path_buf(),
        })
    }
}
