//! Source file fingerprints.

use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};

/// Fingerprint of a source file: SHA-256 of its modification time and size.
///
/// Any change to either produces a new fingerprint. A file that cannot be
/// inspected has the empty fingerprint.
#[must_use]
pub fn fingerprint(path: &Path) -> String {
    let Ok(metadata) = std::fs::metadata(path) else {
        return String::new();
    };
    let modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(format!("{}.{:09}_{}", modified.as_secs(), modified.subsec_nanos(), metadata.len()));
    format!("{:x}", hasher.finalize())
}

/// Name of a cache entry: the logical key and the source fingerprint.
#[must_use]
pub fn entry_name(key: &str, fingerprint: &str) -> String {
    format!("{key}_{fingerprint}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fingerprint_is_stable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let first = fingerprint(file.path());
        assert_eq!(first.len(), 64);
        assert_eq!(first, fingerprint(file.path()));
    }

    #[test]
    fn test_fingerprint_changes_with_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let before = fingerprint(file.path());

        file.write_all(b"defg").unwrap();
        file.flush().unwrap();
        assert_ne!(before, fingerprint(file.path()));
    }

    #[test]
    fn test_missing_file_has_empty_fingerprint() {
        assert_eq!(fingerprint(Path::new("/nonexistent/file.xlsx")), "");
        assert_eq!(entry_name("receita", ""), "receita_");
    }
}
