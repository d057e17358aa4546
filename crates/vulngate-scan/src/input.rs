use std::path::Path;

use vulngate_core::VulngateError;

/// Read a diff file permissively and trim surrounding whitespace.
///
/// Byte sequences that are not valid UTF-8 are dropped rather than
/// replaced, so a diff touching binary or mis-encoded files still loads.
///
/// # Errors
///
/// Returns [`VulngateError::FileNotFound`] if `path` does not exist, or
/// [`VulngateError::Io`] if it cannot be read.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use vulngate_scan::input::read_diff;
///
/// let diff = read_diff(Path::new("pr.diff")).unwrap();
/// ```
pub fn read_diff(path: &Path) -> Result<String, VulngateError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(VulngateError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(decode_lossy(&bytes).trim().to_string())
}

/// Decode `bytes` as UTF-8, skipping invalid sequences.
///
/// # Examples
///
/// ```
/// use vulngate_scan::input::decode_lossy;
///
/// assert_eq!(decode_lossy(b"ab\xffcd"), "abcd");
/// ```
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_invalid_bytes_instead_of_replacing() {
        let decoded = decode_lossy(b"+let x = \xc3\x28;\n");
        assert_eq!(decoded, "+let x = (;\n");
        assert!(!decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn keeps_valid_multibyte_text() {
        assert_eq!(decode_lossy("+// héllo ✓".as_bytes()), "+// héllo ✓");
    }

    #[test]
    fn read_diff_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.diff");
        std::fs::write(&path, "\n\n+added line\n  \n").unwrap();
        assert_eq!(read_diff(&path).unwrap(), "+added line");
    }

    #[test]
    fn whitespace_only_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.diff");
        std::fs::write(&path, " \t\n\r\n").unwrap();
        assert!(read_diff(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.diff");
        let err = read_diff(&path).unwrap_err();
        assert!(matches!(err, VulngateError::FileNotFound(_)));
        assert!(err.to_string().contains("nope.diff"));
    }
}
