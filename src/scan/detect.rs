//! Per-file CRLF detection.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use super::lines::LineRecords;

const CR: u8 = 0x0D;
const LF: u8 = 0x0A;

/// Whether a line record ends with `\r\n` and has at least one content
/// byte before it. A record that is exactly `\r\n` is deliberately not
/// flagged: a blank CRLF line carries no content worth rewriting, and
/// the threshold keeps that boundary stable.
pub fn is_crlf_terminated(record: &[u8]) -> bool {
    record.len() >= 3 && record[record.len() - 2] == CR && record[record.len() - 1] == LF
}

/// Scan one file and report whether any of its lines is CRLF-terminated.
///
/// Short-circuits on the first hit. Open and read errors propagate to
/// the caller; the worker pool surfaces them as per-file error reports
/// without taking down other in-flight files.
pub fn has_crlf(path: &Path) -> io::Result<bool> {
    let file = File::open(path)?;

    for record in LineRecords::new(BufReader::new(file)) {
        if is_crlf_terminated(&record?) {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_crlf_file_is_detected() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "a.txt", b"foo\r\nbar\n");
        assert!(has_crlf(&path).unwrap());
    }

    #[test]
    fn test_lf_only_file_is_clean() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "clean.txt", b"foo\nbar\n");
        assert!(!has_crlf(&path).unwrap());
    }

    #[test]
    fn test_lone_crlf_line_is_not_flagged() {
        // Boundary case: zero content bytes before the terminator.
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "b.txt", b"\r\n");
        assert!(!has_crlf(&path).unwrap());
    }

    #[test]
    fn test_crlf_on_last_unterminated_line_only() {
        // No record ends with \r\n here; the \r sits mid-record.
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "c.txt", b"foo\nbar\r");
        assert!(!has_crlf(&path).unwrap());
    }

    #[test]
    fn test_single_crlf_among_many_lf_lines() {
        let dir = TempDir::new().unwrap();
        let mut content = b"x\n".repeat(1000);
        content.extend_from_slice(b"tail\r\n");
        let path = write_fixture(&dir, "d.txt", &content);
        assert!(has_crlf(&path).unwrap());
    }

    #[test]
    fn test_missing_file_propagates_error() {
        let dir = TempDir::new().unwrap();
        assert!(has_crlf(&dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn test_record_predicate_boundaries() {
        assert!(is_crlf_terminated(b"a\r\n"));
        assert!(!is_crlf_terminated(b"\r\n"));
        assert!(!is_crlf_terminated(b"abc\n"));
        assert!(!is_crlf_terminated(b""));
        assert!(!is_crlf_terminated(b"ab\r"));
    }
}
