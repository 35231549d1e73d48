//! Streaming line tokenizer that preserves terminator bytes.
//!
//! `BufRead::lines` strips `\n` and `\r\n`, which is exactly the
//! information line-ending detection needs. This iterator frames records
//! at `\n` boundaries and keeps every terminator byte in the record it
//! yields.

use std::io::{self, BufRead};

/// Iterator over the line records of a byte source.
///
/// Each record contains the bytes up to and including the next `\n`,
/// so a CRLF-terminated line keeps its trailing `\r\n`. The final
/// record of a file with no trailing newline is yielded without a
/// terminator; an empty trailing remainder yields nothing. Records are
/// produced one `read_until` at a time, so only one line is buffered
/// regardless of file size.
pub struct LineRecords<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> LineRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineRecords<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut record = Vec::new();
        match self.reader.read_until(b'\n', &mut record) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(record)),
            Err(e) => {
                // Fuse after an I/O error; retrying mid-file would
                // produce a torn record.
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn records(input: &[u8]) -> Vec<Vec<u8>> {
        LineRecords::new(Cursor::new(input.to_vec()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(records(b"").is_empty());
    }

    #[test]
    fn test_terminators_are_preserved() {
        let recs = records(b"foo\r\nbar\n");
        assert_eq!(recs, vec![b"foo\r\n".to_vec(), b"bar\n".to_vec()]);
    }

    #[test]
    fn test_final_unterminated_record() {
        let recs = records(b"foo\nbar");
        assert_eq!(recs, vec![b"foo\n".to_vec(), b"bar".to_vec()]);
    }

    #[test]
    fn test_lone_crlf_is_one_record() {
        assert_eq!(records(b"\r\n"), vec![b"\r\n".to_vec()]);
    }

    #[test]
    fn test_blank_lines_kept() {
        let recs = records(b"\n\n");
        assert_eq!(recs, vec![b"\n".to_vec(), b"\n".to_vec()]);
    }

    #[test]
    fn test_carriage_return_without_newline_is_not_a_boundary() {
        // A bare \r only terminates a record at EOF or a later \n.
        let recs = records(b"foo\rbar\n");
        assert_eq!(recs, vec![b"foo\rbar\n".to_vec()]);
    }

    #[test]
    fn test_records_concatenate_to_input() {
        let input: &[u8] = b"a\r\n\r\nb\nno newline at end";
        let joined: Vec<u8> = records(input).concat();
        assert_eq!(joined, input);
    }
}
