// Feature table reader
//
// Wraps a line-oriented feature table: verifies the header, then yields one
// FeatureRecord per data row. Errors carry the 1-based line number and end
// the iteration; a segmentation run cannot skip rows without shifting every
// later boundary.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::analysis::features::{parse_line, FeatureRecord, DEFAULT_DELIMITER};
use crate::error::ParseError;

/// Header line every feature table starts with
pub const MATRIX_HEADER: &str = "Time,Intensity,Pitch,F1,F2,F3,MFCC1,MFCC2,MFCC3,MFCC4,MFCC5,MFCC6,MFCC7,MFCC8,MFCC9,MFCC10,MFCC11,MFCC12";

/// Streaming reader over a feature table
pub struct FeatureTableReader<R> {
    lines: Lines<R>,
    delimiter: char,
    line_number: usize,
    last_time_ms: Option<i64>,
    // A blank line is only an error if more data follows it
    pending_blank: Option<usize>,
    finished: bool,
}

impl FeatureTableReader<BufReader<File>> {
    /// Open a feature table file and check its header
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path.as_ref()).map_err(|err| ParseError::Io {
            details: format!("couldn't open {}: {}", path.as_ref().display(), err),
        })?;
        Self::open(BufReader::new(file))
    }
}

impl<R: BufRead> FeatureTableReader<R> {
    /// Consume the header line and prepare to stream rows
    ///
    /// # Errors
    /// * `HeaderMismatch` - stream is empty or the header differs from
    ///   [`MATRIX_HEADER`] (line terminators aside)
    /// * `Io` - the reader failed
    pub fn open(reader: R) -> Result<Self, ParseError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(ParseError::HeaderMismatch {
                    found: String::new(),
                })
            }
        };
        let header = header.trim_end_matches('\r');
        if header != MATRIX_HEADER {
            return Err(ParseError::HeaderMismatch {
                found: header.to_string(),
            });
        }

        Ok(Self {
            lines,
            delimiter: DEFAULT_DELIMITER,
            line_number: 1,
            last_time_ms: None,
            pending_blank: None,
            finished: false,
        })
    }

    /// Number of lines consumed so far, header included
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<FeatureRecord, ParseError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for FeatureTableReader<R> {
    type Item = Result<FeatureRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(err)) => return self.fail(err.into()),
                Some(Ok(line)) => line,
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                self.pending_blank.get_or_insert(self.line_number);
                continue;
            }
            if let Some(blank) = self.pending_blank {
                return self.fail(ParseError::MalformedRecord {
                    line: Some(blank),
                    reason: "blank line inside the table".to_string(),
                });
            }

            let record = match parse_line(&line, self.delimiter) {
                Ok(record) => record,
                Err(err) => {
                    let line_number = self.line_number;
                    return self.fail(err.at_line(line_number));
                }
            };

            if let Some(previous) = self.last_time_ms {
                if record.time_ms < previous {
                    let line_number = self.line_number;
                    return self.fail(ParseError::MalformedRecord {
                        line: Some(line_number),
                        reason: format!(
                            "time went backwards ({} ms after {} ms)",
                            record.time_ms, previous
                        ),
                    });
                }
            }
            self.last_time_ms = Some(record.time_ms);

            return Some(Ok(record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table(rows: &[&str]) -> Cursor<String> {
        let mut text = format!("{}\n", MATRIX_HEADER);
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        Cursor::new(text)
    }

    #[test]
    fn test_reads_rows_in_order() {
        let reader = FeatureTableReader::open(table(&[
            "0.00,60,120,500,1500,2500",
            "0.02,61,121,501,1501,2501",
        ]))
        .unwrap();
        let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time_ms, 0);
        assert_eq!(records[1].time_ms, 20);
    }

    #[test]
    fn test_rejects_wrong_header() {
        let err = FeatureTableReader::open(Cursor::new("Time,Pitch\n0.0,120\n")).err();
        assert_eq!(
            err,
            Some(ParseError::HeaderMismatch {
                found: "Time,Pitch".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_empty_stream() {
        assert!(matches!(
            FeatureTableReader::open(Cursor::new("")),
            Err(ParseError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn test_accepts_crlf_header() {
        let text = format!("{}\r\n0.00,60,120,500,1500,2500\r\n", MATRIX_HEADER);
        let mut reader = FeatureTableReader::open(Cursor::new(text)).unwrap();
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_error_carries_line_number_and_stops() {
        let mut reader = FeatureTableReader::open(table(&[
            "0.00,60,120,500,1500,2500",
            "0.02,60,120",
            "0.04,60,120,500,1500,2500",
        ]))
        .unwrap();
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_rejects_time_going_backwards() {
        let mut reader = FeatureTableReader::open(table(&[
            "0.04,60,120,500,1500,2500",
            "0.02,60,120,500,1500,2500",
        ]))
        .unwrap();
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(ParseError::MalformedRecord { line, reason }) => {
                assert_eq!(line, Some(3));
                assert!(reason.contains("backwards"));
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_time_is_allowed() {
        let reader = FeatureTableReader::open(table(&[
            "0.02,60,120,500,1500,2500",
            "0.02,60,120,500,1500,2500",
        ]))
        .unwrap();
        assert_eq!(reader.filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn test_trailing_blank_lines_are_ignored() {
        let reader =
            FeatureTableReader::open(table(&["0.00,60,120,500,1500,2500", "", "  "])).unwrap();
        let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_blank_line_before_data_is_malformed() {
        let reader = FeatureTableReader::open(table(&[
            "0.00,60,120,500,1500,2500",
            "",
            "0.02,60,120,500,1500,2500",
        ]))
        .unwrap();
        let err = reader.collect::<Result<Vec<_>, _>>().unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_line_number_counts_header() {
        let mut reader = FeatureTableReader::open(table(&["0.00,60,120,500,1500,2500"])).unwrap();
        assert_eq!(reader.line_number(), 1);
        reader.next();
        assert_eq!(reader.line_number(), 2);
    }
}
