//! Line-by-line reading of ENDF-6 records

// standard library
use std::io::{BufRead, Lines};

// internal modules
use crate::error::{Error, Result};
use crate::field::EndfField;
use crate::line::{is_blank, read_field, read_mf, read_mt, read_text, ContRecord, ControlId, FIELDS_PER_LINE};
use crate::options::ParsingOptions;
use crate::tab::{Tab1Body, Tab2Body};

// endftools modules
use endftools_utils::f;

// external crates
use log::{debug, trace, warn};

/// Cursor over the lines of an ENDF-6 source
///
/// Reads whole lines from any buffered source, with one line of look-back so
/// that a line belonging to the next record can be handed back. The options
/// are fixed for the lifetime of the stream.
///
/// ```rust
/// # use endftools_records::{ControlId, ParsingOptions, RecordStream};
/// let text = [
///     " 1.000000+0 2.000000+0          3          4          5          6 125 3  1    1",
///     " 0.000000+0 0.000000+0          0          0          0          0 125 3  099999",
/// ]
/// .join("\n");
/// let mut stream = RecordStream::new(text.as_bytes(), ParsingOptions::default());
///
/// let cont = stream.read_cont(ControlId::new(125, 3, 1)).unwrap();
/// assert_eq!((cont.c2, cont.n2), (2.0, 6));
///
/// stream.read_send(125, 3).unwrap();
/// assert_eq!(stream.line_number(), 2);
/// ```
#[derive(Debug)]
pub struct RecordStream<R> {
    lines: Lines<R>,
    options: ParsingOptions,
    cached_line: Option<String>,
    line_number: usize,
}

// ! Raw lines
impl<R: BufRead> RecordStream<R> {
    /// Wrap a buffered source
    pub fn new(reader: R, options: ParsingOptions) -> Self {
        Self {
            lines: reader.lines(),
            options,
            cached_line: None,
            line_number: 0,
        }
    }

    /// Options used for every read
    pub fn options(&self) -> &ParsingOptions {
        &self.options
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next line without its line ending, or `None` at the end of input
    pub fn next_raw_line(&mut self) -> Result<Option<String>> {
        let line = match self.cached_line.take() {
            Some(line) => line,
            None => match self.lines.next() {
                Some(line) => line?,
                None => return Ok(None),
            },
        };
        self.line_number += 1;
        trace!("{:>6}: {line}", self.line_number);
        Ok(Some(line))
    }

    /// Next line, failing at the end of input
    pub fn read_raw_line(&mut self) -> Result<String> {
        self.next_raw_line()?.ok_or(Error::EndOfFile)
    }

    /// Hand back a line so that it is returned by the next read
    ///
    /// Only one line is ever held, so a second call before the next read
    /// replaces the first line.
    pub fn rewind(&mut self, line: String) {
        trace!("Rewinding to line {}", self.line_number);
        self.line_number = self.line_number.saturating_sub(1);
        self.cached_line = Some(line);
    }

    /// Next line, checking its control fields if configured to do so
    pub fn read_line(&mut self, id: ControlId) -> Result<String> {
        let line = self.read_raw_line()?;
        if self.options.validate_control_records {
            check_control(&line, id)?;
        }
        Ok(line)
    }
}

// ! Records
impl<R: BufRead> RecordStream<R> {
    /// Read a section end (SEND) record of file `mf`
    pub fn read_send(&mut self, mat: i32, mf: i32) -> Result<String> {
        let line = self.read_line(ControlId::new(mat, mf, 0))?;
        if !ContRecord::from_line(&line, &self.options)?.is_zero() || read_mt(&line)? != 0 {
            return Err(Error::SendRecordFormat { line });
        }
        trace!("SEND of MAT {mat} MF {mf}");
        Ok(line)
    }

    /// Read `count` values packed six to a line
    ///
    /// At least one line is always consumed, even for an empty vector.
    pub fn read_vector<T: EndfField>(&mut self, count: usize, id: ControlId) -> Result<Vec<T>> {
        let mut line = self.read_line(id)?;
        let mut values = Vec::with_capacity(count);
        for i in 0..count {
            let slot = i % FIELDS_PER_LINE;
            if slot == 0 && i > 0 {
                line = self.read_line(id)?;
            }
            values.push(read_field(&line, slot, &self.options)?);
        }
        Ok(values)
    }

    /// Read a HEAD or CONT record
    pub fn read_cont(&mut self, id: ControlId) -> Result<ContRecord> {
        let line = self.read_line(id)?;
        ContRecord::from_line(&line, &self.options)
    }

    /// Read the 66 characters of a TEXT record
    pub fn read_text(&mut self, id: ControlId) -> Result<String> {
        read_text(&self.read_line(id)?)
    }

    /// Read a LIST record, i.e. a CONT followed by N1 floats
    pub fn read_list(&mut self, id: ControlId) -> Result<(ContRecord, Vec<f64>)> {
        let cont = self.read_cont(id)?;
        let npl = count(cont.n1, "NPL")?;
        Ok((cont, self.read_vector(npl, id)?))
    }

    /// Read the NBT/INT pairs of `nr` interpolation regions
    pub fn read_tab2_body(&mut self, nr: usize, id: ControlId) -> Result<Tab2Body> {
        let values = self.read_vector::<i64>(2 * nr, id)?;
        Ok(Tab2Body::from_interleaved(values))
    }

    /// Read `nr` interpolation regions followed by `np` X/Y pairs
    ///
    /// The points always start on a new line.
    pub fn read_tab1_body(&mut self, nr: usize, np: usize, id: ControlId) -> Result<Tab1Body> {
        let interpolation = self.read_tab2_body(nr, id)?;
        let points = self.read_vector::<f64>(2 * np, id)?;
        Ok(Tab1Body::from_parts(interpolation, points))
    }

    /// Read a TAB1 record, i.e. a CONT with NR and NP followed by the body
    pub fn read_tab1(&mut self, id: ControlId) -> Result<(ContRecord, Tab1Body)> {
        let cont = self.read_cont(id)?;
        let body = self.read_tab1_body(count(cont.n1, "NR")?, count(cont.n2, "NP")?, id)?;
        Ok((cont, body))
    }

    /// Read a TAB2 record, i.e. a CONT with NR followed by the regions
    pub fn read_tab2(&mut self, id: ControlId) -> Result<(ContRecord, Tab2Body)> {
        let cont = self.read_cont(id)?;
        let body = self.read_tab2_body(count(cont.n1, "NR")?, id)?;
        Ok((cont, body))
    }
}

// ! Sections
impl<R: BufRead> RecordStream<R> {
    /// Collect the raw lines of the MF/MT section `id`
    ///
    /// Lines are taken for as long as their MF and MT match. What happens
    /// with the first line that does not match depends on the section:
    ///
    /// - With `is_first` (the tape identification) it already belongs to the
    ///   next section and is handed back to the stream.
    /// - Otherwise it must be the SEND record with the same MF, which is
    ///   consumed. If `ignore_send_records` is set any other line is handed
    ///   back instead.
    ///
    /// ```rust
    /// # use endftools_records::{ControlId, ParsingOptions, RecordStream};
    /// let text = [
    ///     " 9.223500+4 2.330248+2          0          0          0          09228 3  1    1",
    ///     " 0.000000+0 0.000000+0          0          0          0          09228 3  099999",
    ///     " 0.000000+0 0.000000+0          0          0          0          09228 0  0    0",
    /// ]
    /// .join("\n");
    /// let mut stream = RecordStream::new(text.as_bytes(), ParsingOptions::default());
    /// let lines = stream.read_section_verbatim(ControlId::new(9228, 3, 1), false).unwrap();
    /// assert_eq!(lines.len(), 1);
    /// assert_eq!(stream.line_number(), 2);
    /// ```
    pub fn read_section_verbatim(&mut self, id: ControlId, is_first: bool) -> Result<Vec<String>> {
        let mut section = Vec::new();

        let next = loop {
            let Some(line) = self.next_raw_line()? else {
                break None;
            };
            if self.options.ignore_blank_lines && is_blank(&line) {
                trace!("Skipping blank line {} in section {id}", self.line_number);
                continue;
            }
            if read_mf(&line)? != id.mf || read_mt(&line)? != id.mt {
                break Some(line);
            }
            if self.options.validate_control_records {
                check_control(&line, id)?;
            }
            section.push(line);
        };

        debug!("Section {id} spans {} lines", section.len());

        let Some(line) = next else {
            return match is_first || self.options.ignore_send_records {
                true => Ok(section),
                false => Err(Error::UnexpectedEndOfSection {
                    mf: id.mf,
                    mt: id.mt,
                    line: None,
                }),
            };
        };

        if is_first {
            self.rewind(line);
            return Ok(section);
        }

        if read_mf(&line)? == id.mf && read_mt(&line)? == 0 {
            if self.options.validate_control_records {
                check_control(&line, ControlId::new(id.mat, id.mf, 0))?;
            }
            trace!("SEND of section {id}");
            return Ok(section);
        }

        if self.options.ignore_send_records {
            warn!("Section {id} ends without a SEND record");
            self.rewind(line);
            return Ok(section);
        }

        Err(Error::UnexpectedEndOfSection {
            mf: id.mf,
            mt: id.mt,
            line: Some(line),
        })
    }
}

/// Compare MAT, MF and MT of a line to those expected, in that order
fn check_control(line: &str, expected: ControlId) -> Result<()> {
    let found = ControlId::from_line(line)?;
    let checks = [
        ("MAT", expected.mat, found.mat),
        ("MF", expected.mf, found.mf),
        ("MT", expected.mt, found.mt),
    ];
    match checks.into_iter().find(|(_, e, a)| e != a) {
        Some((field, expected, actual)) => Err(Error::ControlRecordMismatch {
            field,
            expected,
            actual,
            line: line.to_string(),
        }),
        None => Ok(()),
    }
}

/// Counter from a CONT record, which must not be negative
fn count(value: i64, name: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::UnexpectedRecord {
        reason: f!("{name} must not be negative"),
        line: value.to_string(),
    })
}

#[cfg(test)]
mod reader_tests {
    use super::*;

    fn stream(text: &str, validate: bool) -> RecordStream<&[u8]> {
        let options = ParsingOptions {
            validate_control_records: validate,
            ..Default::default()
        };
        RecordStream::new(text.as_bytes(), options)
    }

    /// Data area padded to 66 characters followed by the control columns
    fn line(data: &str, control: &str) -> String {
        f!("{data:<66}{control}\n")
    }

    const ZEROS: &str = " 0.000000+0 0.000000+0          0          0          0          0";

    #[test]
    fn rewind_returns_same_line() {
        let mut s = stream("a\nb\n", false);
        let a = s.read_raw_line().unwrap();
        s.rewind(a);
        assert_eq!(s.line_number(), 0);
        assert_eq!(s.read_raw_line().unwrap(), "a");
        assert_eq!(s.read_raw_line().unwrap(), "b");
        assert!(s.next_raw_line().unwrap().is_none());
        assert!(matches!(s.read_raw_line(), Err(Error::EndOfFile)));
    }

    #[test]
    fn windows_line_endings() {
        let mut s = stream("first\r\nsecond\r\n", false);
        assert_eq!(s.read_raw_line().unwrap(), "first");
        assert_eq!(s.read_raw_line().unwrap(), "second");
    }

    #[test]
    fn control_validation() {
        let text = line(ZEROS, "9228 3  1    1");
        let mut s = stream(&text, true);
        let err = s.read_line(ControlId::new(9228, 4, 1)).unwrap_err();
        assert!(matches!(
            err,
            Error::ControlRecordMismatch { field: "MF", expected: 4, actual: 3, .. }
        ));

        // not checked unless asked for
        let mut s = stream(&text, false);
        assert!(s.read_line(ControlId::new(1, 1, 1)).is_ok());
    }

    #[test]
    fn send_format() {
        let text = line(ZEROS, "9228 3  1    1");
        let mut s = stream(&text, false);
        assert!(matches!(s.read_send(9228, 3), Err(Error::SendRecordFormat { .. })));
    }

    #[test]
    fn vector_wraps_lines() {
        let text = [
            line("          1          2          3          4          5          6", " 125 3  1    1"),
            line("          7          8", " 125 3  1    2"),
        ]
        .concat();
        let mut s = stream(&text, true);
        let values = s.read_vector::<i64>(8, ControlId::new(125, 3, 1)).unwrap();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(s.line_number(), 2);
    }

    #[test]
    fn empty_vector_consumes_line() {
        let text = line(ZEROS, " 125 3  1    1");
        let mut s = stream(&text, false);
        let values = s.read_vector::<f64>(0, ControlId::new(125, 3, 1)).unwrap();
        assert!(values.is_empty());
        assert_eq!(s.line_number(), 1);
    }

    #[test]
    fn tab1_record() {
        let text = [
            line(" 0.000000+0 0.000000+0          0          0          1          3", " 125 3  1    1"),
            line("          3          2", " 125 3  1    2"),
            line(" 1.000000-5 1.000000+1 1.000000+0 5.000000+0 2.000000+7 1.000000+0", " 125 3  1    3"),
        ]
        .concat();
        let mut s = stream(&text, true);
        let (cont, body) = s.read_tab1(ControlId::new(125, 3, 1)).unwrap();
        assert_eq!(cont.n2, 3);
        assert_eq!(body.nbt, vec![3]);
        assert_eq!(body.int, vec![2]);
        assert_eq!(body.x, vec![1.0e-5, 1.0, 2.0e7]);
        assert_eq!(body.y, vec![10.0, 5.0, 1.0]);
    }

    #[test]
    fn list_record() {
        let text = [
            line(" 0.000000+0 0.000000+0          0          0          2          0", " 125 6  2    1"),
            line(" 1.500000+0 2.500000+0", " 125 6  2    2"),
        ]
        .concat();
        let mut s = stream(&text, false);
        let (cont, values) = s.read_list(ControlId::new(125, 6, 2)).unwrap();
        assert_eq!(cont.n1, 2);
        assert_eq!(values, vec![1.5, 2.5]);
    }

    #[test]
    fn negative_count() {
        let text = line(" 0.000000+0 0.000000+0          0          0         -2          0", " 125 6  2    1");
        let mut s = stream(&text, false);
        assert!(matches!(
            s.read_list(ControlId::new(125, 6, 2)),
            Err(Error::UnexpectedRecord { .. })
        ));
    }

    #[test]
    fn section_missing_send() {
        let text = [line(ZEROS, " 125 3  1    1"), line(ZEROS, " 125 3  2    1")].concat();

        let mut s = stream(&text, false);
        let err = s.read_section_verbatim(ControlId::new(125, 3, 1), false).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEndOfSection { line: Some(_), .. }));

        let mut s = RecordStream::new(
            text.as_bytes(),
            ParsingOptions {
                ignore_send_records: true,
                ..Default::default()
            },
        );
        let lines = s.read_section_verbatim(ControlId::new(125, 3, 1), false).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(read_mt(&s.read_raw_line().unwrap()).unwrap(), 2);
    }

    #[test]
    fn section_at_end_of_input() {
        let text = line(ZEROS, " 125 3  1    1");
        let mut s = stream(&text, false);
        let err = s.read_section_verbatim(ControlId::new(125, 3, 1), false).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEndOfSection { line: None, .. }));
    }

    #[test]
    fn tape_id_rewinds() {
        let text = [line(" tape id", "   1 0  0    0"), line(ZEROS, " 125 1451    1")].concat();
        let mut s = stream(&text, true);
        let lines = s.read_section_verbatim(ControlId::new(1, 0, 0), true).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(" tape id"));
        assert_eq!(read_mt(&s.read_raw_line().unwrap()).unwrap(), 451);
    }

    #[test]
    fn send_of_section() {
        let text = [line(ZEROS, " 125 3  1    1"), line(ZEROS, " 125 3  099999")].concat();
        let mut s = stream(&text, true);
        let lines = s.read_section_verbatim(ControlId::new(125, 3, 1), false).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(s.next_raw_line().unwrap().is_none());
    }
}
