//! Line-by-line writing of ENDF-6 records

// standard library
use std::io::Write;

// internal modules
use crate::error::{Error, Result};
use crate::field::EndfField;
use crate::line::{
    blank_line, write_custom_int, write_field, ContRecord, ControlId, DATA_WIDTH,
    FIELDS_PER_LINE, LINE_NUMBER_COLUMNS,
};
use crate::options::WritingOptions;
use crate::tab::{Tab1Body, Tab2Body};

// endftools modules
use endftools_utils::f;

// external crates
use log::{debug, trace};

/// Highest sequence number before the count wraps around
const MAX_LINE_NUMBER: usize = 99999;

/// Sink for ENDF-6 records
///
/// Every line is prepared with the control fields of its record and, if
/// configured, a sequence number in columns 76-80. The sequence restarts
/// after each end record.
///
/// ```rust
/// # use endftools_records::{ContRecord, ControlId, RecordWriter, WritingOptions};
/// let mut buffer = Vec::new();
/// let mut writer = RecordWriter::new(&mut buffer, WritingOptions::default());
///
/// let cont = ContRecord { c1: 1.0, n2: 6, ..Default::default() };
/// writer.write_cont(&cont, ControlId::new(125, 3, 1)).unwrap();
/// writer.write_send(125, 3).unwrap();
///
/// let text = String::from_utf8(buffer).unwrap();
/// let lines = text.lines().collect::<Vec<_>>();
/// assert_eq!(lines[0], " 1.000000+0 0.000000+0          0          0          0          6 125 3  1    1");
/// assert_eq!(lines[1], " 0.000000+0 0.000000+0          0          0          0          0 125 3  099999");
/// ```
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    writer: W,
    options: WritingOptions,
    line_counter: usize,
}

// ! Lines
impl<W: Write> RecordWriter<W> {
    /// Wrap any sink
    pub fn new(writer: W, options: WritingOptions) -> Self {
        Self {
            writer,
            options,
            line_counter: 0,
        }
    }

    /// Options used for every write
    pub fn options(&self) -> &WritingOptions {
        &self.options
    }

    /// Number of lines written since the last end record
    pub fn line_counter(&self) -> usize {
        self.line_counter
    }

    /// Give back the inner sink
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Blank line with control fields and the next sequence number
    ///
    /// The counter advances whether or not numbers are written.
    pub fn prepare_line(&mut self, id: ControlId) -> Result<String> {
        let mut line = blank_line(id, &self.options)?;
        if self.options.include_linenum {
            let number = (self.line_counter % MAX_LINE_NUMBER) + 1;
            write_custom_int(&mut line, LINE_NUMBER_COLUMNS, number as i64)?;
        }
        self.line_counter += 1;
        Ok(line)
    }

    /// All-zero end record of file `mf`, leaving the counter untouched
    ///
    /// The sequence number is 99999 for a SEND and 0 for the FEND, MEND and
    /// TEND records, which all have MF=0.
    pub fn prepare_send(&self, mat: i32, mf: i32) -> Result<String> {
        let mut line = blank_line(ControlId::new(mat, mf, 0), &self.options)?;
        ContRecord::default().write_into(&mut line, &self.options)?;
        if self.options.include_linenum {
            let number = match mf {
                0 => 0,
                _ => MAX_LINE_NUMBER as i64,
            };
            write_custom_int(&mut line, LINE_NUMBER_COLUMNS, number)?;
        }
        Ok(line)
    }

    /// Emit a finished line
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        trace!("{line}");
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}

// ! Records
impl<W: Write> RecordWriter<W> {
    /// Write values six to a line, padding the last line with blanks
    ///
    /// An empty slice still writes one blank line.
    pub fn write_vector<T: EndfField>(&mut self, values: &[T], id: ControlId) -> Result<()> {
        if values.is_empty() {
            let line = self.prepare_line(id)?;
            return self.write_line(&line);
        }

        for chunk in values.chunks(FIELDS_PER_LINE) {
            let mut line = self.prepare_line(id)?;
            for (index, value) in chunk.iter().enumerate() {
                write_field(&mut line, index, value, &self.options)?;
            }
            self.write_line(&line)?;
        }
        Ok(())
    }

    /// Write a HEAD or CONT record
    pub fn write_cont(&mut self, cont: &ContRecord, id: ControlId) -> Result<()> {
        let mut line = self.prepare_line(id)?;
        cont.write_into(&mut line, &self.options)?;
        self.write_line(&line)
    }

    /// Write a TEXT record of up to 66 characters
    pub fn write_text(&mut self, text: &str, id: ControlId) -> Result<()> {
        if text.chars().count() > DATA_WIDTH {
            return Err(Error::FieldWidth {
                text: text.to_string(),
                width: DATA_WIDTH,
            });
        }
        let control = self.prepare_line(id)?.split_off(DATA_WIDTH);
        self.write_line(&f!("{text:<DATA_WIDTH$}{control}"))
    }

    /// Write a LIST record, with N1 of the CONT giving the number of values
    pub fn write_list(&mut self, cont: &ContRecord, values: &[f64], id: ControlId) -> Result<()> {
        if cont.n1 != values.len() as i64 {
            return Err(Error::LengthMismatch {
                what: "NPL and LIST values",
                left: cont.n1.max(0) as usize,
                right: values.len(),
            });
        }
        self.write_cont(cont, id)?;
        self.write_vector(values, id)
    }

    /// Write the NBT/INT pairs of the interpolation regions
    pub fn write_tab2_body(&mut self, body: &Tab2Body, id: ControlId) -> Result<()> {
        body.check()?;
        self.write_vector(&body.interleaved(), id)
    }

    /// Write interpolation regions then X/Y pairs, the pairs starting on a
    /// new line
    pub fn write_tab1_body(&mut self, body: &Tab1Body, id: ControlId) -> Result<()> {
        body.check()?;
        self.write_vector(&body.interpolation().interleaved(), id)?;
        self.write_vector(&body.interleaved_points(), id)
    }

    /// Write a TAB1 record, filling NR and NP of the CONT from the body
    pub fn write_tab1(&mut self, cont: &ContRecord, body: &Tab1Body, id: ControlId) -> Result<()> {
        let cont = ContRecord {
            n1: body.nr() as i64,
            n2: body.np() as i64,
            ..*cont
        };
        body.check()?;
        self.write_cont(&cont, id)?;
        self.write_tab1_body(body, id)
    }

    /// Write a TAB2 record, filling NR of the CONT from the body
    pub fn write_tab2(&mut self, cont: &ContRecord, body: &Tab2Body, id: ControlId) -> Result<()> {
        let cont = ContRecord {
            n1: body.nr() as i64,
            ..*cont
        };
        body.check()?;
        self.write_cont(&cont, id)?;
        self.write_tab2_body(body, id)
    }
}

// ! End records
impl<W: Write> RecordWriter<W> {
    /// Close section `mf` of material `mat`
    pub fn write_send(&mut self, mat: i32, mf: i32) -> Result<()> {
        self.write_end(mat, mf, "SEND")
    }

    /// Close the current file of material `mat`
    pub fn write_fend(&mut self, mat: i32) -> Result<()> {
        self.write_end(mat, 0, "FEND")
    }

    /// Close the current material
    pub fn write_mend(&mut self) -> Result<()> {
        self.write_end(0, 0, "MEND")
    }

    /// Close the tape
    pub fn write_tend(&mut self) -> Result<()> {
        self.write_end(-1, 0, "TEND")
    }

    fn write_end(&mut self, mat: i32, mf: i32, record: &str) -> Result<()> {
        let line = self.prepare_send(mat, mf)?;
        self.write_line(&line)?;
        debug!("{record} written for MAT {mat}");
        self.line_counter = 0;
        Ok(())
    }
}

// ! Sections
impl<W: Write> RecordWriter<W> {
    /// Write the raw lines of a section followed by its SEND record
    ///
    /// The first line gives MAT, MF and MT. Every line is cut to its first 75
    /// characters and, with `include_linenum`, renumbered from 1. Lines with
    /// MF=0, such as the tape identification, are numbered from 0 and have no
    /// SEND record.
    ///
    /// ```rust
    /// # use endftools_records::{RecordWriter, WritingOptions};
    /// let section = [" 9.223500+4 2.330248+2          0          0          0          09228 1451   42"];
    ///
    /// let mut buffer = Vec::new();
    /// let mut writer = RecordWriter::new(&mut buffer, WritingOptions::default());
    /// writer.write_section_verbatim(&section).unwrap();
    ///
    /// let text = String::from_utf8(buffer).unwrap();
    /// let lines = text.lines().collect::<Vec<_>>();
    /// assert!(lines[0].ends_with("9228 1451    1"));
    /// assert!(lines[1].ends_with("9228 1  099999"));
    /// ```
    pub fn write_section_verbatim<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        let first = lines.first().ok_or(Error::EmptySection)?;
        let id = ControlId::from_line(first.as_ref())?;
        let offset = match id.mf {
            0 => 0,
            _ => 1,
        };

        for (i, line) in lines.iter().enumerate() {
            let data = line.as_ref().chars().take(75).collect::<String>();
            let line = match self.options.include_linenum {
                true => f!("{data:<75}{:>5}", i % MAX_LINE_NUMBER + offset),
                false => data,
            };
            self.write_line(&line)?;
        }
        debug!("Section {id} written with {} lines", lines.len());

        if id.mf != 0 {
            let send = self.prepare_send(id.mat, id.mf)?;
            self.write_line(&send)?;
        }
        Ok(())
    }
}
