//! Splitting whole tapes into sections and assembling them again
//!
//! A tape is a tape identification (TPID) line followed by materials, each
//! holding files, each holding sections. Sections end with a SEND record,
//! files with a FEND, materials with a MEND and the tape with a TEND.
//!
//! ```text
//! TPID              MAT=1    MF=0  MT=0
//!   section lines   MAT      MF    MT
//!   SEND            MAT      MF    MT=0
//!   FEND            MAT      MF=0  MT=0
//!   MEND            MAT=0    MF=0  MT=0
//! TEND              MAT=-1   MF=0  MT=0
//! ```

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

// internal modules
use crate::error::{Error, Result};
use crate::line::{is_blank, ContRecord, ControlId};
use crate::options::{ParsingOptions, WritingOptions};
use crate::reader::RecordStream;
use crate::writer::RecordWriter;

// external crates
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Raw sections of an ENDF-6 tape, keyed by MAT, MF and MT
///
/// Section lines are kept exactly as read, without line endings and without
/// their SEND record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tape {
    /// Tape identification line, if the tape had one
    pub tpid: Option<String>,
    /// Lines of every section, in MAT/MF/MT order
    pub sections: BTreeMap<ControlId, Vec<String>>,
}

impl Tape {
    /// Lines of a single section
    pub fn section(&self, mat: i32, mf: i32, mt: i32) -> Option<&[String]> {
        self.sections
            .get(&ControlId::new(mat, mf, mt))
            .map(Vec::as_slice)
    }

    /// Sorted and deduplicated material numbers
    pub fn materials(&self) -> Vec<i32> {
        let mut materials = self.sections.keys().map(|id| id.mat).collect::<Vec<i32>>();
        materials.dedup();
        materials
    }

    /// Identifiers of every section of a material
    pub fn sections_of(&self, mat: i32) -> impl Iterator<Item = &ControlId> {
        self.sections.keys().filter(move |id| id.mat == mat)
    }

    /// Total number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if there are no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Position within the MAT/MF hierarchy while splitting a tape
#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Tape,
    Material(i32),
    File(i32, i32),
    Ended,
}

/// Split a tape read from `reader` into its sections
///
/// ```rust
/// # use endftools_records::{read_tape, ParsingOptions};
/// let text = "\
/// tape identification                                                  1 0  0    0
///  9.223500+4 2.330248+2          0          0          0          09228 1451    1
///  0.000000+0 0.000000+0          0          0          0          09228 1  099999
///  0.000000+0 0.000000+0          0          0          0          09228 0  0    0
///  0.000000+0 0.000000+0          0          0          0          0   0 0  0    0
///  0.000000+0 0.000000+0          0          0          0          0  -1 0  0    0
/// ";
/// let tape = read_tape(text.as_bytes(), &ParsingOptions::default()).unwrap();
/// assert!(tape.tpid.as_deref().unwrap().starts_with("tape identification"));
/// assert_eq!(tape.materials(), vec![9228]);
/// assert_eq!(tape.section(9228, 1, 451).unwrap().len(), 1);
/// ```
pub fn read_tape<R: BufRead>(reader: R, opts: &ParsingOptions) -> Result<Tape> {
    let mut stream = RecordStream::new(reader, opts.clone());
    let mut tape = Tape {
        tpid: read_tpid(&mut stream)?,
        ..Default::default()
    };

    let mut level = Level::Tape;
    while let Some(line) = stream.next_raw_line()? {
        if is_blank(&line) {
            if level == Level::Ended || opts.ignore_blank_lines {
                trace!("Skipping blank line {}", stream.line_number());
                continue;
            }
            return Err(Error::BlankLine {
                line_number: stream.line_number(),
            });
        }

        let id = ControlId::from_line(&line)?;

        if id.mf == 0 || id.mt == 0 {
            level = match opts.ignore_send_records {
                true => level,
                false => end_record(level, &line, opts)?,
            };
            continue;
        }

        if level == Level::Ended {
            return Err(Error::UnexpectedRecord {
                reason: "record after the tape end (TEND)".to_string(),
                line,
            });
        }

        if !opts.ignore_send_records {
            check_hierarchy(level, id, &line)?;
        }

        stream.rewind(line);
        let lines = stream.read_section_verbatim(id, false)?;
        tape.sections.entry(id).or_default().extend(lines);
        level = Level::File(id.mat, id.mf);
    }

    match level {
        Level::Ended => (),
        _ if opts.ignore_send_records => (),
        Level::File(..) => return Err(Error::MissingEndRecord { record: "FEND" }),
        Level::Material(_) => return Err(Error::MissingEndRecord { record: "MEND" }),
        Level::Tape => return Err(Error::MissingEndRecord { record: "TEND" }),
    }

    debug!(
        "Tape read with {} sections over {} materials",
        tape.len(),
        tape.materials().len()
    );
    Ok(tape)
}

/// Tape identification from the first non-blank line
fn read_tpid<R: BufRead>(stream: &mut RecordStream<R>) -> Result<Option<String>> {
    let opts = stream.options().clone();

    let line = loop {
        let line = stream.read_raw_line()?;
        if !is_blank(&line) {
            break line;
        }
        if !opts.ignore_blank_lines {
            return Err(Error::BlankLine {
                line_number: stream.line_number(),
            });
        }
        warn!("Skipping blank line {} before the tape identification", stream.line_number());
    };

    let id = ControlId::from_line(&line)?;
    if id.mf == 0 && id.mt == 0 {
        trace!("Tape identification found for MAT {}", id.mat);
        return Ok(Some(line));
    }

    match opts.ignore_missing_tpid {
        true => {
            warn!("Tape has no identification line");
            stream.rewind(line);
            Ok(None)
        }
        false => Err(Error::MissingTapeId { line }),
    }
}

/// Check a FEND, MEND or TEND record and move up the hierarchy
fn end_record(level: Level, line: &str, opts: &ParsingOptions) -> Result<Level> {
    let id = ControlId::from_line(line)?;
    if id.mf != 0 || id.mt != 0 || !ContRecord::from_line(line, opts)?.is_zero() {
        return Err(Error::SendRecordFormat {
            line: line.to_string(),
        });
    }

    let (expected, next, record) = match level {
        Level::File(mat, _) => (mat, Level::Material(mat), "FEND"),
        Level::Material(_) => (0, Level::Tape, "MEND"),
        Level::Tape => (-1, Level::Ended, "TEND"),
        Level::Ended => {
            return Err(Error::UnexpectedRecord {
                reason: "record after the tape end (TEND)".to_string(),
                line: line.to_string(),
            })
        }
    };

    if id.mat != expected {
        return Err(Error::ControlRecordMismatch {
            field: "MAT",
            expected,
            actual: id.mat,
            line: line.to_string(),
        });
    }

    debug!("{record} found at MAT {}", id.mat);
    Ok(next)
}

/// A regular record must belong to the open file and material
fn check_hierarchy(level: Level, id: ControlId, line: &str) -> Result<()> {
    let mismatch = |field, expected, actual| Error::ControlRecordMismatch {
        field,
        expected,
        actual,
        line: line.to_string(),
    };
    match level {
        Level::File(mat, _) if mat != id.mat => Err(mismatch("MAT", mat, id.mat)),
        Level::File(_, mf) if mf != id.mf => Err(mismatch("MF", mf, id.mf)),
        Level::Material(mat) if mat != id.mat => Err(mismatch("MAT", mat, id.mat)),
        _ => Ok(()),
    }
}

/// Assemble a tape, adding every SEND, FEND, MEND and TEND record
///
/// ```rust
/// # use endftools_records::{read_tape, write_tape, ControlId, ParsingOptions, Tape, WritingOptions};
/// let mut tape = Tape::default();
/// tape.tpid = Some(format!("{:<66}   1 0  0", " my tape"));
/// tape.sections.insert(
///     ControlId::new(125, 3, 1),
///     vec![format!("{:<66} 125 3  1", " 1.001000+3 9.991673-1          0          0          0          0")],
/// );
///
/// let mut buffer = Vec::new();
/// write_tape(&mut buffer, &tape, &WritingOptions::default()).unwrap();
/// let text = String::from_utf8(buffer).unwrap();
/// assert_eq!(text.lines().count(), 6);
///
/// let back = read_tape(text.as_bytes(), &ParsingOptions::default()).unwrap();
/// assert_eq!(back.materials(), vec![125]);
/// ```
pub fn write_tape<W: Write>(writer: W, tape: &Tape, opts: &WritingOptions) -> Result<()> {
    let mut writer = RecordWriter::new(writer, opts.clone());

    if let Some(tpid) = &tape.tpid {
        writer.write_section_verbatim(&[tpid])?;
    }

    let mut open: Option<ControlId> = None;
    for (id, lines) in &tape.sections {
        if let Some(previous) = open {
            if previous.mat != id.mat {
                writer.write_fend(previous.mat)?;
                writer.write_mend()?;
            } else if previous.mf != id.mf {
                writer.write_fend(previous.mat)?;
            }
        }
        writer.write_section_verbatim(lines)?;
        open = Some(*id);
    }

    if let Some(last) = open {
        writer.write_fend(last.mat)?;
        writer.write_mend()?;
    }
    writer.write_tend()?;
    writer.flush()?;

    debug!("Tape written with {} sections", tape.len());
    Ok(())
}

/// Read and split a tape file
pub fn read_tape_file<P: AsRef<Path>>(path: P, opts: &ParsingOptions) -> Result<Tape> {
    debug!("Reading tape {}", path.as_ref().display());
    let file = File::open(path)?;
    read_tape(BufReader::new(file), opts)
}

/// Write a tape to a file, replacing any existing one
pub fn write_tape_file<P: AsRef<Path>>(path: P, tape: &Tape, opts: &WritingOptions) -> Result<()> {
    debug!("Writing tape {}", path.as_ref().display());
    let file = File::create(path)?;
    write_tape(BufWriter::new(file), tape, opts)
}
