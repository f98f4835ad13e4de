//! Fixed-column layout of a single ENDF-6 line
//!
//! | Columns  | Content                 |
//! | -------- | ----------------------- |
//! | `[0,66)` | six 11-character fields |
//! | `[66,70)`| MAT                     |
//! | `[70,72)`| MF                      |
//! | `[72,75)`| MT                      |
//! | `[75,80)`| optional line number    |

// standard library
use std::fmt;

// internal modules
use crate::error::{Error, Result};
use crate::field::{decode_int, EndfField, FIELD_WIDTH};
use crate::options::{ParsingOptions, WritingOptions};

// endftools modules
use endftools_utils::{f, StringExt};

// external crates
use serde::{Deserialize, Serialize};

/// Number of data fields on every line
pub const FIELDS_PER_LINE: usize = 6;

/// Width of the data area holding the six fields
pub const DATA_WIDTH: usize = FIELD_WIDTH * FIELDS_PER_LINE;

pub(crate) const MAT_COLUMNS: (usize, usize) = (66, 4);
pub(crate) const MF_COLUMNS: (usize, usize) = (70, 2);
pub(crate) const MT_COLUMNS: (usize, usize) = (72, 3);
pub(crate) const LINE_NUMBER_COLUMNS: (usize, usize) = (75, 5);

/// Material, file and section numbers identifying the owner of a line
///
/// Ordered by MAT, then MF, then MT, which is the order of sections on a
/// tape.
///
/// ```rust
/// # use endftools_records::ControlId;
/// let line = " 9.223500+4 2.330248+2          0          0          0          09228 1451    1";
/// let id = ControlId::from_line(line).unwrap();
/// assert_eq!(id, ControlId::new(9228, 1, 451));
/// assert_eq!(id.to_string(), "9228/1/451");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ControlId {
    /// Material number, -1 and 0 being reserved for terminators
    pub mat: i32,
    /// File number
    pub mf: i32,
    /// Section number
    pub mt: i32,
}

impl ControlId {
    /// New identifier from its parts
    pub fn new(mat: i32, mf: i32, mt: i32) -> Self {
        Self { mat, mf, mt }
    }

    /// Decode MAT, MF and MT from the control columns of a line
    pub fn from_line(line: &str) -> Result<Self> {
        Ok(Self {
            mat: read_mat(line)?,
            mf: read_mf(line)?,
            mt: read_mt(line)?,
        })
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}/{}", self.mat, self.mf, self.mt)
    }
}

// ! Reading

/// Integer held in an arbitrary column range of a line
///
/// Blank columns, including those beyond the end of a short line, are zero.
///
/// ```rust
/// # use endftools_records::read_custom_int;
/// assert_eq!(read_custom_int("abc  42 ", 3, 4).unwrap(), 42);
/// assert_eq!(read_custom_int("abc", 3, 4).unwrap(), 0);
/// ```
pub fn read_custom_int(line: &str, start: usize, width: usize) -> Result<i64> {
    decode_int(column(line, start, width)?)
}

/// MAT number of a line
pub fn read_mat(line: &str) -> Result<i32> {
    read_control(line, MAT_COLUMNS)
}

/// MF number of a line
pub fn read_mf(line: &str) -> Result<i32> {
    read_control(line, MF_COLUMNS)
}

/// MT number of a line
pub fn read_mt(line: &str) -> Result<i32> {
    read_control(line, MT_COLUMNS)
}

fn read_control(line: &str, (start, width): (usize, usize)) -> Result<i32> {
    // at most four digits, so always in range
    Ok(read_custom_int(line, start, width)? as i32)
}

/// Text of the data field at `index` (0 to 5)
pub fn field_text(line: &str, index: usize) -> Result<&str> {
    column(line, index * FIELD_WIDTH, FIELD_WIDTH)
}

/// Decode the data field at `index` (0 to 5)
pub fn read_field<T: EndfField>(line: &str, index: usize, opts: &ParsingOptions) -> Result<T> {
    T::decode(field_text(line, index)?, opts)
}

fn column(line: &str, start: usize, width: usize) -> Result<&str> {
    line.column(start, width)
        .ok_or_else(|| Error::MalformedNumber {
            text: line.to_string(),
            reason: f!("columns {start}-{} split a character", start + width),
        })
}

// ! Writing

/// Blank line of the configured width holding only the control fields
pub fn blank_line(id: ControlId, opts: &WritingOptions) -> Result<String> {
    let mut line = " ".repeat(opts.line_width());
    write_custom_int(&mut line, MAT_COLUMNS, id.mat as i64)?;
    write_custom_int(&mut line, MF_COLUMNS, id.mf as i64)?;
    write_custom_int(&mut line, MT_COLUMNS, id.mt as i64)?;
    Ok(line)
}

/// Right justify an integer into a column range of a line
///
/// The line is padded with spaces first if it is too short.
pub fn write_custom_int(line: &mut String, (start, width): (usize, usize), value: i64) -> Result<()> {
    let text = f!("{value:>width$}");
    if text.len() > width {
        return Err(Error::FieldWidth { text, width });
    }
    replace_columns(line, start, &text);
    Ok(())
}

/// Place already encoded field text into the data field at `index`
pub fn write_field_text(line: &mut String, index: usize, text: &str) -> Result<()> {
    if text.len() != FIELD_WIDTH {
        return Err(Error::FieldWidth {
            text: text.to_string(),
            width: FIELD_WIDTH,
        });
    }
    replace_columns(line, index * FIELD_WIDTH, text);
    Ok(())
}

/// Encode a value into the data field at `index`
pub fn write_field<T: EndfField>(
    line: &mut String,
    index: usize,
    value: &T,
    opts: &WritingOptions,
) -> Result<()> {
    write_field_text(line, index, &value.encode(opts)?)
}

fn replace_columns(line: &mut String, start: usize, text: &str) {
    let end = start + text.len();
    if line.len() < end {
        line.extend(std::iter::repeat(' ').take(end - line.len()));
    }
    line.replace_range(start..end, text);
}

// ! Record checks

/// True if the six fields and MF/MT are all zero
fn is_zero_record(line: &str, opts: &ParsingOptions) -> Result<bool> {
    Ok(ContRecord::from_line(line, opts)?.is_zero() && read_mf(line)? == 0 && read_mt(line)? == 0)
}

/// Check for a file end (FEND) record of material `mat`
///
/// A MAT other than `mat` is an error when control records are validated.
/// Since MEND and TEND records share the layout, they are also FEND records
/// when validation is off.
///
/// ```rust
/// # use endftools_records::{is_fend, ParsingOptions};
/// let fend = " 0.000000+0 0.000000+0          0          0          0          0 125 0  0    0";
/// assert!(is_fend(fend, 125, &ParsingOptions::default()).unwrap());
/// ```
pub fn is_fend(line: &str, mat: i32, opts: &ParsingOptions) -> Result<bool> {
    let found = read_mat(line)?;
    if opts.validate_control_records && found != mat {
        return Err(Error::ControlRecordMismatch {
            field: "MAT",
            expected: mat,
            actual: found,
            line: line.to_string(),
        });
    }
    is_zero_record(line, opts)
}

/// Check for a material end (MEND) record, i.e. a FEND with MAT=0
pub fn is_mend(line: &str, opts: &ParsingOptions) -> Result<bool> {
    Ok(read_mat(line)? == 0 && is_zero_record(line, opts)?)
}

/// Check for a tape end (TEND) record, i.e. a FEND with MAT=-1
pub fn is_tend(line: &str, opts: &ParsingOptions) -> Result<bool> {
    Ok(read_mat(line)? == -1 && is_zero_record(line, opts)?)
}

/// Check for a section end (SEND) record of file `mf`
///
/// Same zero fields as the other end records, but with a non-zero MF.
pub fn is_send(line: &str, mf: i32, opts: &ParsingOptions) -> Result<bool> {
    Ok(ContRecord::from_line(line, opts)?.is_zero() && read_mf(line)? == mf && read_mt(line)? == 0)
}

/// True if every character of the line is a space
pub fn is_blank(line: &str) -> bool {
    line.is_blank()
}

// ! Records

/// Contents of a HEAD or CONT record
///
/// The two floats followed by four integers that make up the data area of
/// most control records. A SEND record is the all-zero CONT with MT=0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContRecord {
    /// First float field
    pub c1: f64,
    /// Second float field
    pub c2: f64,
    /// First integer field
    pub l1: i64,
    /// Second integer field
    pub l2: i64,
    /// Third integer field, usually a count
    pub n1: i64,
    /// Fourth integer field, usually a count
    pub n2: i64,
}

impl ContRecord {
    /// Decode the six data fields of a line
    pub fn from_line(line: &str, opts: &ParsingOptions) -> Result<Self> {
        Ok(Self {
            c1: read_field(line, 0, opts)?,
            c2: read_field(line, 1, opts)?,
            l1: read_field(line, 2, opts)?,
            l2: read_field(line, 3, opts)?,
            n1: read_field(line, 4, opts)?,
            n2: read_field(line, 5, opts)?,
        })
    }

    /// Encode into the data fields of a prepared line
    pub fn write_into(&self, line: &mut String, opts: &WritingOptions) -> Result<()> {
        write_field(line, 0, &self.c1, opts)?;
        write_field(line, 1, &self.c2, opts)?;
        write_field(line, 2, &self.l1, opts)?;
        write_field(line, 3, &self.l2, opts)?;
        write_field(line, 4, &self.n1, opts)?;
        write_field(line, 5, &self.n2, opts)
    }

    /// True if every field is zero
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// The 66-character data area of a TEXT record
pub fn read_text(line: &str) -> Result<String> {
    Ok(column(line, 0, DATA_WIDTH)?.to_string())
}

#[cfg(test)]
mod line_tests {
    use super::*;

    const HEAD: &str =
        " 9.223500+4 2.330248+2          0          0          0          69228 1451    1";

    #[test]
    fn control_fields() {
        assert_eq!(read_mat(HEAD).unwrap(), 9228);
        assert_eq!(read_mf(HEAD).unwrap(), 1);
        assert_eq!(read_mt(HEAD).unwrap(), 451);
        assert_eq!(read_custom_int(HEAD, 75, 5).unwrap(), 1);
    }

    #[test]
    fn short_line_is_padded() {
        assert_eq!(read_mat(" 1.0").unwrap(), 0);
        assert_eq!(read_field::<f64>(" 1.0", 0, &ParsingOptions::default()).unwrap(), 1.0);
        assert_eq!(read_field::<i64>(" 1.0", 5, &ParsingOptions::default()).unwrap(), 0);
    }

    #[test]
    fn cont_record() {
        let cont = ContRecord::from_line(HEAD, &ParsingOptions::default()).unwrap();
        assert_eq!(cont.c1, 92235.0);
        assert_eq!(cont.c2, 233.0248);
        assert_eq!(cont.n2, 6);
        assert!(!cont.is_zero());

        let mut line = blank_line(ControlId::new(9228, 1, 451), &WritingOptions::default()).unwrap();
        cont.write_into(&mut line, &WritingOptions::default()).unwrap();
        write_custom_int(&mut line, LINE_NUMBER_COLUMNS, 1).unwrap();
        assert_eq!(line, HEAD);
    }

    #[test]
    fn blank_line_widths() {
        let id = ControlId::new(125, 3, 1);
        let line = blank_line(id, &WritingOptions::default()).unwrap();
        assert_eq!(line.len(), 80);
        assert_eq!(&line[66..], " 125 3  1     ");

        let opts = WritingOptions {
            include_linenum: false,
            ..Default::default()
        };
        let line = blank_line(id, &opts).unwrap();
        assert_eq!(line.len(), 75);
        assert!(line[..66].is_blank());
    }

    #[test]
    fn oversized_control_field() {
        let mut line = " ".repeat(80);
        assert!(write_custom_int(&mut line, MF_COLUMNS, 100).is_err());
        assert!(write_custom_int(&mut line, MAT_COLUMNS, -1).is_ok());
        assert_eq!(read_mat(&line).unwrap(), -1);
    }

    #[test]
    fn send_record() {
        let send = " 0.000000+0 0.000000+0          0          0          0          09228 3  099999";
        let opts = ParsingOptions::default();
        assert!(is_send(send, 3, &opts).unwrap());
        assert!(!is_send(send, 4, &opts).unwrap());
        assert!(!is_fend(send, 9228, &opts).unwrap());
    }

    #[test]
    fn fend_validation() {
        let fend = " 0.000000+0 0.000000+0          0          0          0          09228 0  0    0";
        let opts = ParsingOptions {
            validate_control_records: true,
            ..Default::default()
        };
        assert!(is_fend(fend, 9228, &opts).unwrap());
        assert!(matches!(
            is_fend(fend, 125, &opts),
            Err(Error::ControlRecordMismatch { field: "MAT", .. })
        ));
        // never an error, just not a MEND
        assert!(!is_mend(fend, &opts).unwrap());
    }

    #[test]
    fn text_record() {
        let line = f!("{:<66}9228 1451    5", " some descriptive text");
        assert_eq!(read_text(&line).unwrap().trim_end(), " some descriptive text");
    }
}
