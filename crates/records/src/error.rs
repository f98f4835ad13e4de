//! Result and Error types for the ENDF records module

/// Type alias for `Result<T, records::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `endftools-records`
///
/// Every failure tied to a specific line carries the offending line text so
/// that a user can find it in the file.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to (de)serialise options as JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Input ended in the middle of a record
    #[error("unexpected end of input")]
    EndOfFile,

    /// Field text could not be interpreted as a number
    #[error("malformed number \"{text}\" ({reason})")]
    MalformedNumber { text: String, reason: String },

    /// Encoded field could not be made exactly the required width
    #[error("\"{text}\" does not fit a field of exactly {width} characters")]
    FieldWidth { text: String, width: usize },

    /// Control field of a line differs from the one expected
    #[error("invalid {field} encountered (expected {field}={expected}, found {field}={actual})\nLine: {line}")]
    ControlRecordMismatch {
        field: &'static str,
        expected: i32,
        actual: i32,
        line: String,
    },

    /// Literal number in a template differs from the value in the file
    #[error("expected a field to contain the value {expected} but found {actual}\nTemplate: {template}\nLine: {line}")]
    NumberMismatch {
        expected: f64,
        actual: f64,
        line: String,
        template: String,
    },

    /// Value of an expression with variables differs from the value in the file
    #[error("invalid {expression} encountered (expected {expected}, found {actual})\nTemplate: {template}\nLine: {line}")]
    VarSpecMismatch {
        expression: String,
        expected: f64,
        actual: f64,
        line: String,
        template: String,
    },

    /// Line expected to be a SEND record is not one
    #[error("expected SEND record does not contain one\nLine: {line}")]
    SendRecordFormat { line: String },

    /// Section is not terminated by the SEND record of its MF/MT
    #[error("expected SEND of MF/MT {mf}/{mt}, found {}", .line.as_deref().unwrap_or("end of input"))]
    UnexpectedEndOfSection {
        mf: i32,
        mt: i32,
        line: Option<String>,
    },

    /// Option name that is not recognised
    #[error("unknown option `{0}` provided")]
    UnknownOption(String),

    /// Option value of the wrong type or out of range
    #[error("invalid value for option `{key}` ({reason})")]
    InvalidOptionValue { key: String, reason: String },

    /// Sections must contain at least one line
    #[error("an MF/MT section must not be represented by an empty list of lines")]
    EmptySection,

    /// Blank line where a record was expected
    #[error("line {line_number} is a blank line")]
    BlankLine { line_number: usize },

    /// First line of a tape is not a tape identification record
    #[error("tape head (TPID) must contain MF=0, MT=0 in control record\nLine: {line}")]
    MissingTapeId { line: String },

    /// Record in a place where it is not allowed
    #[error("{reason}\nLine: {line}")]
    UnexpectedRecord { reason: String, line: String },

    /// Input ended before the required end record
    #[error("reached the end of input but {record} record is missing")]
    MissingEndRecord { record: &'static str },

    /// Paired arrays of a tabulated body differ in length
    #[error("{what} must have the same length (found {left} and {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },
}
