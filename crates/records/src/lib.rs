//! Module for reading and writing ENDF-6 records
//!
//! Every ENDF-6 line is 80 characters of fixed columns: six 11-character data
//! fields followed by the MAT, MF and MT control numbers and an optional
//! sequence number.
//!
//! ```text
//!  9.223500+4 2.330248+2          0          0          0          69228 1451    1
//! |-- c1 ---||-- c2 ---||-- l1 ---||-- l2 ---||-- n1 ---||-- n2 ---||MAT|MF|MT|NS |
//! ```
//!
//! The crate is split into layers that build on each other:
//!
//! | Layer              | Description                                          |
//! | ------------------ | ---------------------------------------------------- |
//! | fields             | [decode_float], [encode_float] and friends           |
//! | lines              | control columns, [ContRecord] and end-record checks  |
//! | [RecordStream]     | reading CONT, LIST, TAB1, TAB2 records and sections  |
//! | [RecordWriter]     | writing the same, with sequence numbers              |
//! | [Tape]             | splitting whole tapes into raw sections and back     |
//!
//! Reading is governed by [ParsingOptions] and writing by [WritingOptions].
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use endftools_records::{read_tape_file, write_tape_file, ParsingOptions, WritingOptions};
//! // Split a tape into its sections
//! let tape = read_tape_file("/path/to/n-U235.endf", &ParsingOptions::default()).unwrap();
//!
//! // Look at the header section of a material
//! for line in tape.section(9228, 1, 451).unwrap() {
//!     println!("{line}");
//! }
//!
//! // Write it back out with fresh sequence numbers
//! write_tape_file("/path/to/copy.endf", &tape, &WritingOptions::default()).unwrap();
//! ```

mod error;
mod field;
mod line;
mod options;
mod parsers;
mod reader;
mod tab;
mod tape;
mod writer;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use field::{
    decode_float, decode_int, encode_float, encode_int, validate_field, EndfField, EndfFloat,
    FieldTemplate, FIELD_WIDTH,
};

#[doc(inline)]
pub use line::{
    blank_line, field_text, is_blank, is_fend, is_mend, is_send, is_tend, read_custom_int,
    read_field, read_mat, read_mf, read_mt, read_text, write_custom_int, write_field,
    write_field_text, ContRecord, ControlId, DATA_WIDTH, FIELDS_PER_LINE,
};

#[doc(inline)]
pub use options::{ParsingOptions, WritingOptions};

#[doc(inline)]
pub use reader::RecordStream;

#[doc(inline)]
pub use tab::{Tab1Body, Tab2Body};

#[doc(inline)]
pub use tape::{read_tape, read_tape_file, write_tape, write_tape_file, Tape};

#[doc(inline)]
pub use writer::RecordWriter;

/// Parser functions for numeric field text
pub mod parse {
    #[doc(inline)]
    pub use crate::parsers::{endf_float, endf_int};
}
