//! Encoding and decoding of the 11-character numeric fields
//!
//! Every data field of an ENDF-6 line is 11 characters wide. Floats are
//! written in a compact scientific form that drops the exponent letter, so
//! that `1.234567+5` is read as `1.234567e+5`.
//!
//! ```rust
//! # use endftools_records::{decode_float, encode_float, ParsingOptions, WritingOptions};
//! let text = encode_float(3.141593, &WritingOptions::default()).unwrap();
//! assert_eq!(text, " 3.141593+0");
//!
//! let value = decode_float(&text, &ParsingOptions::default()).unwrap();
//! assert_eq!(value, 3.141593);
//! ```

// standard library
use std::cmp::Ordering;
use std::fmt;

// internal modules
use crate::error::{Error, Result};
use crate::options::{ParsingOptions, WritingOptions};
use crate::parsers::{endf_float, endf_int};

// endftools modules
use endftools_utils::{f, ValueExt};

// external crates
use log::{trace, warn};
use nom::combinator::all_consuming;
use serde::{Deserialize, Serialize};

/// Width of every data field
pub const FIELD_WIDTH: usize = 11;

/// Upper bound on precision adjustments when fitting a float to the field
const MAX_PRECISION_STEPS: usize = 18;

// ! Decoding

/// Decode the text of a float field
///
/// A blank field is zero. Spaces inside the number are removed when
/// `accept_spaces` is set and are an error otherwise.
///
/// ```rust
/// # use endftools_records::{decode_float, ParsingOptions};
/// let opts = ParsingOptions::default();
/// assert_eq!(decode_float(" 1.500000-3", &opts).unwrap(), 0.0015);
/// assert_eq!(decode_float("-2.0 E+1   ", &opts).unwrap(), -20.0);
/// assert_eq!(decode_float("           ", &opts).unwrap(), 0.0);
/// assert!(decode_float("  1.0abc   ", &opts).is_err());
/// ```
pub fn decode_float(field: &str, opts: &ParsingOptions) -> Result<f64> {
    let text = field.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let text = match opts.accept_spaces {
        true => text.replace(' ', ""),
        false => text.to_string(),
    };

    let (_, value) = all_consuming(endf_float)(&text).map_err(|_| Error::MalformedNumber {
        text: field.to_string(),
        reason: match text.contains(' ') {
            true => "spaces within a number".to_string(),
            false => "not a valid float".to_string(),
        },
    })?;
    Ok(value)
}

/// Decode the text of an integer field
///
/// A blank field is zero, otherwise the leading integer is taken and
/// anything after its last digit is ignored.
///
/// ```rust
/// # use endftools_records::decode_int;
/// assert_eq!(decode_int("       9228").unwrap(), 9228);
/// assert_eq!(decode_int("  -12      ").unwrap(), -12);
/// assert_eq!(decode_int("           ").unwrap(), 0);
/// assert!(decode_int("  abc      ").is_err());
/// ```
pub fn decode_int(field: &str) -> Result<i64> {
    let text = field.trim_start();
    if text.trim_end().is_empty() {
        return Ok(0);
    }

    endf_int(text)
        .map(|(_, value)| value)
        .map_err(|_| Error::MalformedNumber {
            text: field.to_string(),
            reason: "not a valid integer".to_string(),
        })
}

// ! Encoding

/// Encode a float into exactly 11 characters
///
/// The default is the compact scientific form, right justified with the sign
/// column left free for non-negative values. With `prefer_noexp` a fixed-point
/// form is used instead whenever it is at least as accurate.
///
/// ```rust
/// # use endftools_records::{encode_float, WritingOptions};
/// let mut opts = WritingOptions::default();
/// assert_eq!(encode_float(-1.0e-10, &opts).unwrap(), "-1.00000-10");
///
/// opts.keep_e = true;
/// assert_eq!(encode_float(1.5, &opts).unwrap(), " 1.50000E+0");
///
/// opts.keep_e = false;
/// opts.abuse_signpos = true;
/// assert_eq!(encode_float(1.5, &opts).unwrap(), "1.5000000+0");
///
/// opts.abuse_signpos = false;
/// opts.prefer_noexp = true;
/// assert_eq!(encode_float(0.123456789, &opts).unwrap(), " 0.12345679");
/// ```
pub fn encode_float(value: f64, opts: &WritingOptions) -> Result<String> {
    let exp_form = exponent_form(value, opts)?;
    if !opts.prefer_noexp {
        return Ok(exp_form);
    }

    let Some(fixed_form) = fixed_point_form(value, opts) else {
        return Ok(exp_form);
    };

    let lenient = ParsingOptions::default();
    let exp_delta = (decode_float(&exp_form, &lenient)? - value).abs();
    let fixed_delta = (decode_float(&fixed_form, &lenient)? - value).abs();

    match exp_delta < fixed_delta {
        true => Ok(exp_form),
        false => Ok(f!("{fixed_form:>FIELD_WIDTH$}")),
    }
}

/// Compact scientific form padded to the field width
fn exponent_form(value: f64, opts: &WritingOptions) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::FieldWidth {
            text: value.to_string(),
            width: FIELD_WIDTH,
        });
    }

    // negative zero is written as zero
    let value = match value == 0.0 {
        true => 0.0,
        false => value,
    };

    let uses_sign_column = value < 0.0 || opts.abuse_signpos;
    let target = match uses_sign_column {
        true => FIELD_WIDTH,
        false => FIELD_WIDTH - 1,
    };

    let mut precision = 6;
    if opts.keep_e {
        precision -= 1;
    }
    if opts.abuse_signpos && value >= 0.0 {
        precision += 1;
    }

    // Each extra digit of precision adds at most one character, since rounding
    // can only shorten the exponent as precision grows. The search therefore
    // only ever moves towards the target and cannot oscillate.
    let mut text = value.endf_sci(precision, opts.keep_e);
    for _ in 0..MAX_PRECISION_STEPS {
        match text.len().cmp(&target) {
            Ordering::Equal => return Ok(f!("{text:>FIELD_WIDTH$}")),
            Ordering::Greater => {
                let excess = text.len() - target;
                if excess > precision {
                    break;
                }
                precision -= excess;
            }
            Ordering::Less => precision += 1,
        }
        text = value.endf_sci(precision, opts.keep_e);
    }

    Err(Error::FieldWidth {
        text,
        width: FIELD_WIDTH,
    })
}

/// Fixed-point form with insignificant trailing zeros removed
///
/// Returns `None` if the integer part alone is too wide for the field.
fn fixed_point_form(value: f64, opts: &WritingOptions) -> Option<String> {
    if !value.is_finite() || value.abs() >= 1e11 {
        return None;
    }

    let int_part = value.trunc() as i64;
    let is_integer = value.trunc() == value;
    if is_integer && int_part == 0 {
        return Some("0".to_string());
    }

    let skip_zero = opts.skip_intzero && int_part == 0;
    let width = FIELD_WIDTH + skip_zero as usize;

    // sign and decimal point
    let mut reserved = 2;
    if opts.abuse_signpos && value > 0.0 {
        reserved -= 1;
    }
    if is_integer {
        reserved -= 1;
    }

    let int_len = int_part.unsigned_abs().to_string().len();
    let mut text = match width.checked_sub(reserved + int_len) {
        Some(precision) if precision > 0 && !is_integer => {
            let mut text = f!("{value:>width$.precision$}");
            if skip_zero {
                if let Some(dot) = text.find('.').filter(|&p| p > 0) {
                    text.remove(dot - 1);
                }
            }
            text
        }
        _ => {
            let mut text = int_part.to_string();
            if value > 0.0 && !opts.abuse_signpos {
                text.insert(0, ' ');
            }
            if text.len() + 2 <= FIELD_WIDTH {
                text.push('.');
                text = f!("{text:0<FIELD_WIDTH$}");
            }
            text
        }
    };

    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
        if matches!(text.trim(), "" | "+" | "-") {
            text = "0".to_string();
        }
    }

    (text.len() <= FIELD_WIDTH).then_some(text)
}

/// Encode an integer right justified into exactly 11 characters
///
/// ```rust
/// # use endftools_records::encode_int;
/// assert_eq!(encode_int(-1).unwrap(), "         -1");
/// assert_eq!(encode_int(99999999999).unwrap(), "99999999999");
/// assert!(encode_int(100000000000).is_err());
/// ```
pub fn encode_int(value: i64) -> Result<String> {
    let text = f!("{value:>FIELD_WIDTH$}");
    match text.len() {
        FIELD_WIDTH => Ok(text),
        _ => Err(Error::FieldWidth {
            text,
            width: FIELD_WIDTH,
        }),
    }
}

// ! Validation

/// Description of a template field that a value is checked against
///
/// The flags come from analysing the template expression. A field is either
/// a literal number or an expression involving variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldTemplate<'a> {
    /// Expression as written in the template, e.g. `2*NR`
    pub expression: &'a str,
    /// Full template line, for error messages
    pub template: &'a str,
    /// Whether the expression involves any variable
    pub contains_variable: bool,
    /// Whether the literal is one whose value really matters
    pub contains_desired_number: bool,
    /// Whether variables of the expression were already bound differently
    pub contains_inconsistent_varspec: bool,
}

/// Check an actual value read from `line` against the expected one
///
/// Mismatches are compared by numeric value. Those covered by a leniency
/// switch are logged and accepted.
///
/// ```rust
/// # use endftools_records::{validate_field, FieldTemplate, ParsingOptions};
/// let opts = ParsingOptions::default();
/// let literal = FieldTemplate { expression: "0", ..Default::default() };
///
/// // non-zero where zero is expected is fine by default
/// assert!(validate_field(0.0, 5.0, &literal, "", &opts).is_ok());
/// assert!(validate_field(1.0, 5.0, &literal, "", &opts).is_err());
/// ```
pub fn validate_field(
    expected: f64,
    actual: f64,
    field: &FieldTemplate,
    line: &str,
    opts: &ParsingOptions,
) -> Result<()> {
    if expected == actual {
        return Ok(());
    }

    if !field.contains_variable {
        if expected == 0.0 && opts.ignore_zero_mismatch {
            warn!("Ignoring non-zero value {actual} where zero was expected");
            return Ok(());
        }
        if field.contains_desired_number && opts.ignore_number_mismatch {
            warn!("Ignoring value {actual} where {expected} was expected");
            return Ok(());
        }
        return Err(Error::NumberMismatch {
            expected,
            actual,
            line: line.to_string(),
            template: field.template.to_string(),
        });
    }

    if field.contains_inconsistent_varspec && opts.ignore_varspec_mismatch {
        warn!(
            "Ignoring inconsistent {} (expected {expected}, found {actual})",
            field.expression
        );
        return Ok(());
    }

    Err(Error::VarSpecMismatch {
        expression: field.expression.to_string(),
        expected,
        actual,
        line: line.to_string(),
        template: field.template.to_string(),
    })
}

// ! Field types

/// Float that may remember the exact text it was read from
///
/// Comparisons only ever look at the value, so two instances read from
/// `" 1.000000+0"` and `" 1.0      "` are equal.
///
/// ```rust
/// # use endftools_records::{EndfFloat, EndfField, ParsingOptions, WritingOptions};
/// let read_opts = ParsingOptions { preserve_value_strings: true, ..Default::default() };
/// let write_opts = WritingOptions { preserve_value_strings: true, ..Default::default() };
///
/// let x = EndfFloat::decode(" 1.0       ", &read_opts).unwrap();
/// assert_eq!(x, EndfFloat::from(1.0));
/// assert_eq!(x.encode(&write_opts).unwrap(), " 1.0       ");
/// assert_eq!(x.encode(&WritingOptions::default()).unwrap(), " 1.000000+0");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndfFloat {
    /// Numeric value
    pub value: f64,
    /// Field text the value was decoded from, if preserved
    pub original: Option<String>,
}

impl EndfFloat {
    /// Value with no original text
    pub fn new(value: f64) -> Self {
        Self {
            value,
            original: None,
        }
    }

    /// Value together with the text it was read from
    pub fn with_original(value: f64, original: impl Into<String>) -> Self {
        Self {
            value,
            original: Some(original.into()),
        }
    }
}

impl From<f64> for EndfFloat {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<EndfFloat> for f64 {
    fn from(value: EndfFloat) -> Self {
        value.value
    }
}

impl PartialEq for EndfFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for EndfFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for EndfFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Anything that can be read from and written to a single data field
pub trait EndfField: Sized {
    /// Decode the text of one field
    fn decode(field: &str, opts: &ParsingOptions) -> Result<Self>;

    /// Encode into exactly [FIELD_WIDTH] characters
    fn encode(&self, opts: &WritingOptions) -> Result<String>;

    /// Numeric value, used for validation
    fn as_f64(&self) -> f64;
}

impl EndfField for f64 {
    fn decode(field: &str, opts: &ParsingOptions) -> Result<Self> {
        decode_float(field, opts)
    }

    fn encode(&self, opts: &WritingOptions) -> Result<String> {
        encode_float(*self, opts)
    }

    fn as_f64(&self) -> f64 {
        *self
    }
}

impl EndfField for i64 {
    fn decode(field: &str, _: &ParsingOptions) -> Result<Self> {
        decode_int(field)
    }

    fn encode(&self, _: &WritingOptions) -> Result<String> {
        encode_int(*self)
    }

    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl EndfField for EndfFloat {
    fn decode(field: &str, opts: &ParsingOptions) -> Result<Self> {
        let value = decode_float(field, opts)?;
        Ok(match opts.preserve_value_strings {
            true => Self::with_original(value, field),
            false => Self::new(value),
        })
    }

    fn encode(&self, opts: &WritingOptions) -> Result<String> {
        match (&self.original, opts.preserve_value_strings) {
            (Some(original), true) => {
                trace!("Writing preserved float text \"{original}\"");
                match original.len() {
                    FIELD_WIDTH => Ok(original.clone()),
                    _ => Err(Error::FieldWidth {
                        text: original.clone(),
                        width: FIELD_WIDTH,
                    }),
                }
            }
            _ => encode_float(self.value, opts),
        }
    }

    fn as_f64(&self) -> f64 {
        self.value
    }
}
