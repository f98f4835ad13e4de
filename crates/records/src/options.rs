//! Configuration shared by every read and write operation
//!
//! Both option sets can be built in code, starting from [Default], or loaded
//! from a JSON object in which any omitted key takes its default.
//!
//! ```rust
//! # use endftools_records::{ParsingOptions, WritingOptions};
//! # use endftools_store::ArrayType;
//! let opts = ParsingOptions::from_json(r#"{"accept_spaces": false, "array_type": "list"}"#).unwrap();
//! assert!(!opts.accept_spaces);
//! assert!(opts.ignore_zero_mismatch);
//! assert_eq!(opts.array_type, ArrayType::List);
//!
//! assert!(WritingOptions::from_json(r#"{"keepE": true}"#).is_err());
//! ```

// internal modules
use crate::error::{Error, Result};

// external crates
use endftools_store::ArrayType;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leniency switches used while reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingOptions {
    /// Accept a literal number in a template that differs from the file
    pub ignore_number_mismatch: bool,
    /// Accept a non-zero value where a template expects a literal zero
    pub ignore_zero_mismatch: bool,
    /// Accept inconsistent values for expressions bound to variables
    pub ignore_varspec_mismatch: bool,
    /// Allow spaces inside numeric fields
    pub accept_spaces: bool,
    /// Skip blank lines between records of a tape
    pub ignore_blank_lines: bool,
    /// Do not require or check SEND/FEND/MEND/TEND records
    pub ignore_send_records: bool,
    /// Accept a tape without a tape identification record
    pub ignore_missing_tpid: bool,
    /// Keep the original text of every float alongside its value
    pub preserve_value_strings: bool,
    /// Check MAT, MF and MT of every line read
    pub validate_control_records: bool,
    /// Container type for arrays assembled from the records
    pub array_type: ArrayType,
}

impl Default for ParsingOptions {
    fn default() -> Self {
        Self {
            ignore_number_mismatch: false,
            ignore_zero_mismatch: true,
            ignore_varspec_mismatch: true,
            accept_spaces: true,
            ignore_blank_lines: false,
            ignore_send_records: false,
            ignore_missing_tpid: false,
            preserve_value_strings: false,
            validate_control_records: false,
            array_type: ArrayType::Map,
        }
    }
}

impl ParsingOptions {
    const KEYS: [&'static str; 10] = [
        "ignore_number_mismatch",
        "ignore_zero_mismatch",
        "ignore_varspec_mismatch",
        "accept_spaces",
        "ignore_blank_lines",
        "ignore_send_records",
        "ignore_missing_tpid",
        "preserve_value_strings",
        "validate_control_records",
        "array_type",
    ];

    /// Options from a JSON object, omitted keys taking their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        options_from_json(json, &Self::KEYS)
    }

    /// Pretty JSON object holding every option
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Formatting switches used while writing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingOptions {
    /// Use the sign column of non-negative floats for an extra digit
    pub abuse_signpos: bool,
    /// Keep the exponent letter, e.g. `1.23456E+5` rather than `1.234567+5`
    #[serde(rename = "keep_E")]
    pub keep_e: bool,
    /// Use a fixed-point form whenever it is at least as accurate
    pub prefer_noexp: bool,
    /// Drop the integer zero of fixed-point numbers, e.g. `.123456789`
    pub skip_intzero: bool,
    /// Write floats using the text they were read from, when available
    pub preserve_value_strings: bool,
    /// Fill columns 76-80 with sequence numbers
    pub include_linenum: bool,
    /// Container type expected for arrays that are written
    pub array_type: ArrayType,
}

impl Default for WritingOptions {
    fn default() -> Self {
        Self {
            abuse_signpos: false,
            keep_e: false,
            prefer_noexp: false,
            skip_intzero: false,
            preserve_value_strings: false,
            include_linenum: true,
            array_type: ArrayType::Map,
        }
    }
}

impl WritingOptions {
    const KEYS: [&'static str; 7] = [
        "abuse_signpos",
        "keep_E",
        "prefer_noexp",
        "skip_intzero",
        "preserve_value_strings",
        "include_linenum",
        "array_type",
    ];

    /// Options from a JSON object, omitted keys taking their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        options_from_json(json, &Self::KEYS)
    }

    /// Pretty JSON object holding every option
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Width of a line including the optional sequence number
    pub fn line_width(&self) -> usize {
        match self.include_linenum {
            true => 80,
            false => 75,
        }
    }
}

/// Merge provided keys over the defaults, checking each entry in turn
fn options_from_json<T>(json: &str, keys: &[&str]) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    let provided: Map<String, Value> = serde_json::from_str(json)?;

    let Value::Object(mut merged) = serde_json::to_value(T::default())? else {
        return Err(Error::InvalidOptionValue {
            key: String::new(),
            reason: "options must serialise to an object".to_string(),
        });
    };

    for (key, value) in provided {
        if !keys.contains(&key.as_str()) {
            return Err(Error::UnknownOption(key));
        }
        merged.insert(key.clone(), value);
        serde_json::from_value::<T>(Value::Object(merged.clone())).map_err(|e| {
            Error::InvalidOptionValue {
                key,
                reason: e.to_string(),
            }
        })?;
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}
