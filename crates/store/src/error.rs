//! Result and Error types for the indexed store

/// Type alias for `Result<T, store::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `endftools-store`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Index that maps outside of dense list storage
    #[error("list index out of range for `{varname}` (index {index} shifted to {effective})")]
    IndexRange {
        varname: String,
        index: i64,
        effective: i64,
    },

    /// Indices were given for a variable holding a plain value
    #[error("`{varname}` holds a value where a nested container was expected")]
    NotAContainer { varname: String },

    /// Array type name that is not recognised
    #[error("unknown array type \"{0}\" (expected \"map\" or \"list\")")]
    UnknownArrayType(String),
}
