//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, slicing fixed-width columns out of a line or rendering numbers
//! in the compact ENDF scientific form are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod string_ext;
mod value_ext;

// Flatten
pub use string_ext::StringExt;
pub use value_ext::ValueExt;
