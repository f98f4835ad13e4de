//! Tabulated function bodies of TAB1 and TAB2 records

// internal modules
use crate::error::{Error, Result};

// external crates
use itertools::{interleave, Itertools};
use serde::{Deserialize, Serialize};

/// Interpolation regions of a TAB2 record
///
/// `nbt[i]` is the index of the last point of region `i`, and `int[i]` the
/// interpolation scheme used within it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tab2Body {
    /// Region boundaries (NBT)
    pub nbt: Vec<i64>,
    /// Interpolation scheme codes (INT)
    pub int: Vec<i64>,
}

impl Tab2Body {
    /// Number of interpolation regions (NR)
    pub fn nr(&self) -> usize {
        self.nbt.len()
    }

    /// Fails if NBT and INT differ in length
    pub fn check(&self) -> Result<()> {
        check_lengths("NBT and INT", self.nbt.len(), self.int.len())
    }

    /// Pairs flattened in file order, i.e. `NBT1 INT1 NBT2 INT2 ...`
    pub(crate) fn interleaved(&self) -> Vec<i64> {
        interleave(&self.nbt, &self.int).copied().collect()
    }

    /// Split values read in file order back into NBT and INT
    pub(crate) fn from_interleaved(values: Vec<i64>) -> Self {
        let (nbt, int) = values.into_iter().tuples::<(i64, i64)>().unzip();
        Self { nbt, int }
    }
}

/// Interpolation regions and data points of a TAB1 record
///
/// ```rust
/// # use endftools_records::Tab1Body;
/// let body = Tab1Body {
///     nbt: vec![3],
///     int: vec![2],
///     x: vec![1.0e-5, 1.0, 2.0e7],
///     y: vec![10.0, 5.0, 1.0],
/// };
/// assert_eq!(body.nr(), 1);
/// assert_eq!(body.np(), 3);
/// assert!(body.check().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tab1Body {
    /// Region boundaries (NBT)
    pub nbt: Vec<i64>,
    /// Interpolation scheme codes (INT)
    pub int: Vec<i64>,
    /// Abscissae
    pub x: Vec<f64>,
    /// Ordinates
    pub y: Vec<f64>,
}

impl Tab1Body {
    /// Number of interpolation regions (NR)
    pub fn nr(&self) -> usize {
        self.nbt.len()
    }

    /// Number of data points (NP)
    pub fn np(&self) -> usize {
        self.x.len()
    }

    /// Fails if NBT/INT or X/Y differ in length
    pub fn check(&self) -> Result<()> {
        check_lengths("NBT and INT", self.nbt.len(), self.int.len())?;
        check_lengths("X and Y", self.x.len(), self.y.len())
    }

    /// Interpolation regions alone
    pub fn interpolation(&self) -> Tab2Body {
        Tab2Body {
            nbt: self.nbt.clone(),
            int: self.int.clone(),
        }
    }

    /// Data points flattened in file order, i.e. `X1 Y1 X2 Y2 ...`
    pub(crate) fn interleaved_points(&self) -> Vec<f64> {
        interleave(&self.x, &self.y).copied().collect()
    }

    /// Combine interpolation regions with points read in file order
    pub(crate) fn from_parts(interpolation: Tab2Body, points: Vec<f64>) -> Self {
        let (x, y) = points.into_iter().tuples::<(f64, f64)>().unzip();
        Self {
            nbt: interpolation.nbt,
            int: interpolation.int,
            x,
            y,
        }
    }
}

fn check_lengths(what: &'static str, left: usize, right: usize) -> Result<()> {
    match left == right {
        true => Ok(()),
        false => Err(Error::LengthMismatch { what, left, right }),
    }
}
