//! Library of parser functions for numeric field text

// endftools modules
use endftools_utils::f;

// nom parser combinators
use nom::character::complete::{digit1, one_of};
use nom::combinator::{cond, opt, recognize};
use nom::error::{Error, ErrorKind};
use nom::number::complete::recognize_float;
use nom::sequence::pair;
use nom::{Err, IResult};

/// Parse an ENDF float, with or without the exponent letter
///
/// A standard float such as `1.5e+3` is accepted as is. When the mantissa has
/// no exponent, a trailing signed integer is treated as the exponent so that
/// `1.5+3` and `1.5-3` read as `1.5e+3` and `1.5e-3`.
pub fn endf_float(i: &str) -> IResult<&str, f64> {
    let (i, mantissa) = recognize_float(i)?;
    let has_exponent = mantissa.contains(['e', 'E']);
    let (i, exponent) = cond(!has_exponent, opt(implicit_exponent))(i)?;

    let number = match exponent.flatten() {
        Some(exponent) => f!("{mantissa}e{exponent}"),
        None => mantissa.to_string(),
    };

    match number.parse() {
        Ok(value) => Ok((i, value)),
        Err(_) => Err(Err::Error(Error::new(i, ErrorKind::Float))),
    }
}

/// Signed exponent abutting the mantissa, e.g. the `+5` of `1.234567+5`
fn implicit_exponent(i: &str) -> IResult<&str, &str> {
    recognize(pair(one_of("+-"), digit1))(i)
}

/// Parse a signed base-10 integer prefix
///
/// Leaves anything after the digits for the caller to deal with.
pub fn endf_int(i: &str) -> IResult<&str, i64> {
    let (rest, digits) = recognize(pair(opt(one_of("+-")), digit1))(i)?;
    match digits.parse() {
        Ok(value) => Ok((rest, value)),
        Err(_) => Err(Err::Error(Error::new(i, ErrorKind::Digit))),
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_endf_float() {
        assert_eq!(endf_float("1.234567+5"), Ok(("", 123456.7)));
        assert_eq!(endf_float("1.5-3"), Ok(("", 0.0015)));
        assert_eq!(endf_float("-2.5+12"), Ok(("", -2.5e12)));
        assert_eq!(endf_float("1.5e+3"), Ok(("", 1500.0)));
        assert_eq!(endf_float("1.5E-3"), Ok(("", 0.0015)));
        assert_eq!(endf_float("42"), Ok(("", 42.0)));
        assert_eq!(endf_float(".5"), Ok(("", 0.5)));
        assert_eq!(endf_float("-7."), Ok(("", -7.0)));
    }

    #[test]
    fn test_endf_float_leftover() {
        assert_eq!(endf_float("1.5 +3"), Ok((" +3", 1.5)));
        assert_eq!(endf_float("1.5e+3+2"), Ok(("+2", 1500.0)));
        assert_eq!(endf_float("1.5+"), Ok(("+", 1.5)));
        assert!(endf_float("abc").is_err());
        assert!(endf_float("+").is_err());
    }

    #[test]
    fn test_endf_int() {
        assert_eq!(endf_int("9228"), Ok(("", 9228)));
        assert_eq!(endf_int("-1"), Ok(("", -1)));
        assert_eq!(endf_int("+12 3"), Ok((" 3", 12)));
        assert_eq!(endf_int("99999999999"), Ok(("", 99999999999)));
        assert!(endf_int("x1").is_err());
        assert!(endf_int("-").is_err());
    }
}
