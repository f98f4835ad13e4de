use crate::f;

/// Extends primitives with ENDF-specific formatting options
pub trait ValueExt {
    /// Compact ENDF scientific number formatting
    ///
    /// Fortran-style fixed-column formats save space by dropping the exponent
    /// letter and any padding of the exponent, so the sign of the exponent
    /// directly follows the mantissa.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive. The
    /// exponent letter is kept as `E` if `keep_e` is set.
    ///
    /// ```rust
    /// # use endftools_utils::ValueExt;
    /// assert_eq!((1234.56).endf_sci(3, false), "1.235+3".to_string());
    /// assert_eq!((1234.56).endf_sci(3, true), "1.235E+3".to_string());
    /// assert_eq!((-0.00125).endf_sci(2, false), "-1.25-3".to_string());
    /// assert_eq!((2.5e-100).endf_sci(1, false), "2.5-100".to_string());
    /// ```
    fn endf_sci(&self, precision: usize, keep_e: bool) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn endf_sci(&self, precision: usize, keep_e: bool) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // Non-finite values have no exponent to rework
        let Some(split) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(split);
        // Make sure the exponent is signed, but never padded
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        if keep_e {
            num.push('E');
        }
        num.push(sign);
        num.push_str(exp);
        num
    }
}
