//! Integration tests for numeric field encoding and decoding

use endftools_records::{
    decode_float, decode_int, encode_float, encode_int, validate_field, EndfField, EndfFloat,
    Error, FieldTemplate, ParsingOptions, WritingOptions,
};
use rstest::{fixture, rstest};

#[fixture]
fn strict() -> ParsingOptions {
    ParsingOptions {
        accept_spaces: false,
        ignore_zero_mismatch: false,
        ignore_varspec_mismatch: false,
        ..Default::default()
    }
}

#[rstest]
#[case(3.141593, " 3.141593+0")] // case 1
#[case(0.0, " 0.000000+0")] // case 2
#[case(92235.0, " 9.223500+4")] // case 3
#[case(1.0e-10, " 1.00000-10")] // case 4
#[case(-2.5e12, "-2.50000+12")] // case 5
#[case(-1.0, "-1.000000+0")] // case 6
fn encode_default(#[case] value: f64, #[case] expected: &str) {
    let text = encode_float(value, &WritingOptions::default()).unwrap();
    assert_eq!(text, expected);
    assert_eq!(text.len(), 11);
}

#[rstest]
#[case(" 1.234567+5", 123456.7)] // case 1
#[case("-1.234567-5", -1.234567e-5)] // case 2
#[case(" 1.0E+00   ", 1.0)] // case 3
#[case("        2.5", 2.5)] // case 4
#[case("           ", 0.0)] // case 5
fn decode_default(#[case] text: &str, #[case] expected: f64) {
    assert_eq!(decode_float(text, &ParsingOptions::default()).unwrap(), expected);
}

#[rstest]
fn spaces_in_number(strict: ParsingOptions) {
    let text = " 1.5 +3    ";
    assert_eq!(decode_float(text, &ParsingOptions::default()).unwrap(), 1500.0);
    assert!(matches!(
        decode_float(text, &strict),
        Err(Error::MalformedNumber { .. })
    ));
}

#[rstest]
#[case(1.5)] // case 1
#[case(-0.001)] // case 2
#[case(6.02214076e23)] // case 3
#[case(1.0e-100)] // case 4
fn float_survives_encoding(#[case] value: f64) {
    let opts = WritingOptions::default();
    let text = encode_float(value, &opts).unwrap();
    let back = decode_float(&text, &ParsingOptions::default()).unwrap();
    assert!(((back - value) / value).abs() < 1e-5);
}

#[test]
fn prefer_fixed_point() {
    let opts = WritingOptions {
        prefer_noexp: true,
        ..Default::default()
    };
    assert_eq!(encode_float(0.5, &opts).unwrap(), "        0.5");
    assert_eq!(encode_float(0.0, &opts).unwrap(), "          0");
    assert_eq!(encode_float(-3.0, &opts).unwrap(), "         -3");
}

#[test]
fn non_finite_float() {
    assert!(matches!(
        encode_float(f64::NAN, &WritingOptions::default()),
        Err(Error::FieldWidth { .. })
    ));
}

#[rstest]
#[case(0, "          0")] // case 1
#[case(9228, "       9228")] // case 2
#[case(-1, "         -1")] // case 3
#[case(99999999999, "99999999999")] // case 4
#[case(-9999999999, "-9999999999")] // case 5
fn integers(#[case] value: i64, #[case] text: &str) {
    assert_eq!(encode_int(value).unwrap(), text);
    assert_eq!(decode_int(text).unwrap(), value);
}

#[rstest]
#[case(100000000000)] // case 1
#[case(-10000000000)] // case 2
fn integer_too_wide(#[case] value: i64) {
    assert!(matches!(
        encode_int(value),
        Err(Error::FieldWidth { width: 11, .. })
    ));
}

#[test]
fn preserved_text() {
    let read_opts = ParsingOptions {
        preserve_value_strings: true,
        ..Default::default()
    };
    let write_opts = WritingOptions {
        preserve_value_strings: true,
        ..Default::default()
    };

    let x = EndfFloat::decode(" 2.53-2    ", &read_opts).unwrap();
    assert_eq!(x.as_f64(), 0.0253);
    assert_eq!(x.encode(&write_opts).unwrap(), " 2.53-2    ");

    // not kept unless asked for
    let y = EndfFloat::decode(" 2.53-2    ", &ParsingOptions::default()).unwrap();
    assert!(y.original.is_none());
    assert_eq!(x, y);

    // text of the wrong width can not be written back
    let z = EndfFloat::with_original(1.0, "1.0");
    assert!(z.encode(&write_opts).is_err());
}

#[rstest]
fn validation(strict: ParsingOptions) {
    let zero = FieldTemplate {
        expression: "0",
        template: "[MAT, 3, MT/ 0.0, 0.0, 0, 0, NR, NP] TAB1",
        ..Default::default()
    };
    let variable = FieldTemplate {
        expression: "NR",
        contains_variable: true,
        contains_inconsistent_varspec: true,
        ..Default::default()
    };

    assert!(validate_field(0.0, 0.0, &zero, "", &strict).is_ok());
    assert!(validate_field(0.0, 1.0, &zero, "", &ParsingOptions::default()).is_ok());
    assert!(matches!(
        validate_field(0.0, 1.0, &zero, "", &strict),
        Err(Error::NumberMismatch { .. })
    ));

    assert!(validate_field(2.0, 3.0, &variable, "", &ParsingOptions::default()).is_ok());
    assert!(matches!(
        validate_field(2.0, 3.0, &variable, "", &strict),
        Err(Error::VarSpecMismatch { .. })
    ));
}
