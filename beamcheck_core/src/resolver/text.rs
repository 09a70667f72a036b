//! Dimension text such as `"300x600mm"`, `"0.3 × 0.6"` or `"30X60 cm"`.
//!
//! The first `<number> x <number> [unit]` occurrence in a string is used.
//! Numbers are `digits[.digits]`; the separator is `x`, `X` or `×` with
//! optional whitespace around it; the unit is one of `mm`, `millimeter(s)`,
//! `cm` or `m` in any case. Without a unit, values above 10 are taken as
//! millimeters and anything smaller as meters.

use winnow::{
    ascii::{digit1, Caseless},
    combinator::{alt, opt, preceded},
    token::{one_of, take_while},
    ModalResult, Parser,
};

use crate::units::LengthUnit;

/// Largest unitless value still read as meters
const UNITLESS_METER_LIMIT: f64 = 10.0;

/// First dimension pair in `text`, converted to millimeters, in written order
pub fn parse_dimensions(text: &str) -> Option<(f64, f64)> {
    text.char_indices()
        .find_map(|(start, _)| {
            let mut input = &text[start..];
            dimension_pair.parse_next(&mut input).ok()
        })
        .map(|(a, b, unit)| to_millimeters(a, b, unit))
}

fn to_millimeters(a: f64, b: f64, unit: Option<LengthUnit>) -> (f64, f64) {
    let factor = match unit {
        Some(unit) => unit.mm_per_unit(),
        None if a.max(b) > UNITLESS_METER_LIMIT => LengthUnit::Millimeter.mm_per_unit(),
        None => LengthUnit::Meter.mm_per_unit(),
    };
    (a * factor, b * factor)
}

fn dimension_pair(input: &mut &str) -> ModalResult<(f64, f64, Option<LengthUnit>)> {
    (
        number,
        preceded((ws, separator, ws), number),
        opt(preceded(ws, unit)),
    )
        .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (digit1, opt(('.', digit1)))
        .take()
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

fn separator(input: &mut &str) -> ModalResult<char> {
    one_of(['x', 'X', '×']).parse_next(input)
}

fn unit(input: &mut &str) -> ModalResult<LengthUnit> {
    alt((
        Caseless("millimeters").value(LengthUnit::Millimeter),
        Caseless("millimeter").value(LengthUnit::Millimeter),
        Caseless("mm").value(LengthUnit::Millimeter),
        Caseless("cm").value(LengthUnit::Centimeter),
        Caseless("m").value(LengthUnit::Meter),
    ))
    .parse_next(input)
}

fn ws<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_explicit_millimeters() {
        assert_eq!(parse_dimensions("300x600mm"), Some((300.0, 600.0)));
        assert_eq!(parse_dimensions("Beam 300 x 600 millimeters"), Some((300.0, 600.0)));
        assert_eq!(parse_dimensions("250X500 MM"), Some((250.0, 500.0)));
    }

    #[test]
    fn test_unitless_small_values_are_meters() {
        assert_eq!(parse_dimensions("0.3x0.6"), Some((300.0, 600.0)));
        assert_eq!(parse_dimensions("RB 0.25 × 0.5"), Some((250.0, 500.0)));
    }

    #[test]
    fn test_unitless_large_values_are_millimeters() {
        assert_eq!(parse_dimensions("40x60"), Some((40.0, 60.0)));
        assert_eq!(parse_dimensions("RB 200x500"), Some((200.0, 500.0)));
    }

    #[test]
    fn test_centimeters_and_meters() {
        assert_eq!(parse_dimensions("30X60 cm"), Some((300.0, 600.0)));
        assert_eq!(parse_dimensions("0.3x0.6m"), Some((300.0, 600.0)));
    }

    #[test]
    fn test_written_order_is_kept() {
        assert_eq!(parse_dimensions("600x300"), Some((600.0, 300.0)));
    }

    #[test]
    fn test_leftmost_match_wins() {
        assert_eq!(parse_dimensions("B12: 300x600, alt 400x800"), Some((300.0, 600.0)));
    }

    #[test]
    fn test_dangling_decimal_point_does_not_match() {
        assert_eq!(parse_dimensions("300.x600"), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(parse_dimensions(""), None);
        assert_eq!(parse_dimensions("Beam"), None);
        assert_eq!(parse_dimensions("IPE 400"), None);
        assert_eq!(parse_dimensions("x600"), None);
    }

    proptest! {
        #[test]
        fn prop_millimeter_labels_parse_back(a in 1u32..5000, b in 1u32..5000) {
            let label = format!("B {a}x{b}mm");
            prop_assert_eq!(parse_dimensions(&label), Some((f64::from(a), f64::from(b))));
        }
    }
}
