use firefly_number::{Float, Int, ScientificDigits};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn zero_renders_canonically() {
    let zero = Float::new(0.0).unwrap();
    assert_eq!(zero.to_string(), "0.00000000000000000000e+00");
    assert_eq!(format!("{:?}", zero), "0.00000000000000000000e+00");
}

#[test]
fn large_values_render_with_twenty_fraction_digits() {
    let text = Float::new(1e12).unwrap().to_erlang_string();
    assert_eq!(text, "1.00000000000000000000e+12");

    let (mantissa, exponent) = text.split_once('e').unwrap();
    let (_, fraction) = mantissa.split_once('.').unwrap();
    assert_eq!(fraction.len(), 20);
    assert_eq!(exponent, "+12");
}

#[test]
fn exponents_have_at_least_two_digits() {
    assert_eq!(Float::new(5.0).unwrap().to_string(), "5.00000000000000000000e+00");
    assert_eq!(Float::new(1e-5).unwrap().to_string(), "1.00000000000000000000e-05");
    assert_eq!(Float::new(1e100).unwrap().to_string(), "1.00000000000000000000e+100");
    assert_eq!(
        Float::new(f64::MIN_POSITIVE).unwrap().to_string(),
        "2.22507385850720140000e-308"
    );
}

#[test]
fn legacy_strings_parse_exactly() {
    let padded = format!("{:\0<31}", "3.14159265358979311600e+00");
    let old = Float::old_from_str(&padded).unwrap();
    assert!(old.is_old());
    assert_eq!(old.to_string(), "3.14159265358979311600e+00");
    assert_eq!(
        old.to_scientific_string(ScientificDigits::new(2).unwrap()),
        "3.14e+00"
    );
}

proptest! {
    #[test]
    fn canonical_text_round_trips(value in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let float = Float::new(value).unwrap();
        let text = float.to_erlang_string();
        let parsed: Float = text.parse().unwrap();
        prop_assert_eq!(parsed.inner(), float.inner());
        prop_assert_eq!(parsed, float);
    }

    #[test]
    fn float_int_ordering_is_antisymmetric(value in -1e20f64..1e20f64, int in any::<i64>()) {
        let float = Float::new(value).unwrap();
        let int = Int::new(int);
        let forward = float.partial_cmp(&int).unwrap();
        let backward = int.partial_cmp(&float).unwrap();
        prop_assert_eq!(forward, backward.reverse());
    }
}
