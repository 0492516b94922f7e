use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use firefly_term::*;
use proptest::prelude::*;

fn node() -> Atom {
    Atom::try_from_str("node@host").unwrap()
}

fn leaf() -> impl Strategy<Value = Term> {
    prop_oneof![
        any::<i64>().prop_map(Term::from),
        any::<u128>().prop_map(|i| coerce(i).unwrap()),
        (-1.0e20f64..1.0e20f64).prop_map(|f| coerce(f).unwrap()),
        (-5i64..5).prop_map(|i| coerce(i as f64).unwrap()),
        "[a-c]{0,3}".prop_map(|s| Term::atom(&s).unwrap()),
        "[a-z ]{0,6}".prop_map(|s| Term::binary(&s)),
        (proptest::collection::vec(any::<u8>(), 1..4), 1u8..=8)
            .prop_map(|(bytes, bits)| Term::from(Bitstring::new(bytes, bits).unwrap())),
        (0u32..3, 0u32..3, 0u32..2).prop_map(|(id, serial, creation)| {
            Term::from(Pid::new(node(), id, serial, creation))
        }),
        (0u64..3, 0u32..2).prop_map(|(id, creation)| Term::from(Port::new(node(), id, creation))),
        proptest::collection::vec(0u32..3, 1..=5).prop_map(|ids| {
            Term::from(Reference::new_ids(node(), 0, &ids).unwrap())
        }),
        (0u8..3).prop_map(|arity| {
            let m = Atom::try_from_str("m").unwrap();
            Term::from(Export::new(m, Atom::try_from_str("f").unwrap(), arity))
        }),
        (0u32..3).prop_map(|index| {
            let m = Atom::try_from_str("m").unwrap();
            let pid = Pid::new(node(), 0, 0, 0);
            Term::from(Function::new(m, 0, index, [0; 16], pid))
        }),
        Just(Term::Nil),
    ]
}

fn term() -> impl Strategy<Value = Term> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(|v| Term::from(Tuple::from_vec(v))),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(|v| Term::from(List::from_vec(v))),
            (proptest::collection::vec(inner.clone(), 1..3), inner.clone())
                .prop_map(|(v, tail)| Term::from(List::improper(v, tail).unwrap())),
            proptest::collection::vec((inner.clone(), inner), 0..3)
                .prop_map(|pairs| Term::from(Map::from_terms(pairs))),
        ]
    })
}

fn hash_of(term: &Term) -> u64 {
    let mut hasher = DefaultHasher::new();
    term.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn ordering_is_reflexive(a in term()) {
        prop_assert_eq!(compare(&a, &a), 0);
        prop_assert_eq!(compare_exact(&a, &a), 0);
        prop_assert!(a.exact_eq(&a.clone()));
    }

    #[test]
    fn ordering_is_antisymmetric(a in term(), b in term()) {
        prop_assert_eq!(compare(&a, &b), -compare(&b, &a));
        prop_assert_eq!(compare_exact(&a, &b), -compare_exact(&b, &a));
    }

    #[test]
    fn kind_rank_decides_mixed_comparisons(a in term(), b in term()) {
        let (ka, kb) = (a.kind().rank(), b.kind().rank());
        if ka != kb {
            prop_assert_eq!(compare(&a, &b), if ka < kb { -1 } else { 1 });
        }
    }

    #[test]
    fn ordering_is_transitive(a in term(), b in term(), c in term()) {
        let mut sorted = vec![a, b, c];
        sorted.sort();
        prop_assert!(compare(&sorted[0], &sorted[1]) <= 0);
        prop_assert!(compare(&sorted[1], &sorted[2]) <= 0);
        prop_assert!(compare(&sorted[0], &sorted[2]) <= 0);
    }

    #[test]
    fn equal_terms_hash_equally(a in term(), b in term()) {
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn exact_equality_refines_equality(a in term(), b in term()) {
        if a.exact_eq(&b) {
            prop_assert_eq!(compare(&a, &b), 0);
        }
    }

    #[test]
    fn conversion_is_idempotent(a in term()) {
        let again = coerce(a.clone()).unwrap();
        prop_assert!(again.exact_eq(&a));
        prop_assert_eq!(again.to_string(), a.to_string());
    }
}

#[test]
fn fun_subkinds_order_consistently() {
    let m = Atom::try_from_str("m").unwrap();
    let pid = Pid::new(node(), 0, 0, 0);
    let export = Term::from(Export::new(m, m, 255));
    for index in 0..4 {
        let fun = Term::from(Function::new(m, 255, index, [255; 16], pid.clone()));
        assert_eq!(compare(&fun, &export), -1);
        assert_eq!(compare(&export, &fun), 1);
        assert_ne!(fun, export);
    }
}

#[test]
fn large_integral_floats_compare_by_their_exact_value() {
    let float = coerce(2f64.powi(60)).unwrap();
    let int = Term::from(1i64 << 60);
    assert_eq!(compare(&int, &float), 0);
    assert_eq!(compare(&float, &int), 0);
    assert_eq!(hash_of(&int), hash_of(&float));
    assert_eq!(compare_exact(&int, &float), -1);

    // 2^60 prints as 1152921504606847e3 but is not that integer
    let nearby = Term::from(1_152_921_504_606_847_000i64);
    assert_eq!(compare(&nearby, &float), 1);
    assert_ne!(nearby, float);

    let huge = coerce(1e30f64).unwrap();
    let exact = coerce(Float::new(1e30).unwrap().to_integer().unwrap()).unwrap();
    assert_eq!(compare(&huge, &exact), 0);
    assert_eq!(hash_of(&huge), hash_of(&exact));
}
