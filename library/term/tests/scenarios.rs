use firefly_term::*;
use pretty_assertions::assert_eq;

fn atom(name: &str) -> Term {
    Term::atom(name).unwrap()
}

#[test]
fn tuple_renders_in_both_forms() {
    let tuple = tuple!(Atom::try_from_str("a").unwrap(), 1, "one").unwrap();
    assert_eq!(tuple.arity(), 3);
    assert_eq!(format!("{:?}", tuple), r#"{:a, 1, "one"}"#);
    assert_eq!(tuple.to_string(), r#"{a,1,<<"one">>}"#);

    let rebuilt = Tuple::new(vec![atom("a"), Term::from(1), Term::binary("one")]).unwrap();
    assert_eq!(tuple, rebuilt);
}

#[test]
fn appending_a_non_list_makes_an_improper_list() {
    let list = list!(Atom::try_from_str("a").unwrap()).unwrap();
    assert!(list.is_proper());

    let improper = list.append(atom("b")).unwrap();
    assert!(improper.is_improper());
    assert_eq!(format!("{:?}", improper), "[:a | :b]");
    assert_eq!(improper.to_string(), "[a|b]");

    let proper = List::new(vec![atom("a"), atom("b")]).unwrap();
    assert!(!proper.is_improper());
    assert!(proper.len().is_ok());
    assert!(improper.len().is_err());
}

#[test]
fn map_keys_use_exact_equality() {
    let map = Map::from_flat(vec![
        atom("a"),
        Term::from(1),
        Term::binary("one"),
        coerce(1.0f64).unwrap(),
    ])
    .unwrap();
    assert_eq!(map.size(), 2);
    assert_eq!(map.get(&atom("a")), Some(Term::from(1)));
    assert_eq!(map.get(&Term::binary("one")), Some(coerce(1.0f64).unwrap()));

    // 1 and 1.0 are distinct keys
    let map = map.put(Term::from(1), atom("int")).put(coerce(1.0f64).unwrap(), atom("float"));
    assert_eq!(map.size(), 4);
    assert_eq!(map.get(&Term::from(1)), Some(atom("int")));

    assert!(matches!(
        Map::from_flat(vec![Term::from(1)]),
        Err(TermError::Map(MapError::OddLength(1)))
    ));
}

#[test]
fn pid_creation_is_the_final_tie_break() {
    let node = Atom::try_from_str("node@host").unwrap();
    let newer = Term::from(Pid::new(node, 5, 1, 1));
    let older = Term::from(Pid::new(node, 5, 1, 0));
    assert_eq!(compare(&newer, &older), 1);
}

#[test]
fn kinds_are_ranked() {
    let node = Atom::try_from_str("node@host").unwrap();
    let pid = Pid::new(node, 1, 0, 0);
    let ascending = vec![
        Term::from(1_000_000),
        atom("a"),
        Term::from(Reference::new(node, 0, 1)),
        Term::from(Function::new(Atom::try_from_str("m").unwrap(), 0, 0, [0; 16], pid.clone())),
        Term::from(Export::new(Atom::try_from_str("m").unwrap(), Atom::try_from_str("f").unwrap(), 0)),
        Term::from(Port::new(node, 1, 0)),
        Term::from(pid),
        Term::from(Tuple::empty()),
        Term::from(Map::new()),
        Term::Nil,
        Term::from(List::from_vec(vec![Term::from(1)])),
        Term::binary(""),
    ];
    for (i, a) in ascending.iter().enumerate() {
        for b in ascending.iter().skip(i + 1) {
            assert_eq!(compare(a, b), -1, "{} < {}", a, b);
            assert_eq!(compare(b, a), 1, "{} > {}", b, a);
        }
    }

    let mut shuffled = ascending.clone();
    shuffled.reverse();
    shuffled.sort();
    assert_eq!(shuffled, ascending);
}

#[test]
fn numbers_compare_arithmetically() {
    let one = Term::from(1);
    let one_float = coerce(1.0f64).unwrap();
    assert_eq!(one, one_float);
    assert!(!one.exact_eq(&one_float));
    assert_eq!(compare(&one, &one_float), 0);
    assert_eq!(compare_exact(&one, &one_float), -1);

    let big = coerce(u128::MAX).unwrap();
    assert_eq!(compare(&big, &coerce(1e300f64).unwrap()), -1);
    assert_eq!(compare(&big, &coerce(1e10f64).unwrap()), 1);
}

#[test]
fn float_canonical_text() {
    assert_eq!(coerce(0.0f64).unwrap().to_string(), "0.00000000000000000000e+00");
    assert_eq!(coerce(1e12f64).unwrap().to_string(), "1.00000000000000000000e+12");
}

#[test]
fn bitstring_masks_trailing_bits() {
    let bits = Bitstring::new(vec![255], 3).unwrap();
    assert_eq!(bits.as_bytes(), &[0b1110_0000]);
    assert_eq!(bits.bits_iter().collect::<Vec<_>>(), vec![1, 1, 1]);
    assert_eq!(Term::from(bits).to_string(), "<<7:3>>");
}

#[test]
fn builder_macros() {
    let map = map! { "a" => 1, "b" => vec![1, 2] }.unwrap();
    assert_eq!(map.size(), 2);
    assert_eq!(
        map.get(&Term::binary("b")),
        Some(Term::from(List::new(vec![1, 2]).unwrap()))
    );
    assert!(list!().unwrap().is_nil());
    assert!(tuple!().unwrap().is_empty());
}

#[test]
fn updates_share_structure_with_the_original() {
    let tuple = Tuple::new(0..1000).unwrap();
    let updated = tuple.put(500, atom("x")).unwrap();
    assert_eq!(tuple.get(500), Some(&Term::from(500)));
    assert_eq!(updated.get(500), Some(&atom("x")));
    assert_eq!(tuple.len(), updated.len());

    let map = Map::from_pairs((0..100).map(|i| (i, i * 2))).unwrap();
    let removed = map.delete(&Term::from(1000));
    assert!(removed.ptr_eq(&map));
    let removed = map.delete(&Term::from(10));
    assert_eq!(removed.size(), 99);
    assert_eq!(map.size(), 100);
}

#[test]
fn map_default_does_not_affect_equality() {
    let map = Map::from_pairs(vec![("a", 1)]).unwrap();
    let defaulted = map.with_default(|_| Term::from(0));
    assert_eq!(map, defaulted);
    assert_eq!(defaulted.get(&atom("missing")), Some(Term::from(0)));
    assert_eq!(map.get(&atom("missing")), None);
    assert!(defaulted.fetch(&atom("missing")).is_err());
}
