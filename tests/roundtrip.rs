use phpser::{MapKey, SerializeOptions, Value, from_str, to_string, to_string_with_options};

#[test]
fn primitives_round_trip() {
    let values = [
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Int(1),
        Value::Int(-1),
        Value::Int(i64::MAX),
        Value::Int(i64::MIN),
        Value::Float(1.5),
        Value::Float(-0.5),
        Value::Float(0.0),
        Value::Float(1e21),
        Value::Float(1e-7),
        Value::Str(String::new()),
        Value::Str("hello".into()),
        Value::Str("héllo".into()),
        Value::Str("中文".into()),
        Value::Str("😀".into()),
    ];
    for value in values {
        let encoded = to_string(&value);
        assert_eq!(from_str(&encoded).unwrap(), value, "via {encoded}");
    }
}

#[test]
fn special_floats_round_trip() {
    let nan = from_str(&to_string(&Value::Float(f64::NAN))).unwrap();
    assert!(nan.as_float().unwrap().is_nan());

    let inf = from_str(&to_string(&Value::Float(f64::INFINITY))).unwrap();
    assert_eq!(inf, Value::Float(f64::INFINITY));

    let neg_inf = from_str(&to_string(&Value::Float(f64::NEG_INFINITY))).unwrap();
    assert_eq!(neg_inf, Value::Float(f64::NEG_INFINITY));
}

#[test]
fn lists_round_trip() {
    let list = Value::List(vec![
        Value::Int(1),
        Value::Str("two".into()),
        Value::Bool(false),
        Value::Null,
    ]);
    assert_eq!(from_str(&to_string(&list)).unwrap(), list);

    let nested = Value::List(vec![
        Value::List(vec![]),
        Value::List(vec![Value::List(vec![Value::Int(9)])]),
    ]);
    assert_eq!(from_str(&to_string(&nested)).unwrap(), nested);
}

#[test]
fn maps_round_trip_through_both_tags() {
    let map = Value::Map(vec![
        (MapKey::Str("name".into()), Value::Str("Alice".into())),
        (MapKey::Int(7), Value::Bool(true)),
        (MapKey::Str("nested".into()), Value::List(vec![Value::Int(1)])),
    ]);

    // object tag
    assert_eq!(from_str(&to_string(&map)).unwrap(), map);

    // associative-array tag
    let assoc = to_string_with_options(&map, &SerializeOptions::new().assoc());
    assert_eq!(from_str(&assoc).unwrap(), map);
}

#[test]
fn map_insertion_order_is_preserved() {
    let map = Value::Map(vec![
        (MapKey::Str("z".into()), Value::Int(1)),
        (MapKey::Str("a".into()), Value::Int(2)),
        (MapKey::Str("m".into()), Value::Int(3)),
    ]);
    let parsed = from_str(&to_string(&map)).unwrap();
    let keys: Vec<_> = parsed
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, _)| k.clone())
        .collect();
    assert_eq!(
        keys,
        vec![
            MapKey::Str("z".into()),
            MapKey::Str("a".into()),
            MapKey::Str("m".into()),
        ]
    );
}

#[test]
fn dense_int_keyed_map_comes_back_as_list() {
    // A map whose keys happen to form the exact dense sequence 0,1,2 is
    // indistinguishable on the wire from a list, so it surfaces as one.
    let map = Value::Map(vec![
        (MapKey::Int(0), Value::Str("x".into())),
        (MapKey::Int(1), Value::Str("y".into())),
    ]);
    let assoc = to_string_with_options(&map, &SerializeOptions::new().assoc());
    assert_eq!(
        from_str(&assoc).unwrap(),
        Value::List(vec![Value::Str("x".into()), Value::Str("y".into())])
    );
}

#[test]
fn deeply_nested_structure_round_trips() {
    let mut value = Value::Int(42);
    for _ in 0..64 {
        value = Value::List(vec![value]);
    }
    assert_eq!(from_str(&to_string(&value)).unwrap(), value);
}
