use super::*;
use pretty_assertions::assert_eq;
use weft_ir::StringInterner;

#[test]
fn test_primitives_are_builtin_atoms() {
    assert_eq!(Value::Int(7).atom_id(), AtomId::INT);
    assert_eq!(Value::Float(0.5).atom_id(), AtomId::FLOAT);
    assert_eq!(Value::Bool(true).atom_id(), AtomId::BOOL);
    assert_eq!(Value::text("hi").atom_id(), AtomId::TEXT);
    assert_eq!(Value::Nothing.type_tag(), TypeTag::Atom(AtomId::NOTHING));
}

#[test]
fn test_equality_is_per_variant() {
    assert_eq!(Value::Int(2), Value::from(2));
    assert_ne!(Value::Int(2), Value::Float(2.0));
    assert_eq!(Value::text("joe"), Value::from("joe"));
    assert_ne!(Value::Bool(true), Value::Nothing);
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Int(9).as_int(), Some(9));
    assert_eq!(Value::text("pink").as_text(), Some("pink"));
    assert!(Value::Nothing.as_atom().is_none());
}

#[test]
fn test_display_nested_atoms() {
    let interner = StringInterner::new();
    let counter = IdentityCounter::new();
    let engine = AtomValue::new(
        AtomId::from_raw(8),
        interner.intern("Combustion"),
        AtomKind::Named,
        counter.next(),
        vec![Value::Int(500), Value::Int(8)],
    );
    let car = Value::Atom(AtomValue::new(
        AtomId::from_raw(9),
        interner.intern("Car"),
        AtomKind::Named,
        counter.next(),
        vec![Value::text("pink"), Value::Int(300), Value::Atom(engine)],
    ));
    assert_eq!(
        car.display(&interner).to_string(),
        "Car 'pink' 300 (Combustion 500 8)"
    );

    let unit = Value::Atom(AtomValue::new(
        AtomId::from_raw(10),
        interner.intern("Bike"),
        AtomKind::Named,
        counter.next(),
        vec![],
    ));
    assert_eq!(unit.display(&interner).to_string(), "Bike");
    assert_eq!(Value::Nothing.display(&interner).to_string(), "Nothing");
    assert_eq!(Value::text("x").display(&interner).to_string(), "'x'");
}
