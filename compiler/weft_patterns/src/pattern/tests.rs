use super::*;
use crate::{AtomKind, AtomValue, IdentityCounter};
use pretty_assertions::assert_eq;

const V2: AtomId = AtomId::from_raw(20);
const V3: AtomId = AtomId::from_raw(21);

const X: Name = Name::from_raw(100);
const Y: Name = Name::from_raw(101);
const Z: Name = Name::from_raw(102);
const A: Name = Name::from_raw(103);

/// `V2 x y`, `V3 x y z`.
struct Layout;

impl FieldLayout for Layout {
    fn field_index(&self, atom: AtomId, field: Name) -> Option<usize> {
        let fields: &[Name] = match atom {
            V2 => &[X, Y],
            V3 => &[X, Y, Z],
            _ => &[],
        };
        fields.iter().position(|f| *f == field)
    }
}

fn vector(atom: AtomId, coords: &[i64]) -> Value {
    let counter = IdentityCounter::new();
    Value::Atom(AtomValue::new(
        atom,
        Name::from_raw(atom.raw()),
        AtomKind::Named,
        counter.next(),
        coords.iter().copied().map(Value::Int).collect(),
    ))
}

#[test]
fn test_constructor_pattern_refines_without_binding() {
    let v = vector(V3, &[1, 2, 3]);
    let outcome = Pattern::Constructor(V3)
        .matches(&v, &Layout)
        .unwrap_or_else(|| panic!("V3 should match"));
    assert_eq!(outcome.refined, Some(V3));
    assert!(outcome.bindings.is_empty());
    assert!(Pattern::Constructor(V2).matches(&v, &Layout).is_none());
}

#[test]
fn test_positional_pattern_binds_in_declaration_order() {
    let v = vector(V3, &[1, 2, 3]);
    let pattern = Pattern::Positional {
        atom: V3,
        binders: vec![Some(X), None, Some(Z)],
    };
    let outcome = pattern
        .matches(&v, &Layout)
        .unwrap_or_else(|| panic!("V3 x _ z should match"));
    assert_eq!(
        outcome.bindings.to_vec(),
        vec![(X, Value::Int(1)), (Z, Value::Int(3))]
    );
}

#[test]
fn test_positional_pattern_requires_full_arity() {
    let v = vector(V3, &[1, 2, 3]);
    let pattern = Pattern::Positional {
        atom: V3,
        binders: vec![Some(X), Some(Y)],
    };
    assert!(pattern.matches(&v, &Layout).is_none());
}

#[test]
fn test_named_pattern_with_tag_and_rename() {
    let v = vector(V3, &[1, 2, 3]);
    let pattern = Pattern::Named {
        atom: Some(V3),
        fields: vec![NamedField { field: Y, binder: A }],
    };
    let outcome = pattern
        .matches(&v, &Layout)
        .unwrap_or_else(|| panic!("V3 {{y = a}} should match"));
    assert_eq!(outcome.bindings.to_vec(), vec![(A, Value::Int(2))]);
}

#[test]
fn test_open_named_pattern_matches_any_atom_with_field() {
    let open_z = Pattern::Named {
        atom: None,
        fields: vec![NamedField::punned(Z)],
    };
    assert!(open_z.matches(&vector(V3, &[1, 2, 3]), &Layout).is_some());
    assert!(open_z.matches(&vector(V2, &[1, 2]), &Layout).is_none());

    let open_x = Pattern::Named {
        atom: None,
        fields: vec![NamedField::punned(X)],
    };
    assert!(open_x.matches(&vector(V2, &[1, 2]), &Layout).is_some());
    assert!(open_x.matches(&Value::Int(4), &Layout).is_none());
}

#[test]
fn test_strategies_agree_on_membership() {
    let values = [vector(V2, &[1, 2]), vector(V3, &[1, 2, 3]), Value::Int(1)];
    for value in &values {
        let by_constructor = Pattern::Constructor(V3).matches(value, &Layout).is_some();
        let by_position = Pattern::Positional {
            atom: V3,
            binders: vec![None, None, None],
        }
        .matches(value, &Layout)
        .is_some();
        let by_name = Pattern::Named {
            atom: Some(V3),
            fields: vec![],
        }
        .matches(value, &Layout)
        .is_some();
        assert_eq!(by_constructor, by_position);
        assert_eq!(by_constructor, by_name);
    }
}

#[test]
fn test_catch_all_and_primitive_positional() {
    assert!(Pattern::CatchAll.matches(&Value::Nothing, &Layout).is_some());
    let int_pattern = Pattern::Positional {
        atom: AtomId::INT,
        binders: vec![],
    };
    assert!(int_pattern.matches(&Value::Int(5), &Layout).is_some());
    assert_eq!(Pattern::CatchAll.constructor(), None);
    assert_eq!(int_pattern.constructor(), Some(AtomId::INT));
}
