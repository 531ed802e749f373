use super::*;
use pretty_assertions::assert_eq;

const HAS_NAME: InterfaceId = InterfaceId::from_raw(0);
const HAS_PHONE: InterfaceId = InterfaceId::from_raw(1);
const PERSON: AtomId = AtomId::from_raw(10);

fn person_has_name(atom: AtomId, interface: InterfaceId) -> bool {
    atom == PERSON && interface == HAS_NAME
}

#[test]
fn test_interface_set_is_sorted_and_deduplicated() {
    let set = InterfaceSet::new([HAS_PHONE, HAS_NAME, HAS_PHONE]);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![HAS_NAME, HAS_PHONE]);
    assert_eq!(set.len(), 2);
    assert!(set.contains(HAS_PHONE));
}

#[test]
fn test_superset_relation() {
    let both = InterfaceSet::new([HAS_NAME, HAS_PHONE]);
    let name = InterfaceSet::single(HAS_NAME);
    assert!(both.is_superset_of(&name));
    assert!(!name.is_superset_of(&both));
    assert!(name.is_superset_of(&InterfaceSet::default()));
}

#[test]
fn test_atom_accepted_by_interface_set_through_callback() {
    let pattern = TypeTag::interfaces([HAS_NAME]);
    assert!(pattern.accepts_with(&TypeTag::atom(PERSON), person_has_name));
    assert!(!pattern.accepts_with(&TypeTag::atom(AtomId::INT), person_has_name));

    let both = TypeTag::interfaces([HAS_NAME, HAS_PHONE]);
    assert!(!both.accepts_with(&TypeTag::atom(PERSON), person_has_name));
}

#[test]
fn test_interface_sets_accept_supersets() {
    let pattern = TypeTag::interfaces([HAS_NAME]);
    let actual = TypeTag::interfaces([HAS_NAME, HAS_PHONE]);
    assert!(pattern.accepts_with(&actual, |_, _| false));
    assert!(!actual.accepts_with(&pattern, |_, _| false));
}

#[test]
fn test_top_accepts_everything_but_is_accepted_only_by_top() {
    for top in [TypeTag::Any, TypeTag::Dynamic] {
        assert!(top.accepts_with(&TypeTag::atom(PERSON), |_, _| false));
        assert!(top.accepts_with(&TypeTag::interfaces([HAS_NAME]), |_, _| false));
        assert!(!TypeTag::atom(PERSON).accepts_with(&top, |_, _| true));
    }
}

#[test]
fn test_atom_never_accepts_interface_set() {
    let pattern = TypeTag::atom(PERSON);
    assert!(!pattern.accepts_with(&TypeTag::interfaces([HAS_NAME]), |_, _| true));
}

#[test]
fn test_specificity_ordering() {
    let atom = TypeTag::atom(PERSON);
    let name = TypeTag::interfaces([HAS_NAME]);
    let both = TypeTag::interfaces([HAS_NAME, HAS_PHONE]);
    let phone = TypeTag::interfaces([HAS_PHONE]);

    assert_eq!(atom.compare_specificity(&name), Some(Ordering::Greater));
    assert_eq!(name.compare_specificity(&TypeTag::Any), Some(Ordering::Greater));
    assert_eq!(both.compare_specificity(&name), Some(Ordering::Greater));
    assert_eq!(name.compare_specificity(&phone), None);
    assert_eq!(TypeTag::Any.compare_specificity(&TypeTag::Dynamic), Some(Ordering::Equal));
    assert_eq!(atom.compare_specificity(&TypeTag::atom(AtomId::INT)), None);
}

#[test]
fn test_empty_interface_set_ranks_as_top() {
    assert_eq!(TypeTag::Interfaces(InterfaceSet::default()).specificity(), Specificity::Top);
    assert_eq!(TypeTag::interfaces([HAS_NAME]).specificity(), Specificity::Structural);
}
