use super::*;
use crate::errors::ErrorCode;
use crate::registry::{FieldSpec, MethodOrigin, Param, Requirement, VariantSpec};
use crate::RegistryBuilder;
use pretty_assertions::assert_eq;
use weft_ir::{AtomId, BodyId, InterfaceId, SharedInterner};

fn body(n: u32) -> BodyId {
    BodyId::from_raw(n)
}

/// Load-phase helper: one interner, one builder, short names.
struct Load {
    interner: SharedInterner,
    builder: RegistryBuilder,
}

impl Load {
    fn new() -> Self {
        let interner = SharedInterner::new();
        let builder = RegistryBuilder::new(interner.clone());
        Load { interner, builder }
    }

    fn n(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    fn module(&mut self, name: &str) -> ModuleId {
        let name = self.n(name);
        self.builder.declare_module(name).unwrap()
    }

    fn method(&mut self, module: ModuleId, name: &str, receiver: TypeTag, id: u32) -> MethodId {
        let name = self.n(name);
        self.builder
            .declare_method(module, name, receiver, vec![], body(id))
            .unwrap()
    }

    fn freeze(self) -> Dispatcher {
        Dispatcher::new(self.builder.freeze().unwrap())
    }
}

/// `Person = Cons name:Text phone:Text`, `HasName { name }`,
/// `HasPhone { phone }`.
struct People {
    load: Load,
    main: ModuleId,
    cons: AtomId,
    has_name: InterfaceId,
    has_phone: InterfaceId,
}

fn people() -> People {
    let mut load = Load::new();
    let main = load.module("Main");
    let text = TypeTag::Atom(AtomId::TEXT);
    let variant = VariantSpec::new(
        load.n("Cons"),
        vec![
            FieldSpec::new(load.n("name"), text.clone()),
            FieldSpec::new(load.n("phone"), text),
        ],
    );
    let person = load.n("Person");
    let (_, atoms) = load
        .builder
        .declare_family(main, person, vec![variant])
        .unwrap();
    let (has_name_name, name) = (load.n("HasName"), load.n("name"));
    let has_name = load
        .builder
        .declare_interface(main, has_name_name, vec![], vec![Requirement::required(name, vec![])])
        .unwrap();
    let (has_phone_name, phone) = (load.n("HasPhone"), load.n("phone"));
    let has_phone = load
        .builder
        .declare_interface(main, has_phone_name, vec![], vec![Requirement::required(phone, vec![])])
        .unwrap();
    People {
        load,
        main,
        cons: atoms[0],
        has_name,
        has_phone,
    }
}

fn joe(dispatcher: &Dispatcher, cons: AtomId) -> Value {
    dispatcher
        .registry()
        .construct(cons, vec![Value::text("Joe"), Value::text("555")])
        .unwrap()
}

#[test]
fn test_greet_picks_any_for_int_and_interface_for_person() {
    let mut p = people();
    let greet = p.load.n("greet");
    p.load
        .method(p.main, "greet", TypeTag::interfaces([p.has_name]), 1);
    p.load.method(p.main, "greet", TypeTag::Any, 2);
    let d = p.load.freeze();

    let seven = Value::Int(7);
    let r = d.resolve(&CallSite::new(p.main, &seven, greet, &[])).unwrap();
    assert_eq!(r.body, body(2));
    assert!(r.is_direct());

    let joe = joe(&d, p.cons);
    let r = d.resolve(&CallSite::new(p.main, &joe, greet, &[])).unwrap();
    assert_eq!(r.body, body(1));
}

#[test]
fn test_exact_atom_beats_interface_in_either_declaration_order() {
    for atom_first in [true, false] {
        let mut p = people();
        let show = p.load.n("show");
        let exact = TypeTag::Atom(p.cons);
        let structural = TypeTag::interfaces([p.has_name]);
        if atom_first {
            p.load.method(p.main, "show", exact, 1);
            p.load.method(p.main, "show", structural, 2);
        } else {
            p.load.method(p.main, "show", structural, 2);
            p.load.method(p.main, "show", exact, 1);
        }
        let d = p.load.freeze();
        let joe = joe(&d, p.cons);
        let r = d.resolve(&CallSite::new(p.main, &joe, show, &[])).unwrap();
        assert_eq!(r.body, body(1), "atom_first = {atom_first}");
    }
}

#[test]
fn test_larger_interface_set_wins_and_unrelated_sets_tie() {
    let mut p = people();
    let describe = p.load.n("describe");
    p.load
        .method(p.main, "describe", TypeTag::interfaces([p.has_name]), 1);
    p.load
        .method(p.main, "describe", TypeTag::interfaces([p.has_phone]), 2);
    let mut both = people();
    both.load
        .method(both.main, "describe", TypeTag::interfaces([both.has_name]), 1);
    both.load.method(
        both.main,
        "describe",
        TypeTag::interfaces([both.has_name, both.has_phone]),
        3,
    );

    let d = p.load.freeze();
    let joe_value = joe(&d, p.cons);
    let err = d
        .resolve(&CallSite::new(p.main, &joe_value, describe, &[]))
        .unwrap_err();
    assert_eq!(
        err,
        DispatchError::AmbiguousMethod {
            method: "describe".to_owned(),
            candidates: vec![
                "Main.describe(self: HasName)".to_owned(),
                "Main.describe(self: HasPhone)".to_owned(),
            ],
        }
    );

    let describe = both.load.n("describe");
    let d = both.load.freeze();
    let joe_value = joe(&d, both.cons);
    let r = d
        .resolve(&CallSite::new(both.main, &joe_value, describe, &[]))
        .unwrap();
    assert_eq!(r.body, body(3));
}

/// `A` and `B` both define `inc (self: Int)`; `Main` imports both.
fn two_incs(main_defines_inc: bool, mode: DispatchMode) -> (Dispatcher, [ModuleId; 3], Name) {
    let mut load = Load::new();
    let main = load.module("Main");
    let a = load.module("A");
    let b = load.module("B");
    load.builder.import(main, a).unwrap();
    load.builder.import(main, b).unwrap();
    load.method(a, "inc", TypeTag::Atom(AtomId::INT), 1);
    load.method(b, "inc", TypeTag::Atom(AtomId::INT), 2);
    if main_defines_inc {
        load.method(main, "inc", TypeTag::Atom(AtomId::INT), 3);
    }
    let inc = load.n("inc");
    let registry = load.builder.freeze().unwrap();
    (Dispatcher::with_mode(registry, mode), [main, a, b], inc)
}

#[test]
fn test_explicit_module_overrides_implicit_scope() {
    let (d, [main, _, b], inc) = two_incs(false, DispatchMode::TwoKey);
    let five = Value::Int(5);

    let err = d.resolve(&CallSite::new(main, &five, inc, &[])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5001);

    let site = CallSite::new(main, &five, inc, &[]).in_module(b);
    assert_eq!(d.resolve(&site).unwrap().body, body(2));
    assert_eq!(d.resolve(&site).unwrap().module, b);
}

#[test]
fn test_calling_module_wins_ties() {
    let (d, [main, _, _], inc) = two_incs(true, DispatchMode::TwoKey);
    let five = Value::Int(5);
    let r = d.resolve(&CallSite::new(main, &five, inc, &[])).unwrap();
    assert_eq!(r.body, body(3));
    assert_eq!(r.module, main);
}

#[test]
fn test_static_module_mode() {
    let (d, [main, a, _], inc) = two_incs(false, DispatchMode::StaticModule);
    assert!(!d.mode().allows_explicit_module());
    let five = Value::Int(5);

    let r = d.resolve(&CallSite::new(main, &five, inc, &[])).unwrap();
    assert_eq!(r.module, a);

    let err = d
        .resolve(&CallSite::new(main, &five, inc, &[]).in_module(a))
        .unwrap_err();
    assert_eq!(
        err,
        DispatchError::ExplicitModuleDisabled {
            module: "A".to_owned()
        }
    );
}

#[test]
fn test_unknown_modules_are_reported() {
    let (d, [main, _, _], inc) = two_incs(false, DispatchMode::TwoKey);
    let five = Value::Int(5);
    let ghost = ModuleId::from_raw(99);

    let err = d
        .resolve(&CallSite::new(main, &five, inc, &[]).in_module(ghost))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5003);

    let err = d.resolve(&CallSite::new(ghost, &five, inc, &[])).unwrap_err();
    assert_eq!(
        err,
        DispatchError::UnknownModule {
            module: "module#99".to_owned()
        }
    );
}

#[test]
fn test_trailing_defaults_may_be_omitted() {
    let mut load = Load::new();
    let main = load.module("Main");
    let (pad, width, fill) = (load.n("pad"), load.n("width"), load.n("fill"));
    load.builder
        .declare_method(
            main,
            pad,
            TypeTag::Atom(AtomId::TEXT),
            vec![
                Param::new(width, TypeTag::Atom(AtomId::INT)),
                Param::defaulted(fill, TypeTag::Atom(AtomId::TEXT)),
            ],
            body(1),
        )
        .unwrap();
    let d = load.freeze();
    let text = Value::text("x");

    assert!(d
        .resolve(&CallSite::new(main, &text, pad, &[Value::Int(3)]))
        .is_ok());
    assert!(d
        .resolve(&CallSite::new(main, &text, pad, &[Value::Int(3), Value::text("-")]))
        .is_ok());

    let err = d.resolve(&CallSite::new(main, &text, pad, &[])).unwrap_err();
    assert_eq!(
        err,
        DispatchError::NoMatchingMethod {
            method: "pad".to_owned(),
            receiver: "Text".to_owned(),
            args: vec![],
        }
    );
}

/// `Meters v:Int` and `Label text:Text` with `Int -> Meters`,
/// `Text -> Meters` and `Int -> Text`.
struct Units {
    load: Load,
    main: ModuleId,
    meters: AtomId,
}

const INT_TO_METERS: u32 = 10;
const TEXT_TO_METERS: u32 = 11;
const INT_TO_TEXT: u32 = 12;

fn units(int_to_meters: bool) -> Units {
    let mut load = Load::new();
    let main = load.module("Main");
    let (meters_tag, v) = (load.n("Meters"), load.n("v"));
    let meters = load
        .builder
        .declare_atom(main, meters_tag, vec![FieldSpec::new(v, TypeTag::Atom(AtomId::INT))])
        .unwrap();
    if int_to_meters {
        load.builder
            .declare_conversion(main, AtomId::INT, meters, vec![], body(INT_TO_METERS))
            .unwrap();
    }
    load.builder
        .declare_conversion(main, AtomId::TEXT, meters, vec![], body(TEXT_TO_METERS))
        .unwrap();
    load.builder
        .declare_conversion(main, AtomId::INT, AtomId::TEXT, vec![], body(INT_TO_TEXT))
        .unwrap();
    Units { load, main, meters }
}

/// Host stand-in for the three converters.
fn unit_host(
    dispatcher: &Dispatcher,
    meters: AtomId,
) -> impl Fn(BodyId, Value, &[Value]) -> Result<Value, String> {
    let registry = dispatcher.registry().clone();
    move |b: BodyId, value: Value, _: &[Value]| {
        let n = match (&value, b.raw()) {
            (Value::Int(n), INT_TO_METERS) => *n,
            (Value::Text(s), TEXT_TO_METERS) => i64::try_from(s.len()).map_err(|e| e.to_string())?,
            (Value::Int(n), INT_TO_TEXT) => return Ok(Value::text(n.to_string())),
            _ => return Err(format!("cannot run {b:?}")),
        };
        registry
            .construct(meters, vec![Value::Int(n)])
            .map_err(|e| e.to_string())
    }
}

#[test]
fn test_receiver_and_argument_conversions() {
    let mut u = units(true);
    let (add, other) = (u.load.n("add"), u.load.n("other"));
    let meters = TypeTag::Atom(u.meters);
    u.load
        .builder
        .declare_method(u.main, add, meters.clone(), vec![Param::new(other, meters)], body(1))
        .unwrap();
    let d = u.load.freeze();

    let receiver = Value::Int(2);
    let args = [Value::text("abc")];
    let site = CallSite::new(u.main, &receiver, add, &args);
    let r = d.resolve(&site).unwrap();
    assert_eq!(
        r.conversions.iter().map(|c| c.position).collect::<Vec<_>>(),
        vec![Position::Receiver, Position::Arg(0)]
    );

    let host = unit_host(&d, u.meters);
    let call = d.prepare(&site, &host).unwrap();
    assert_eq!(call.body, body(1));
    assert_eq!(call.receiver.atom_id(), u.meters);
    assert_eq!(
        call.args[0].as_atom().and_then(|a| a.field(0)),
        Some(&Value::Int(3))
    );
}

#[test]
fn test_apply_rejects_arguments_the_resolution_did_not_see() {
    let mut u = units(true);
    let (add, other) = (u.load.n("add"), u.load.n("other"));
    let meters = TypeTag::Atom(u.meters);
    u.load
        .builder
        .declare_method(u.main, add, meters.clone(), vec![Param::new(other, meters)], body(1))
        .unwrap();
    let d = u.load.freeze();

    let receiver = Value::Int(2);
    let args = [Value::text("abc")];
    let r = d.resolve(&CallSite::new(u.main, &receiver, add, &args)).unwrap();
    let host = unit_host(&d, u.meters);
    let err = r
        .apply(d.registry(), &host, receiver.clone(), vec![])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5006);
    assert!(matches!(
        err,
        DispatchError::ArgumentsMismatch { position: 0, args: 0, .. }
    ));
}

#[test]
fn test_direct_match_is_preferred_over_conversion() {
    let mut u = units(true);
    let show = u.load.n("show");
    u.load.method(u.main, "show", TypeTag::Atom(u.meters), 1);
    u.load.method(u.main, "show", TypeTag::Atom(AtomId::TEXT), 2);
    let d = u.load.freeze();
    let text = Value::text("t");
    let r = d.resolve(&CallSite::new(u.main, &text, show, &[])).unwrap();
    assert_eq!(r.body, body(2));
    assert!(r.is_direct());
}

#[test]
fn test_at_most_one_conversion_per_position() {
    // Int -> Text -> Meters exists as a chain, but chains are never followed.
    let mut u = units(false);
    let scale = u.load.n("scale");
    u.load.method(u.main, "scale", TypeTag::Atom(u.meters), 1);
    let d = u.load.freeze();
    let two = Value::Int(2);
    let err = d.resolve(&CallSite::new(u.main, &two, scale, &[])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5002);
}

#[test]
fn test_ambiguous_conversion_surfaces_when_nothing_else_matches() {
    let mut p = people();
    let main = p.main;
    let (label_tag, name, phone) = (p.load.n("Label"), p.load.n("name"), p.load.n("phone"));
    let text = TypeTag::Atom(AtomId::TEXT);
    let label = p
        .load
        .builder
        .declare_atom(
            main,
            label_tag,
            vec![FieldSpec::new(name, text.clone()), FieldSpec::new(phone, text)],
        )
        .unwrap();
    p.load
        .builder
        .declare_conversion(main, AtomId::INT, p.cons, vec![], body(20))
        .unwrap();
    p.load
        .builder
        .declare_conversion(main, AtomId::INT, label, vec![], body(21))
        .unwrap();
    let greet = p.load.n("greet");
    p.load
        .method(main, "greet", TypeTag::interfaces([p.has_name]), 1);
    let d = p.load.freeze();

    let seven = Value::Int(7);
    let err = d.resolve(&CallSite::new(main, &seven, greet, &[])).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Conversion(ConversionError::AmbiguousConversion {
            from: "Int".to_owned(),
            to: "HasName".to_owned(),
            candidates: vec!["Cons".to_owned(), "Label".to_owned()],
        })
    );
}

#[test]
fn test_interface_defaults_dispatch_like_methods() {
    let mut p = people();
    let (greets_name, hello) = (p.load.n("Greets"), p.load.n("hello"));
    let greets = p
        .load
        .builder
        .declare_interface(
            p.main,
            greets_name,
            vec![p.has_name],
            vec![Requirement::with_default(hello, vec![], body(7))],
        )
        .unwrap();
    p.load.builder.confirm(p.cons, greets).unwrap();
    let d = p.load.freeze();

    let (id, decl) = d.registry().methods_named(hello).next().unwrap();
    assert_eq!(decl.origin, MethodOrigin::InterfaceDefault(greets));
    assert!(d.registry().satisfies(p.cons, greets));

    let joe = joe(&d, p.cons);
    let r = d.resolve(&CallSite::new(p.main, &joe, hello, &[])).unwrap();
    assert_eq!((r.method, r.body), (id, body(7)));
}

#[test]
fn test_interface_default_on_builtin_receiver() {
    let mut load = Load::new();
    let main = load.module("Main");
    let (show_name, show) = (load.n("Show"), load.n("show"));
    let show_interface = load
        .builder
        .declare_interface(
            main,
            show_name,
            vec![],
            vec![Requirement::with_default(show, vec![], body(3))],
        )
        .unwrap();
    load.builder.confirm(AtomId::INT, show_interface).unwrap();
    let d = load.freeze();
    assert!(d.registry().satisfies(AtomId::INT, show_interface));

    let seven = Value::Int(7);
    let r = d.resolve(&CallSite::new(main, &seven, show, &[])).unwrap();
    assert_eq!(r.body, body(3));
    assert_eq!(r.module, main);
    let r = d
        .resolve(&CallSite::new(main, &seven, show, &[]).in_module(main))
        .unwrap();
    assert_eq!(r.body, body(3));
}
