//! End-to-end dispatch tests.
//!
//! These tests exercise the full path from registration through binding,
//! type checking, candidate selection, and diagnostic composition.

use pretty_assertions::assert_eq;

use sigdispatch::{
    Args, CallError, Candidate, CustomConstraint, Dispatcher, FnValue, Parameter, Registry,
    Signature, TypeConstraint, TypeTag, Value,
};

fn sig(params: Vec<Parameter>) -> Signature {
    Signature::new(params).unwrap()
}

/// A candidate that returns `[label, bound values...]` so tests can see both
/// which candidate ran and what it received.
fn labeled(label: &str, params: Vec<Parameter>) -> Candidate {
    let label = Value::from(label);
    Candidate::new(sig(params), move |bound| {
        let mut out = vec![label.clone()];
        out.extend(bound.into_iter().map(|(_, v)| v));
        Ok(Value::List(out))
    })
}

fn expect_dispatch_error(result: Result<Value, CallError>) -> sigdispatch::DispatchError {
    match result {
        Ok(value) => panic!("expected a dispatch error, got {value}"),
        Err(err) => err
            .as_dispatch()
            .cloned()
            .expect("expected a dispatch error, got a candidate error"),
    }
}

// ============================================================
// Binding across candidates
// ============================================================

#[test]
fn test_positional_or_keyword() {
    let f = Dispatcher::new("tests", "f", labeled("one", vec![Parameter::positional("a")]));
    f.overload(labeled(
        "two",
        vec![Parameter::positional("a"), Parameter::positional("b")],
    ));

    let one = Value::list([Value::from("one"), Value::Int(1)]);
    let two = Value::list([Value::from("two"), Value::Int(1), Value::Int(2)]);

    assert_eq!(f.call(&Args::positional([1])).unwrap(), one);
    assert_eq!(f.call(&Args::new().kwarg("a", 1)).unwrap(), one);

    assert_eq!(f.call(&Args::positional([1, 2])).unwrap(), two);
    assert_eq!(f.call(&Args::new().arg(1).kwarg("b", 2)).unwrap(), two);
    assert_eq!(
        f.call(&Args::new().kwarg("a", 1).kwarg("b", 2)).unwrap(),
        two
    );

    assert!(f.call(&Args::new()).is_err());
    assert!(f.call(&Args::positional([1, 2, 3])).is_err());
}

#[test]
fn test_var_positional() {
    let f = Dispatcher::new(
        "tests",
        "f",
        labeled("rest", vec![Parameter::var_positional("a")]),
    );
    f.overload(labeled(
        "rest_b",
        vec![Parameter::var_positional("a"), Parameter::keyword_only("b")],
    ));

    assert_eq!(
        f.call(&Args::new()).unwrap(),
        Value::list([Value::from("rest"), Value::List(vec![])])
    );
    assert_eq!(
        f.call(&Args::positional([1, 2])).unwrap(),
        Value::list([Value::from("rest"), Value::list([1, 2])])
    );

    // Only the second candidate can take the keyword.
    assert_eq!(
        f.call(&Args::new().kwarg("b", 1)).unwrap(),
        Value::list([Value::from("rest_b"), Value::List(vec![]), Value::Int(1)])
    );
    assert_eq!(
        f.call(&Args::new().arg(1).kwarg("b", 2)).unwrap(),
        Value::list([Value::from("rest_b"), Value::list([1]), Value::Int(2)])
    );

    assert!(f.call(&Args::new().kwarg("c", 1)).is_err());
}

#[test]
fn test_keyword_only() {
    let f = Dispatcher::new("tests", "f", labeled("one", vec![Parameter::keyword_only("a")]));
    f.overload(labeled(
        "two",
        vec![Parameter::keyword_only("a"), Parameter::keyword_only("b")],
    ));

    assert_eq!(
        f.call(&Args::new().kwarg("a", 1)).unwrap(),
        Value::list([Value::from("one"), Value::Int(1)])
    );
    assert_eq!(
        f.call(&Args::new().kwarg("a", 1).kwarg("b", 2)).unwrap(),
        Value::list([Value::from("two"), Value::Int(1), Value::Int(2)])
    );

    assert!(f.call(&Args::new()).is_err());
    assert!(f.call(&Args::positional([1])).is_err());
    assert!(f.call(&Args::new().kwarg("b", 1)).is_err());
}

#[test]
fn test_var_keyword() {
    let f = Dispatcher::new("tests", "f", labeled("kw", vec![Parameter::var_keyword("kwargs")]));
    f.overload(labeled(
        "a_kw",
        vec![Parameter::positional("a"), Parameter::var_keyword("kwargs")],
    ));

    assert_eq!(
        f.call(&Args::new()).unwrap(),
        Value::list([Value::from("kw"), Value::map::<&str, Value, _>([])])
    );
    assert_eq!(
        f.call(&Args::new().kwarg("a", 1)).unwrap(),
        Value::list([Value::from("kw"), Value::map([("a", 1)])])
    );
    assert_eq!(
        f.call(&Args::new().kwarg("a", 1).kwarg("b", 2)).unwrap(),
        Value::list([Value::from("kw"), Value::map([("a", 1), ("b", 2)])])
    );

    // A positional argument forces the second candidate.
    assert_eq!(
        f.call(&Args::positional([1])).unwrap(),
        Value::list([
            Value::from("a_kw"),
            Value::Int(1),
            Value::map::<&str, Value, _>([])
        ])
    );
    assert_eq!(
        f.call(&Args::new().arg(1).kwarg("c", 2)).unwrap(),
        Value::list([Value::from("a_kw"), Value::Int(1), Value::map([("c", 2)])])
    );

    assert!(f.call(&Args::positional([1, 2])).is_err());
    // `a` given both positionally and by keyword.
    assert!(f.call(&Args::new().arg(1).kwarg("a", 2)).is_err());
}

// ============================================================
// Type constraints across candidates
// ============================================================

#[test]
fn test_constraint_selection() {
    let f = Dispatcher::new(
        "tests",
        "f",
        labeled(
            "int",
            vec![Parameter::positional("a").with_constraint(TypeTag::Int)],
        ),
    );
    f.overload(labeled(
        "str",
        vec![Parameter::positional("a").with_constraint(TypeTag::Str)],
    ));
    f.overload(labeled(
        "list_of_int",
        vec![Parameter::positional("a")
            .with_constraint(TypeConstraint::list_of(TypeTag::Int.into()))],
    ));
    f.overload(labeled(
        "fn",
        vec![Parameter::positional("a").with_constraint(TypeTag::Fn)],
    ));

    let tag_of = |args: &Args| -> Value {
        match f.call(args).unwrap() {
            Value::List(items) => items[0].clone(),
            other => panic!("expected a list, got {other}"),
        }
    };

    assert_eq!(tag_of(&Args::positional([1])), Value::from("int"));
    assert_eq!(tag_of(&Args::positional(["a"])), Value::from("str"));
    assert_eq!(
        tag_of(&Args::positional([Value::List(vec![])])),
        Value::from("list_of_int")
    );
    assert_eq!(
        tag_of(&Args::positional([Value::list([1])])),
        Value::from("list_of_int")
    );
    assert_eq!(
        tag_of(&Args::positional([Value::Fn(FnValue::new(|_| Ok(Value::Unit)))])),
        Value::from("fn")
    );

    assert!(f.call(&Args::new()).is_err());
    assert!(f
        .call(&Args::positional([Value::map([("k", 1)])]))
        .is_err());
    assert!(f
        .call(&Args::positional([Value::list([Value::from("a")])]))
        .is_err());
}

#[test]
fn test_defaulted_constraint_not_checked() {
    // `(a: int = ...)` matches an empty call; the body supplies the default.
    let f = Dispatcher::new(
        "tests",
        "f",
        Candidate::new(
            sig(vec![Parameter::positional("a")
                .with_constraint(TypeTag::Int)
                .with_default()]),
            |mut bound| Ok(bound.take("a").unwrap_or(Value::Int(0))),
        ),
    );
    f.overload(labeled(
        "str",
        vec![Parameter::positional("a").with_constraint(TypeTag::Str)],
    ));

    assert_eq!(f.call(&Args::new()).unwrap(), Value::Int(0));
    assert_eq!(f.call(&Args::positional([1])).unwrap(), Value::Int(1));
    assert_eq!(
        f.call(&Args::positional(["a"])).unwrap(),
        Value::list([Value::from("str"), Value::from("a")])
    );
}

#[test]
fn test_variadic_element_constraints_select() {
    let f = Dispatcher::new(
        "tests",
        "f",
        labeled(
            "ints",
            vec![Parameter::var_positional("a").with_constraint(TypeTag::Int)],
        ),
    );
    f.overload(labeled(
        "strs",
        vec![Parameter::var_positional("a").with_constraint(TypeTag::Str)],
    ));

    let tag_of = |args: &Args| -> Value {
        match f.call(args).unwrap() {
            Value::List(items) => items[0].clone(),
            other => panic!("expected a list, got {other}"),
        }
    };

    // An empty call satisfies the first candidate trivially.
    assert_eq!(tag_of(&Args::new()), Value::from("ints"));
    assert_eq!(tag_of(&Args::positional([1, 2])), Value::from("ints"));
    assert_eq!(tag_of(&Args::positional(["a", "b"])), Value::from("strs"));

    // Mixed elements satisfy neither.
    assert!(f.call(&Args::new().arg(1).arg("a")).is_err());
}

#[test]
fn test_custom_constraint() {
    struct Even;

    impl CustomConstraint for Even {
        fn accepts(&self, value: &Value) -> bool {
            matches!(value, Value::Int(n) if n % 2 == 0)
        }

        fn expected(&self) -> String {
            "an even int".to_string()
        }
    }

    let f = Dispatcher::new(
        "tests",
        "f",
        labeled(
            "even",
            vec![Parameter::positional("n").with_constraint(TypeConstraint::custom(Even))],
        ),
    );
    f.overload(labeled(
        "any_int",
        vec![Parameter::positional("n").with_constraint(TypeTag::Int)],
    ));

    assert_eq!(
        f.call(&Args::positional([2])).unwrap(),
        Value::list([Value::from("even"), Value::Int(2)])
    );
    assert_eq!(
        f.call(&Args::positional([3])).unwrap(),
        Value::list([Value::from("any_int"), Value::Int(3)])
    );

    let err = expect_dispatch_error(f.call(&Args::positional(["x"])));
    assert_eq!(
        err.failures[0].lines(),
        vec!["(n: an even int): type of n must be an even int; got str instead"]
    );
}

// ============================================================
// Diagnostics
// ============================================================

#[test]
fn test_error_message_shape() {
    let f = Dispatcher::new("tests", "f", labeled("one", vec![Parameter::positional("a")]));
    f.overload(labeled(
        "two",
        vec![Parameter::positional("a"), Parameter::positional("b")],
    ));

    let err = expect_dispatch_error(f.call(&Args::new()));
    assert_eq!(
        err.to_string(),
        "can't dispatch the given arguments to any of the candidate functions:\n\
         arguments: \n\
         candidates:\n\
         (a): missing a required argument: 'a'\n\
         (a, b): missing a required argument: 'a'"
    );

    let err = expect_dispatch_error(f.call(&Args::positional([1, 2, 3])));
    insta::assert_snapshot!(err.to_string(), @r"
    can't dispatch the given arguments to any of the candidate functions:
    arguments: 1, 2, 3
    candidates:
    (a): too many positional arguments
    (a, b): too many positional arguments
    ");
}

#[test]
fn test_error_message_annotations() {
    let f = Dispatcher::new(
        "tests",
        "f",
        labeled(
            "int",
            vec![Parameter::positional("a").with_constraint(TypeTag::Int)],
        ),
    );
    f.overload(labeled(
        "list",
        vec![Parameter::positional("a")
            .with_constraint(TypeConstraint::list_of(TypeTag::Int.into()))],
    ));

    let err = expect_dispatch_error(f.call(&Args::positional(["a"])));
    insta::assert_snapshot!(err.to_string(), @r"
    can't dispatch the given arguments to any of the candidate functions:
    arguments: 'a'
    candidates:
    (a: int): type of a must be int; got str instead
    (a: list[int]): type of a must be a list; got str instead
    ");

    let err = expect_dispatch_error(f.call(&Args::positional([Value::list([Value::from("a")])])));
    insta::assert_snapshot!(err.to_string(), @r"
    can't dispatch the given arguments to any of the candidate functions:
    arguments: ['a']
    candidates:
    (a: int): type of a must be int; got list instead
    (a: list[int]): type of a[0] must be int; got str instead
    ");
}

#[test]
fn test_diagnostic_lists_keyword_arguments() {
    let f = Dispatcher::new("tests", "f", labeled("one", vec![Parameter::positional("a")]));

    let err = expect_dispatch_error(f.call(&Args::new().arg(1).kwarg("b", "x")));
    assert_eq!(err.arguments, "1, b='x'");
    assert_eq!(
        err.failures[0].lines(),
        vec!["(a): got an unexpected keyword argument 'b'"]
    );
}

#[test]
fn test_diagnostic_enumerates_every_candidate_once() {
    let f = Dispatcher::new(
        "tests",
        "f",
        labeled(
            "c0",
            vec![Parameter::positional("a").with_constraint(TypeTag::Int)],
        ),
    );
    for _ in 0..3 {
        f.overload(labeled(
            "cn",
            vec![Parameter::positional("a").with_constraint(TypeTag::Int)],
        ));
    }

    let err = expect_dispatch_error(f.call(&Args::positional(["x"])));
    assert_eq!(err.failures.len(), 4);
    for failure in &err.failures {
        assert_eq!(failure.signature, "(a: int)");
        assert!(!failure.lines().is_empty());
    }
}

// ============================================================
// Selection semantics
// ============================================================

#[test]
fn test_earliest_registration_wins() {
    let f = Dispatcher::new("tests", "f", labeled("first", vec![Parameter::positional("a")]));
    f.overload(labeled("second", vec![Parameter::positional("a")]));

    assert_eq!(
        f.call(&Args::positional([1])).unwrap(),
        Value::list([Value::from("first"), Value::Int(1)])
    );
}

#[test]
fn test_selection_ends_dispatch() {
    // Once a candidate is selected its error propagates; dispatch never
    // falls through to a later candidate.
    let f = Dispatcher::new(
        "tests",
        "f",
        Candidate::new(sig(vec![Parameter::positional("a")]), |_| {
            Err("my error".into())
        }),
    );
    f.overload(labeled("fallback", vec![Parameter::positional("a")]));

    let err = f.call(&Args::positional([1])).unwrap_err();
    assert!(matches!(err, CallError::Candidate(_)));
    assert_eq!(err.to_string(), "my error");
}

#[test]
fn test_candidate_returning_callable() {
    // A candidate body may hand back another callable; dispatch needs no
    // special-casing for it.
    let f = Dispatcher::new(
        "tests",
        "adder",
        Candidate::new(
            sig(vec![Parameter::positional("n").with_constraint(TypeTag::Int)]),
            |mut bound| {
                let Some(Value::Int(n)) = bound.take("n") else {
                    return Err("expected an int".into());
                };
                Ok(Value::Fn(FnValue::new(move |args| {
                    match args.first() {
                        Some(Value::Int(m)) => Ok(Value::Int(n + m)),
                        _ => Err("expected an int".into()),
                    }
                })))
            },
        ),
    );

    let Value::Fn(add3) = f.call(&Args::positional([3])).unwrap() else {
        panic!("expected a callable");
    };
    assert_eq!(add3.invoke(vec![Value::Int(4)]).unwrap(), Value::Int(7));
}

// ============================================================
// Facade and registry
// ============================================================

#[test]
fn test_doc_recording() {
    let f = Dispatcher::new(
        "tests",
        "f",
        labeled("one", vec![Parameter::positional("a")]).with_doc("a"),
    );
    f.overload(
        labeled(
            "two",
            vec![Parameter::positional("a"), Parameter::positional("b")],
        )
        .with_doc("a, b"),
    );

    assert_eq!(f.doc(), Some("a".to_string()));
}

#[test]
fn test_overload_returns_same_entry_point() {
    let f = Dispatcher::new("tests", "f", labeled("one", vec![Parameter::positional("a")]));
    let g = f.overload(labeled("two", vec![Parameter::keyword_only("b")]));

    assert!(f.same_table(&g));
    assert_eq!(g.len(), 2);
    assert_eq!(g.signatures(), vec!["(a)", "(*, b)"]);
}

#[test]
fn test_registry_scoping() {
    let mut registry = Registry::new();

    let module_f = registry.register(
        "module",
        "f",
        labeled("module", vec![Parameter::positional("a")]),
    );
    let class_f = registry.register(
        "module.Class",
        "f",
        labeled("class", vec![Parameter::positional("a")]),
    );

    assert!(!module_f.same_table(&class_f));
    assert_eq!(
        module_f.call(&Args::positional([1])).unwrap(),
        Value::list([Value::from("module"), Value::Int(1)])
    );
    assert_eq!(
        class_f.call(&Args::positional([1])).unwrap(),
        Value::list([Value::from("class"), Value::Int(1)])
    );

    // Re-registration under an existing key appends to the same table.
    let again = registry.register(
        "module",
        "f",
        labeled(
            "module2",
            vec![Parameter::positional("a"), Parameter::positional("b")],
        ),
    );
    assert!(again.same_table(&module_f));
    assert_eq!(again.len(), 2);
}

#[test]
fn test_dispatcher_as_method() {
    // A dispatcher stored in a struct treats the receiver parameter like
    // any other; nothing special-cases the first argument.
    struct Greeter {
        hello: Dispatcher,
    }

    impl Greeter {
        fn new() -> Self {
            let hello = Dispatcher::new(
                "Greeter",
                "hello",
                Candidate::new(
                    sig(vec![
                        Parameter::positional("this").with_constraint(TypeTag::Str),
                        Parameter::positional("name").with_constraint(TypeTag::Str),
                    ]),
                    |mut bound| {
                        let Some(Value::Str(this)) = bound.take("this") else {
                            return Err("expected a str receiver".into());
                        };
                        let Some(Value::Str(name)) = bound.take("name") else {
                            return Err("expected a str name".into());
                        };
                        Ok(Value::Str(format!("{this}: hello {name}")))
                    },
                ),
            );
            Self { hello }
        }

        fn hello(&self, receiver: &str, name: &str) -> Value {
            self.hello
                .call(&Args::positional([receiver, name]))
                .unwrap()
        }
    }

    let greeter = Greeter::new();
    assert_eq!(
        greeter.hello("g", "world"),
        Value::Str("g: hello world".to_string())
    );
}
