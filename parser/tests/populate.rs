//! Binding parsed command lines onto a typed target.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use optline_core::CommandGrammar;
use optline_parser::bind::{Binder, Field, parse};
use optline_parser::{BindError, CommandLineParser, Error, ParseError, Whitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Currency {
    Eur,
    Nok,
    Usd,
}

fn currency(raw: &str) -> Result<Currency, String> {
    match raw {
        "EUR" => Ok(Currency::Eur),
        "NOK" => Ok(Currency::Nok),
        "USD" => Ok(Currency::Usd),
        other => Err(format!("unknown currency {other}")),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Test5 {
    very_long: Option<i64>,
    basic_set: BTreeSet<String>,
    define: BTreeMap<String, String>,
    currency: Option<Currency>,
    longs: Vec<i64>,
    strings: Vec<String>,
    bar: bool,
    arguments: Vec<String>,
}

fn parser() -> CommandLineParser {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("test5.yaml");
    CommandLineParser::new(CommandGrammar::load(path).unwrap()).unwrap()
}

fn binder() -> Binder<Test5> {
    Binder::new()
        .field(
            Field::optional("veryLong", |t: &mut Test5| &mut t.very_long, parse).validator(
                |v: &i64| {
                    if (0..=100).contains(v) {
                        Ok(())
                    } else {
                        Err(format!("{v} is not between 0 and 100"))
                    }
                },
            ),
        )
        .field(Field::list("basicSet", |t: &mut Test5| &mut t.basic_set, parse))
        .field(Field::map("define", |t: &mut Test5| &mut t.define, parse))
        .field(Field::optional("currency", |t: &mut Test5| &mut t.currency, currency))
        .field(
            Field::list("longs", |t: &mut Test5| &mut t.longs, parse).validator(|v: &i64| {
                if *v > 0 {
                    Ok(())
                } else {
                    Err("must be positive")
                }
            }),
        )
        .field(Field::list("strings", |t: &mut Test5| &mut t.strings, parse))
        .field(Field::scalar("bar", |t: &mut Test5| &mut t.bar, parse))
        .argument(Field::list("arguments", |t: &mut Test5| &mut t.arguments, parse))
}

#[test]
fn test_populate_every_field() {
    let tokens = [
        "test",
        "--veryLong",
        "42",
        "--basicSet",
        "x,y,x",
        "-Dkey=value",
        "-c",
        "EUR",
        "--longs",
        "5;10;20",
        "--bar",
        "one",
        "two",
    ];
    let mut target = Test5::default();
    parser().populate(&binder(), &mut target, &tokens, true).unwrap();

    assert_eq!(
        target,
        Test5 {
            very_long: Some(42),
            basic_set: BTreeSet::from(["x".to_string(), "y".to_string()]),
            define: BTreeMap::from([("key".to_string(), "value".to_string())]),
            currency: Some(Currency::Eur),
            longs: vec![5, 10, 20],
            strings: Vec::new(),
            bar: true,
            arguments: vec!["one".to_string(), "two".to_string()],
        }
    );
}

#[test]
fn test_absent_options_use_defaults_or_reset() {
    let mut target = Test5 {
        very_long: Some(7),
        strings: vec!["old".to_string()],
        bar: true,
        arguments: vec!["old".to_string()],
        ..Default::default()
    };
    parser().populate(&binder(), &mut target, &["test"], true).unwrap();

    assert_eq!(target.very_long, None);
    assert!(target.strings.is_empty());
    assert!(!target.bar);
    assert!(target.arguments.is_empty());
    assert_eq!(target.currency, Some(Currency::Usd));
    assert_eq!(target.define["mode"], "fast");
}

#[test]
fn test_validation_failure() {
    let mut target = Test5::default();
    let err = parser()
        .populate(&binder(), &mut target, &["test", "--veryLong", "101"], true)
        .unwrap_err();
    match err {
        Error::Bind(BindError::Validation { option, message }) => {
            assert_eq!(option, "veryLong");
            assert_eq!(message, "101 is not between 0 and 100");
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let err = parser()
        .populate(&binder(), &mut target, &["test", "--longs", "5;-1"], true)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Bind(BindError::Validation { ref option, .. }) if option == "longs"
    ));
}

#[test]
fn test_validation_can_be_skipped() {
    let mut target = Test5::default();
    parser()
        .populate(&binder(), &mut target, &["test", "--veryLong", "101"], false)
        .unwrap();
    assert_eq!(target.very_long, Some(101));
}

#[test]
fn test_custom_converter_failure() {
    let mut target = Test5::default();
    let err = parser()
        .populate(&binder(), &mut target, &["test", "-c", "XYZ"], true)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "option currency: cannot convert \"XYZ\": unknown currency XYZ"
    );
    assert!(matches!(
        err,
        Error::Bind(BindError::Conversion { ref value, .. }) if value == "XYZ"
    ));
}

#[test]
fn test_parse_error_leaves_target_untouched() {
    let mut target = Test5 {
        bar: true,
        ..Default::default()
    };
    let err = parser()
        .populate(&binder(), &mut target, &["test", "--nope"], true)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::UnknownOption { ref option }) if option == "--nope"
    ));
    assert!(target.bar);
}

#[test]
fn test_populate_line() {
    let mut target = Test5::default();
    parser()
        .populate_line(
            &binder(),
            &mut target,
            "test -c NOK --strings a b",
            &Whitespace,
            true,
        )
        .unwrap();
    assert_eq!(target.currency, Some(Currency::Nok));
    assert_eq!(target.strings, ["a", "b"]);
}

#[test]
fn test_field_for_undeclared_option() {
    let binder = binder().field(Field::scalar("missing", |t: &mut Test5| &mut t.bar, parse));
    let mut target = Test5::default();
    let err = parser()
        .populate(&binder, &mut target, &["test", "--bar"], true)
        .unwrap_err();
    assert!(matches!(err, Error::Bind(BindError::UnknownField(ref name)) if name == "missing"));
    assert!(!target.bar);
}
