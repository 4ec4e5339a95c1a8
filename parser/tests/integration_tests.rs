//! Scanning behaviour against a grammar loaded from a fixture file.

use std::path::PathBuf;

use optline_core::{ArgumentSpec, CommandGrammar, OptionSpec};
use optline_parser::{CommandLineParser, ParseError, Whitespace};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn test5() -> CommandLineParser {
    let grammar = CommandGrammar::load(fixture("test5.yaml")).expect("fixture should load");
    CommandLineParser::new(grammar).expect("fixture should validate")
}

fn flags() -> CommandLineParser {
    CommandLineParser::new(
        CommandGrammar::new("g")
            .with_option(OptionSpec::flag("all").with_short('a'))
            .with_option(OptionSpec::flag("brief").with_short('b'))
            .with_option(OptionSpec::new("value").with_short('v')),
    )
    .unwrap()
}

#[test]
fn test_same_input_gives_same_result() {
    let parser = test5();
    let tokens = ["test", "--veryLong", "3", "-Dk=v", "--bar", "one", "--nope"];
    assert_eq!(parser.parse_tokens(&tokens, false), parser.parse_tokens(&tokens, false));
}

#[test]
fn test_flag_is_true() {
    let line = test5().parse_tokens(&["test", "--bar"], false);
    assert!(!line.has_error());
    assert_eq!(line.option("bar").unwrap().value(), Some("true"));
}

#[test]
fn test_grouped_short_flags() {
    let line = flags().parse_tokens(&["g", "-ab"], false);
    assert!(!line.has_error());
    assert_eq!(line.option("a").unwrap().value(), Some("true"));
    assert_eq!(line.option("brief").unwrap().value(), Some("true"));
    assert_eq!(line.option("all").unwrap().display_name(), "-a");
}

#[test]
fn test_grouped_flag_needing_value() {
    let line = flags().parse_tokens(&["g", "-av"], false);
    assert_eq!(line.error(), Some(&ParseError::UngroupableOption { option: 'v' }));
    assert_eq!(line.option("all").unwrap().value(), Some("true"));
    assert!(!line.has_option("value"));

    let line = flags().parse_tokens(&["g", "-ax"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::UnknownOption {
            option: "-x".to_string()
        })
    );
}

#[test]
fn test_list_with_custom_separator() {
    let line = test5().parse_tokens(&["test", "--longs", "5;10;20"], false);
    assert!(!line.has_error());
    assert_eq!(line.option("longs").unwrap().list(), ["5", "10", "20"]);
}

#[test]
fn test_list_collects_following_words() {
    let line = test5().parse_tokens(&["test", "--strings", "a", "b"], false);
    assert!(!line.has_error());
    assert_eq!(line.option("strings").unwrap().list(), ["a", "b"]);
    assert!(line.argument().is_none());
}

#[test]
fn test_properties() {
    let line = test5().parse_tokens(&["test", "-Dkey=value", "-Dkey2=value2"], false);
    assert!(!line.has_error());
    let properties = line.option("define").unwrap().properties().unwrap();
    assert_eq!(properties.len(), 2);
    assert_eq!(properties["key"], "value");
    assert_eq!(properties["key2"], "value2");
}

#[test]
fn test_malformed_properties() {
    let parser = test5();

    let line = parser.parse_tokens(&["test", "-D"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::NotAProperty {
            option: "-D".to_string()
        })
    );

    let line = parser.parse_tokens(&["test", "-D=value"], false);
    assert!(matches!(line.error(), Some(ParseError::NotAProperty { .. })));

    let line = parser.parse_tokens(&["test", "-Dkey="], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::EmptyPropertyValue {
            option: "-D".to_string()
        })
    );
    assert!(line.option("define").unwrap().properties().unwrap().is_empty());
}

#[test]
fn test_malformed_property_stays_active() {
    let parser = test5();

    let line = parser.parse_tokens(&["test", "-D"], false);
    assert!(line.has_option("define"));

    let line = parser.parse_tokens(&["test", "--define", "--bar"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::NotAProperty {
            option: "--define".to_string()
        })
    );
    let names: Vec<&str> = line.options().iter().map(|o| o.name()).collect();
    assert_eq!(names, ["define", "bar"]);
}

#[test]
fn test_required_option() {
    let parser = CommandLineParser::new(
        CommandGrammar::new("req").with_option(OptionSpec::new("name").with_short('n').required()),
    )
    .unwrap();

    let line = parser.parse_tokens(&["req"], false);
    let error = line.error().unwrap();
    assert_eq!(
        error,
        &ParseError::RequiredOption {
            option: "--name".to_string()
        }
    );
    assert_eq!(error.to_string(), "option: --name is required for this command");

    assert!(!parser.parse_tokens(&["req"], true).has_error());
    assert!(!parser.parse_tokens(&["req", "-n", "x"], false).has_error());
}

#[test]
fn test_required_option_replaces_earlier_error() {
    let parser = CommandLineParser::new(
        CommandGrammar::new("req").with_option(OptionSpec::new("name").required()),
    )
    .unwrap();

    let line = parser.parse_tokens(&["req", "--nope"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::RequiredOption {
            option: "--name".to_string()
        })
    );

    let line = parser.parse_tokens(&["req", "--nope"], true);
    assert_eq!(
        line.error(),
        Some(&ParseError::UnknownOption {
            option: "--nope".to_string()
        })
    );
}

#[test]
fn test_positional_arguments() {
    let line = test5().parse_tokens(&["test", "one", "two"], false);
    assert!(!line.has_error());
    let argument = line.argument().unwrap();
    assert_eq!(argument.name(), "arguments");
    assert_eq!(argument.values(), ["one", "two"]);

    let line = flags().parse_tokens(&["g", "one"], false);
    assert_eq!(line.error(), Some(&ParseError::ArgumentToCommand));
}

#[test]
fn test_option_after_argument() {
    let line = test5().parse_tokens(&["test", "one", "--bar"], false);
    assert_eq!(line.error(), Some(&ParseError::ArgumentToOption));
    assert!(line.has_option("bar"));
    assert_eq!(line.argument().unwrap().values(), ["one"]);
}

#[test]
fn test_option_value_after_argument() {
    let line = test5().parse_tokens(&["test", "one", "--veryLong", "3"], false);
    assert_eq!(line.error(), Some(&ParseError::ArgumentToOption));
    assert_eq!(line.option("veryLong").unwrap().value(), Some("3"));
    assert_eq!(line.argument().unwrap().values(), ["one"]);
}

#[test]
fn test_property_after_argument() {
    let line = test5().parse_tokens(&["test", "one", "-Dk=v"], false);
    assert_eq!(line.error(), Some(&ParseError::ArgumentToOption));
    assert_eq!(line.option("define").unwrap().properties().unwrap()["k"], "v");
}

#[test]
fn test_last_error_wins() {
    let line = test5().parse_tokens(&["test", "--nope", "-"], false);
    assert_eq!(line.error(), Some(&ParseError::DanglingDash));

    let line = test5().parse_tokens(&["test", "-", "--nope"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::UnknownOption {
            option: "--nope".to_string()
        })
    );
}

#[test]
fn test_missing_value_on_long_option_stops_scanning() {
    let line = test5().parse_tokens(&["test", "--currency", "--bar", "one"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::MissingValue {
            option: "--currency".to_string()
        })
    );
    assert!(!line.has_option("bar"));
    assert!(line.argument().is_none());
}

#[test]
fn test_missing_value_on_short_option_skips_token() {
    let line = test5().parse_tokens(&["test", "-c", "-Dk=v", "EUR"], false);
    assert_eq!(
        line.error(),
        Some(&ParseError::MissingValue {
            option: "-c".to_string()
        })
    );
    assert_eq!(line.option("currency").unwrap().value(), Some("EUR"));
    assert!(!line.has_option("D"));
    assert!(line.argument().is_none());
}

#[test]
fn test_repeated_scalar_keeps_last_value() {
    let line = test5().parse_tokens(&["test", "--currency", "EUR", "-c", "NOK"], false);
    assert!(!line.has_error());
    assert_eq!(line.options().len(), 1);
    assert_eq!(line.option("currency").unwrap().value(), Some("NOK"));
    assert!(line.argument().is_none());
}

#[test]
fn test_attached_values_and_display_name() {
    let line = test5().parse_tokens(&["test", "--currency=EUR"], false);
    let currency = line.option("c").unwrap();
    assert_eq!(currency.value(), Some("EUR"));
    assert!(currency.is_long_name_used());
    assert_eq!(currency.display_name(), "--currency");

    let line = test5().parse_tokens(&["test", "--currency=EUR", "-c=NOK"], false);
    assert_eq!(line.options().len(), 1);
    let currency = line.option("currency").unwrap();
    assert_eq!(currency.value(), Some("NOK"));
    assert_eq!(currency.display_name(), "-c");
}

#[test]
fn test_relaxed_keeps_option_waiting_for_value() {
    let parser = test5();

    let line = parser.parse_tokens(&["test", "--veryLong"], true);
    assert!(!line.has_error());
    assert_eq!(line.option("veryLong").unwrap().value(), None);

    let line = parser.parse_tokens(&["test", "--veryLong"], false);
    assert!(!line.has_error());
    assert!(!line.has_option("veryLong"));
}

#[test]
fn test_relaxed_commits_trailing_list() {
    let line = test5().parse_tokens(&["test", "--strings", "a"], true);
    assert!(!line.has_error());
    assert_eq!(line.option("strings").unwrap().list(), ["a"]);
}

#[test]
fn test_parse_line() {
    let parser = test5();
    let line = parser.parse_line("test  --longs 1;2 -c EUR  file", &Whitespace, false);
    assert!(!line.has_error());
    assert_eq!(line.option("longs").unwrap().list(), ["1", "2"]);
    assert_eq!(line.option("currency").unwrap().value(), Some("EUR"));
    assert_eq!(line.argument().unwrap().values(), ["file"]);

    let line = parser.parse_line("other --bar", &Whitespace, false);
    assert_eq!(
        line.error(),
        Some(&ParseError::CommandNotFound {
            command: "test".to_string(),
            input: "other --bar".to_string(),
        })
    );
}

#[test]
fn test_serialized_result() {
    let parser = CommandLineParser::new(
        CommandGrammar::new("test")
            .with_option(OptionSpec::group("define").with_short('D'))
            .with_option(OptionSpec::flag("bar"))
            .with_argument(ArgumentSpec::new("files")),
    )
    .unwrap();

    let line = parser.parse_tokens(&["test", "-Dk=v", "a"], false);
    let json = serde_json::to_value(&line).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "command": "test",
            "options": [{
                "name": "define",
                "short_name": "D",
                "kind": "group",
                "long_name_used": false,
                "values": {"k": "v"}
            }],
            "argument": {"name": "files", "values": ["a"]}
        })
    );
}
