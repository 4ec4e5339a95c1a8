//! Grammar type definitions.
//!
//! A [`CommandGrammar`] describes what a command accepts: its options and
//! an optional catch-all positional argument. The types derive [`serde`]
//! traits so a grammar can be written as a JSON or YAML file and loaded at
//! runtime, or built in code with the builder methods.

use serde::{Deserialize, Serialize};

/// Separator used by [`OptionKind::List`] options when none is declared.
pub const DEFAULT_VALUE_SEPARATOR: char = ',';

/// Kind of an option, which decides how its values are collected.
///
/// # Examples
///
/// ```
/// use optline_core::OptionKind;
///
/// assert_eq!(OptionKind::default(), OptionKind::Normal);
/// assert!(OptionKind::List.is_multi_valued());
/// assert!(!OptionKind::Boolean.is_multi_valued());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Takes a single value (the default).
    #[default]
    Normal,
    /// A flag; usually takes no value and is `true` when present.
    Boolean,
    /// Collects an ordered sequence of values.
    List,
    /// Collects `key=value` properties into a map (e.g. `-Dkey=value`).
    Group,
}

impl OptionKind {
    /// Returns `true` for kinds that keep accumulating values over several
    /// tokens ([`List`](Self::List) and [`Group`](Self::Group)).
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Self::List | Self::Group)
    }
}

fn default_has_value() -> bool {
    true
}

fn default_value_separator() -> char {
    DEFAULT_VALUE_SEPARATOR
}

fn is_default_value_separator(separator: &char) -> bool {
    *separator == DEFAULT_VALUE_SEPARATOR
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Returns `true` if `query` is the long name, or the short name given as
/// a one-character string.
///
/// # Examples
///
/// ```
/// use optline_core::name_matches;
///
/// assert!(name_matches("level", Some('l'), "level"));
/// assert!(name_matches("level", Some('l'), "l"));
/// assert!(!name_matches("level", None, "l"));
/// assert!(!name_matches("level", Some('l'), "le"));
/// ```
pub fn name_matches(long: &str, short: Option<char>, query: &str) -> bool {
    if long == query {
        return true;
    }
    let mut chars = query.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => short == Some(c),
        _ => false,
    }
}

/// Descriptor of a single option.
///
/// Names are stored without their dashes: an option named `"level"` with
/// short name `'l'` matches `--level` and `-l`.
///
/// # Examples
///
/// ```
/// use optline_core::{OptionKind, OptionSpec};
///
/// let verbose = OptionSpec::flag("verbose").with_short('v');
/// assert_eq!(verbose.kind, OptionKind::Boolean);
/// assert!(!verbose.has_value);
///
/// let define = OptionSpec::group("define").with_short('D');
/// assert!(define.is_property());
/// assert_eq!(define.display_name(), "--define");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Long name, without the leading `--`.
    pub name: String,
    /// Single-character short name, without the leading `-`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    /// How values are collected.
    #[serde(default)]
    pub kind: OptionKind,
    /// Whether the option expects a value. Only zero-value flags set this
    /// to `false`.
    #[serde(default = "default_has_value", skip_serializing_if = "is_true")]
    pub has_value: bool,
    /// Whether the option must be present.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Separator splitting one token into several values (list options).
    #[serde(
        default = "default_value_separator",
        skip_serializing_if = "is_default_value_separator"
    )]
    pub value_separator: char,
    /// Values used by the binder when the option is absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_values: Vec<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionSpec {
    fn with_kind(name: &str, kind: OptionKind, has_value: bool) -> Self {
        Self {
            name: name.to_string(),
            short_name: None,
            kind,
            has_value,
            required: false,
            value_separator: DEFAULT_VALUE_SEPARATOR,
            default_values: Vec::new(),
            description: None,
        }
    }

    /// Creates a normal option taking a single value.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::{OptionKind, OptionSpec};
    ///
    /// let level = OptionSpec::new("level");
    /// assert_eq!(level.kind, OptionKind::Normal);
    /// assert!(level.has_value);
    /// ```
    pub fn new(name: &str) -> Self {
        Self::with_kind(name, OptionKind::Normal, true)
    }

    /// Creates a zero-value boolean flag.
    pub fn flag(name: &str) -> Self {
        Self::with_kind(name, OptionKind::Boolean, false)
    }

    /// Creates a boolean option that is given its value explicitly
    /// (`--color false`).
    pub fn boolean(name: &str) -> Self {
        Self::with_kind(name, OptionKind::Boolean, true)
    }

    /// Creates a list option using the default separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::OptionSpec;
    ///
    /// let longs = OptionSpec::list("longs").with_separator(';');
    /// assert_eq!(longs.value_separator, ';');
    /// ```
    pub fn list(name: &str) -> Self {
        Self::with_kind(name, OptionKind::List, true)
    }

    /// Creates a property option collecting `key=value` pairs.
    pub fn group(name: &str) -> Self {
        Self::with_kind(name, OptionKind::Group, true)
    }

    /// Sets the short name.
    pub fn with_short(mut self, short: char) -> Self {
        self.short_name = Some(short);
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the list value separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.value_separator = separator;
        self
    }

    /// Appends a default value.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_values.push(value.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns `true` if this option parses `key=value` properties.
    pub fn is_property(&self) -> bool {
        self.kind == OptionKind::Group
    }

    /// Returns the name used in messages, `--name`.
    pub fn display_name(&self) -> String {
        format!("--{}", self.name)
    }

    /// Returns `true` if `name` is this option's long name, or its short
    /// name given as a one-character string.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::OptionSpec;
    ///
    /// let currency = OptionSpec::new("currency").with_short('c');
    /// assert!(currency.matches("currency"));
    /// assert!(currency.matches("c"));
    /// assert!(!currency.matches("cur"));
    /// ```
    pub fn matches(&self, name: &str) -> bool {
        name_matches(&self.name, self.short_name, name)
    }
}

/// Descriptor of the catch-all positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Name shown in messages and used to register a binding.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentSpec {
    /// Creates an argument descriptor.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Complete grammar of a command.
///
/// # Examples
///
/// ```
/// use optline_core::*;
///
/// let grammar = CommandGrammar::new("test")
///     .with_usage("a simple test")
///     .with_option(OptionSpec::flag("bar"))
///     .with_option(OptionSpec::group("define").with_short('D'))
///     .with_argument(ArgumentSpec::new("arguments"));
///
/// assert!(grammar.find_long("bar").is_some());
/// assert_eq!(grammar.find_short('D').unwrap().name, "define");
/// assert!(grammar.has_argument());
/// assert!(validate_grammar(&grammar).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandGrammar {
    /// Command name; the first token of every command line.
    pub name: String,
    /// Usage/description text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// Declared options, in declaration order.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Catch-all positional argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<ArgumentSpec>,
}

impl CommandGrammar {
    /// Creates an empty grammar for the named command.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the positional argument.
    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Returns `true` if a positional argument is declared.
    pub fn has_argument(&self) -> bool {
        self.argument.is_some()
    }

    /// Finds an option by long name.
    pub fn find_long(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Finds an option by short name.
    pub fn find_short(&self, short: char) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.short_name == Some(short))
    }

    /// Finds an option by long name or one-character short name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.matches(name))
    }

    /// Iterates over the required options in declaration order.
    pub fn required_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter().filter(|o| o.required)
    }
}
