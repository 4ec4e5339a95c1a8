//! Parse results.

use std::collections::BTreeMap;

use optline_core::{OptionKind, OptionSpec, name_matches};
use serde::{Serialize, Serializer};

use crate::error::ParseError;
use crate::values::OptionValues;

pub(crate) fn display_name(name: &str, short_name: Option<char>, long_name_used: bool) -> String {
    match short_name {
        Some(short) if !long_name_used => format!("-{short}"),
        _ => format!("--{name}"),
    }
}

/// An option matched during a parse, with the values collected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedOption {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_name: Option<char>,
    kind: OptionKind,
    long_name_used: bool,
    values: OptionValues,
}

impl ParsedOption {
    pub(crate) fn new(spec: &OptionSpec, values: OptionValues, long_name_used: bool) -> Self {
        Self {
            name: spec.name.clone(),
            short_name: spec.short_name,
            kind: spec.kind,
            long_name_used,
            values,
        }
    }

    /// Long name of the option.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short name of the option.
    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    /// Kind of the option.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Whether the option was last written with its long name.
    pub fn is_long_name_used(&self) -> bool {
        self.long_name_used
    }

    /// Name as written on the command line: `-c` or `--currency`.
    pub fn display_name(&self) -> String {
        display_name(&self.name, self.short_name, self.long_name_used)
    }

    /// All collected values.
    pub fn values(&self) -> &OptionValues {
        &self.values
    }

    /// First collected value.
    pub fn value(&self) -> Option<&str> {
        self.values.as_slice().first().map(String::as_str)
    }

    /// Collected values of a list (or the single value of a scalar).
    pub fn list(&self) -> &[String] {
        self.values.as_slice()
    }

    /// Collected properties of a group option.
    pub fn properties(&self) -> Option<&BTreeMap<String, String>> {
        self.values.properties()
    }

    fn matches(&self, name: &str) -> bool {
        name_matches(&self.name, self.short_name, name)
    }
}

/// Values collected for the positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedArgument {
    name: String,
    values: Vec<String>,
}

impl ParsedArgument {
    pub(crate) fn new(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }

    /// Name of the argument.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collected values, in input order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<ParseError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.collect_str(error),
        None => serializer.serialize_none(),
    }
}

/// Result of parsing one command line.
///
/// Holds the matched options in the order they were first completed, the
/// positional argument if any values were collected, and at most one
/// [`ParseError`]. Parsing is not aborted by most errors, so a result with
/// an error can still be partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    command: String,
    options: Vec<ParsedOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    argument: Option<ParsedArgument>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    error: Option<ParseError>,
}

impl CommandLine {
    pub(crate) fn new(
        command: &str,
        options: Vec<ParsedOption>,
        argument: Option<ParsedArgument>,
        error: Option<ParseError>,
    ) -> Self {
        Self {
            command: command.to_string(),
            options,
            argument,
            error,
        }
    }

    pub(crate) fn from_error(command: &str, error: ParseError) -> Self {
        Self::new(command, Vec::new(), None, Some(error))
    }

    /// Name of the parsed command.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Matched options.
    pub fn options(&self) -> &[ParsedOption] {
        &self.options
    }

    /// Finds a matched option by long name or one-character short name.
    pub fn option(&self, name: &str) -> Option<&ParsedOption> {
        self.options.iter().find(|o| o.matches(name))
    }

    /// Returns `true` if the option was matched.
    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// The positional argument, if any values were given.
    pub fn argument(&self) -> Option<&ParsedArgument> {
        self.argument.as_ref()
    }

    /// The last error recorded during the parse.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Returns `true` if the parse recorded an error.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Converts into `Err` if an error was recorded.
    pub fn into_result(self) -> Result<Self, ParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}
