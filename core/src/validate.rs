//! Grammar validation.
//!
//! Checks the structural invariants the parser relies on: unique long and
//! short names, well-formed names, and option settings that agree with the
//! option kind.
//!
//! # Examples
//!
//! ```
//! use optline_core::*;
//!
//! let grammar = CommandGrammar::new("test")
//!     .with_option(OptionSpec::flag("verbose").with_short('v'));
//! assert!(validate_grammar(&grammar).is_empty());
//!
//! // Invalid: the long name carries its dashes
//! let bad = CommandGrammar::new("test").with_option(OptionSpec::flag("--verbose"));
//! assert!(!validate_grammar(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandGrammar, OptionKind, OptionSpec};

/// Grammar validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option has an empty long name.
    #[error("option name cannot be empty")]
    EmptyOptionName,
    /// A long name starts with `-` or contains whitespace or `=`.
    #[error("invalid option name: {0}")]
    InvalidOptionName(String),
    /// A short name is `-`, `=` or whitespace.
    #[error("invalid short name for option {option}: {short:?}")]
    InvalidShortName {
        /// Long name of the offending option.
        option: String,
        /// The rejected short name.
        short: char,
    },
    /// Two options share a long name.
    #[error("duplicate option name: {0}")]
    DuplicateOption(String),
    /// Two options share a short name.
    #[error("duplicate short name: -{0}")]
    DuplicateShortName(char),
    /// A zero-value option that is not a boolean flag.
    #[error("option {0} takes no value but is not a boolean")]
    ZeroValueNonBoolean(String),
    /// A list option splitting on whitespace, which never reaches it.
    #[error("option {0} has a whitespace value separator")]
    InvalidSeparator(String),
}

/// Validates a command grammar.
///
/// Returns every problem found, in declaration order. An empty command name
/// short-circuits the rest of the checks.
///
/// # Examples
///
/// ```
/// use optline_core::*;
///
/// let grammar = CommandGrammar::new("test")
///     .with_option(OptionSpec::new("currency").with_short('c'))
///     .with_option(OptionSpec::flag("cache").with_short('c'));
///
/// let errors = validate_grammar(&grammar);
/// assert_eq!(errors, vec![ValidationError::DuplicateShortName('c')]);
/// ```
pub fn validate_grammar(grammar: &CommandGrammar) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if grammar.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_shorts: HashSet<char> = HashSet::new();

    for option in &grammar.options {
        errors.extend(validate_option(option));

        if !option.name.is_empty() && !seen_names.insert(option.name.as_str()) {
            errors.push(ValidationError::DuplicateOption(option.name.clone()));
        }
        if let Some(short) = option.short_name {
            if !seen_shorts.insert(short) {
                errors.push(ValidationError::DuplicateShortName(short));
            }
        }
    }

    errors
}

fn validate_option(option: &OptionSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if option.name.is_empty() {
        errors.push(ValidationError::EmptyOptionName);
    } else if option.name.starts_with('-')
        || option.name.contains('=')
        || option.name.chars().any(char::is_whitespace)
    {
        errors.push(ValidationError::InvalidOptionName(option.name.clone()));
    }

    if let Some(short) = option.short_name {
        if short == '-' || short == '=' || short.is_whitespace() {
            errors.push(ValidationError::InvalidShortName {
                option: option.name.clone(),
                short,
            });
        }
    }

    if !option.has_value && option.kind != OptionKind::Boolean {
        errors.push(ValidationError::ZeroValueNonBoolean(option.name.clone()));
    }

    if option.kind == OptionKind::List && option.value_separator.is_whitespace() {
        errors.push(ValidationError::InvalidSeparator(option.name.clone()));
    }

    errors
}
