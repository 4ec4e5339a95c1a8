//! Error types for parsing and binding.
//!
//! [`ParseError`] is what a scan records on a [`CommandLine`](crate::CommandLine);
//! [`BindError`] is returned when parsed values cannot be assigned onto a
//! target. [`Error`] wraps both for the combined parse-and-bind entry
//! points.

use optline_core::ValidationError;
use thiserror::Error;

/// Errors recorded while scanning a command line.
///
/// Only one error is kept per parse; see [`CommandLine::error`](crate::CommandLine::error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first token is not the command name, or there are no tokens.
    #[error("command: {command}, not found in: {input}")]
    CommandNotFound {
        /// Name the grammar expects.
        command: String,
        /// The rejected input.
        input: String,
    },

    /// The word splitter rejected the input line.
    #[error("{0}")]
    MalformedInput(String),

    /// An option awaiting its value was followed by another option.
    #[error("option: {option} must be given a value")]
    MissingValue {
        /// Display name of the option.
        option: String,
    },

    /// A value-requiring option appeared inside a group of short flags.
    #[error(
        "option: -{option} can not be grouped with other options since it needs to be given a value"
    )]
    UngroupableOption {
        /// Short name of the option.
        option: char,
    },

    /// The token names no declared option.
    #[error("option: {option} is not a valid option for this command")]
    UnknownOption {
        /// The unrecognised option as written.
        option: String,
    },

    /// A lone `-`.
    #[error("option: - must be followed by a valid operator")]
    DanglingDash,

    /// A property option without a `key=value` part.
    #[error("option {option} must be part of a property")]
    NotAProperty {
        /// Display name of the option.
        option: String,
    },

    /// A property option with an empty value (`-Dkey=`).
    #[error("option {option} must have a value")]
    EmptyPropertyValue {
        /// Display name of the option.
        option: String,
    },

    /// A positional token was given to a command that declares no argument.
    #[error("an argument was given to a command that does not support it")]
    ArgumentToCommand,

    /// An option was completed after a positional token had been collected.
    #[error("an argument was given to an option that does not support it")]
    ArgumentToOption,

    /// A required option is absent.
    #[error("option: {option} is required for this command")]
    RequiredOption {
        /// Display name of the option.
        option: String,
    },
}

/// Errors raised while binding parsed values onto a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A converter rejected a raw value.
    #[error("option {option}: cannot convert {value:?}: {message}")]
    Conversion {
        /// Name of the option or argument.
        option: String,
        /// The raw value.
        value: String,
        /// Converter message.
        message: String,
    },

    /// A validator rejected a converted value.
    #[error("option {option}: {message}")]
    Validation {
        /// Name of the option or argument.
        option: String,
        /// Validator message.
        message: String,
    },

    /// The parsed values do not fit the field (e.g. properties bound onto
    /// a scalar).
    #[error("option {option}: expected {expected}")]
    Mismatch {
        /// Name of the option or argument.
        option: String,
        /// What the field accepts.
        expected: &'static str,
    },

    /// A field is registered for a name the grammar does not declare.
    #[error("no option or argument named {0} in grammar")]
    UnknownField(String),
}

/// Combined error for the parse-and-bind entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// The grammar failed validation.
    #[error("invalid grammar: {}", join_errors(.0))]
    InvalidGrammar(Vec<ValidationError>),

    /// The command line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The parsed values could not be bound.
    #[error(transparent)]
    Bind(#[from] BindError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
