//! Grammar model for command-line option parsing.
//!
//! This crate defines the declarative description of what a command
//! accepts:
//!
//! - [`CommandGrammar`]: the command name, its options and an optional
//!   catch-all positional argument.
//! - [`OptionSpec`]: an option with a long name, an optional short name,
//!   an [`OptionKind`], and settings such as `required` or default values.
//! - [`ArgumentSpec`]: the positional argument receiving non-option tokens.
//!
//! Grammars are built in code or loaded from JSON/YAML files
//! ([`CommandGrammar::load`]). [`validate_grammar`] catches structural
//! errors such as duplicate names before a parser is built on top.
//!
//! # Example
//!
//! ```
//! use optline_core::*;
//!
//! let grammar = CommandGrammar::new("test")
//!     .with_option(OptionSpec::list("longs").with_separator(';'))
//!     .with_option(OptionSpec::group("define").with_short('D'))
//!     .with_option(OptionSpec::flag("bar"))
//!     .with_argument(ArgumentSpec::new("arguments"));
//!
//! assert_eq!(grammar.find_option("D").unwrap().name, "define");
//! assert!(validate_grammar(&grammar).is_empty());
//! ```

mod load;
mod types;
mod validate;

pub use load::{GrammarError, Result};
pub use types::*;
pub use validate::{ValidationError, validate_grammar};
