//! Token-scanning command-line parser.
//!
//! A [`CommandLineParser`] wraps a validated [`CommandGrammar`] and turns a
//! word sequence (command name first) into a [`CommandLine`]: the matched
//! options with their raw values, the positional argument values, and at
//! most one [`ParseError`]. Parsing does not stop at the first problem;
//! the last error recorded wins.
//!
//! Parsed values are assigned onto a caller's struct with a
//! [`bind::Binder`], a table of typed fields with converters and
//! validators.
//!
//! # Main entry points
//!
//! - [`CommandLineParser::parse_tokens`]: parse pre-split words.
//! - [`CommandLineParser::parse_line`]: split a line with a
//!   [`WordSplitter`] first.
//! - [`CommandLineParser::populate`]: parse, then bind onto a target.
//!
//! # Example
//!
//! ```
//! use optline_core::*;
//! use optline_parser::CommandLineParser;
//!
//! let parser = CommandLineParser::new(
//!     CommandGrammar::new("test")
//!         .with_option(OptionSpec::list("longs").with_separator(';'))
//!         .with_option(OptionSpec::group("define").with_short('D'))
//!         .with_option(OptionSpec::flag("bar")),
//! )
//! .unwrap();
//!
//! let tokens = ["test", "--longs", "5;10;20", "-Dkey=value", "--bar"];
//! let line = parser.parse_tokens(&tokens, false);
//! assert!(!line.has_error());
//! assert_eq!(line.option("longs").unwrap().list(), ["5", "10", "20"]);
//! assert_eq!(line.option("D").unwrap().properties().unwrap()["key"], "value");
//! assert_eq!(line.option("bar").unwrap().value(), Some("true"));
//! ```

pub mod bind;
mod error;
mod resolve;
mod result;
mod scan;
mod split;
mod values;

use optline_core::{CommandGrammar, validate_grammar};
use tracing::debug;

pub use bind::{Binder, Field};
pub use error::{BindError, Error, ParseError, Result};
pub use result::{CommandLine, ParsedArgument, ParsedOption};
pub use split::{SplitError, Whitespace, WordSplitter};
pub use values::OptionValues;

use scan::Scanner;

/// Parser for one command grammar.
///
/// Each parse builds its own scratch state, so a parser can be shared and
/// used concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLineParser {
    grammar: CommandGrammar,
}

impl CommandLineParser {
    /// Creates a parser for `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrammar`] with every problem found by
    /// [`validate_grammar`].
    pub fn new(grammar: CommandGrammar) -> Result<Self> {
        let errors = validate_grammar(&grammar);
        if !errors.is_empty() {
            return Err(Error::InvalidGrammar(errors));
        }
        Ok(Self { grammar })
    }

    /// Creates a parser for a command without options or argument.
    pub fn with_name(name: &str, usage: Option<&str>) -> Result<Self> {
        let mut grammar = CommandGrammar::new(name);
        if let Some(usage) = usage {
            grammar = grammar.with_usage(usage);
        }
        Self::new(grammar)
    }

    /// The grammar this parser was built for.
    pub fn grammar(&self) -> &CommandGrammar {
        &self.grammar
    }

    /// Parses `tokens`, the command name first.
    ///
    /// With `relaxed` set, required options are not enforced and an option
    /// left waiting for its value at the end of input is still reported.
    pub fn parse_tokens<S: AsRef<str>>(&self, tokens: &[S], relaxed: bool) -> CommandLine {
        let command = self.grammar.name.as_str();
        match tokens.first() {
            Some(first) if first.as_ref() == command => {
                Scanner::new(&self.grammar).scan(tokens, relaxed)
            }
            _ => {
                let input = tokens
                    .iter()
                    .map(|token| token.as_ref())
                    .collect::<Vec<_>>()
                    .join(" ");
                debug!(command, input = %input, "Command name not found");
                CommandLine::from_error(
                    command,
                    ParseError::CommandNotFound {
                        command: command.to_string(),
                        input,
                    },
                )
            }
        }
    }

    /// Splits `line` with `splitter`, then parses the words.
    pub fn parse_line<W>(&self, line: &str, splitter: &W, relaxed: bool) -> CommandLine
    where
        W: WordSplitter + ?Sized,
    {
        match splitter.split(line) {
            Ok(words) => self.parse_tokens(words.as_slice(), relaxed),
            Err(e) => {
                debug!(error = %e, "Word splitter rejected input");
                CommandLine::from_error(
                    &self.grammar.name,
                    ParseError::MalformedInput(e.to_string()),
                )
            }
        }
    }

    /// Parses `tokens` (not relaxed) and binds the result onto `target`.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] if the parse recorded an error, in which case
    /// `target` is untouched; otherwise [`Error::Bind`] on the first
    /// binding failure.
    pub fn populate<T, S>(
        &self,
        binder: &Binder<T>,
        target: &mut T,
        tokens: &[S],
        validate: bool,
    ) -> Result<()>
    where
        T: 'static,
        S: AsRef<str>,
    {
        let line = self.parse_tokens(tokens, false).into_result()?;
        binder.bind(&self.grammar, &line, target, validate)?;
        Ok(())
    }

    /// Like [`populate`](Self::populate), splitting `line` first.
    pub fn populate_line<T, W>(
        &self,
        binder: &Binder<T>,
        target: &mut T,
        line: &str,
        splitter: &W,
        validate: bool,
    ) -> Result<()>
    where
        T: 'static,
        W: WordSplitter + ?Sized,
    {
        let line = self.parse_line(line, splitter, false).into_result()?;
        binder.bind(&self.grammar, &line, target, validate)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use optline_core::{ArgumentSpec, OptionSpec, ValidationError};

    use super::*;

    fn parser() -> CommandLineParser {
        CommandLineParser::new(
            CommandGrammar::new("test")
                .with_option(OptionSpec::new("value").with_short('v'))
                .with_argument(ArgumentSpec::new("files")),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_grammar_is_rejected() {
        let grammar = CommandGrammar::new("test")
            .with_option(OptionSpec::new("a"))
            .with_option(OptionSpec::new("a"));
        match CommandLineParser::new(grammar) {
            Err(Error::InvalidGrammar(errors)) => {
                assert_eq!(errors, vec![ValidationError::DuplicateOption("a".to_string())]);
            }
            other => panic!("expected invalid grammar, got {other:?}"),
        }
    }

    #[test]
    fn test_with_name() {
        let parser = CommandLineParser::with_name("ls", Some("ls [FILE]...")).unwrap();
        assert_eq!(parser.grammar().name, "ls");
        assert_eq!(parser.grammar().usage.as_deref(), Some("ls [FILE]..."));
        assert!(!parser.parse_tokens(&["ls"], false).has_error());
        assert!(CommandLineParser::with_name("", None).is_err());
    }

    #[test]
    fn test_command_not_found() {
        let line = parser().parse_tokens(&["other", "-v", "1"], false);
        assert_eq!(
            line.error(),
            Some(&ParseError::CommandNotFound {
                command: "test".to_string(),
                input: "other -v 1".to_string(),
            })
        );
        assert!(line.options().is_empty());

        let empty: [&str; 0] = [];
        assert!(matches!(
            parser().parse_tokens(&empty, true).error(),
            Some(ParseError::CommandNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_line_with_splitter_failure() {
        let failing = |_: &str| -> std::result::Result<Vec<String>, String> {
            Err("unterminated quote".to_string())
        };
        let line = parser().parse_line("test \"a", &failing, false);
        assert_eq!(
            line.error(),
            Some(&ParseError::MalformedInput("unterminated quote".to_string()))
        );
        assert_eq!(line.command(), "test");
    }

    #[test]
    fn test_parse_line_with_dyn_splitter() {
        let splitter: &dyn WordSplitter = &Whitespace;
        let line = parser().parse_line("test -v 1 a b", splitter, false);
        assert!(!line.has_error());
        assert_eq!(line.option("value").unwrap().value(), Some("1"));
        assert_eq!(line.argument().unwrap().values(), ["a", "b"]);
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandLineParser>();
        assert_send_sync::<Binder<String>>();
    }
}
