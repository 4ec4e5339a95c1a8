//! The token-scanning state machine.
//!
//! Tokens are classified by prefix (`--`, `-`, or none). An option that
//! needs a value becomes *active* until a following token supplies it; list
//! options stay active and keep accumulating until a token containing their
//! separator, or a new option, completes them.
//!
//! Errors are recorded rather than returned, and the scan keeps going so
//! the result can still be checked for required options. Each new error
//! replaces the previous one. A new `--` option while a single-valued
//! option is still waiting for its value stops the scan; a new `-` option
//! in the same situation is skipped and the option keeps waiting.

use std::ops::ControlFlow;

use optline_core::{CommandGrammar, OptionKind, OptionSpec};
use tracing::debug;

use crate::error::ParseError;
use crate::resolve::{Resolved, resolve_long, resolve_short};
use crate::result::{CommandLine, ParsedArgument, ParsedOption, display_name};
use crate::values::{OptionValues, split_values};

/// Per-parse mutable state. Built fresh for every scan so nothing leaks
/// from one parse to the next.
#[derive(Debug)]
struct Scratch {
    values: Vec<OptionValues>,
    long_name_used: Vec<bool>,
}

impl Scratch {
    fn new(grammar: &CommandGrammar) -> Self {
        Self {
            values: grammar
                .options
                .iter()
                .map(|o| OptionValues::empty(o.kind))
                .collect(),
            long_name_used: vec![true; grammar.options.len()],
        }
    }
}

#[derive(Debug)]
pub(crate) struct Scanner<'g> {
    grammar: &'g CommandGrammar,
    scratch: Scratch,
    committed: Vec<usize>,
    arguments: Vec<String>,
    error: Option<ParseError>,
    active: Option<usize>,
    added_argument: bool,
}

impl<'g> Scanner<'g> {
    pub(crate) fn new(grammar: &'g CommandGrammar) -> Self {
        Self {
            grammar,
            scratch: Scratch::new(grammar),
            committed: Vec::new(),
            arguments: Vec::new(),
            error: None,
            active: None,
            added_argument: false,
        }
    }

    /// Scans `tokens`, skipping the first one (the command name, already
    /// checked by the caller).
    pub(crate) fn scan<S: AsRef<str>>(mut self, tokens: &[S], relaxed: bool) -> CommandLine {
        for token in tokens.iter().skip(1) {
            let token = token.as_ref();
            if let Some(fragment) = token.strip_prefix("--") {
                if self.long_option(token, fragment).is_break() {
                    break;
                }
            } else if let Some(fragment) = token.strip_prefix('-') {
                self.short_option(token, fragment);
            } else {
                self.plain(token);
            }
        }

        if let Some(index) = self.active.take() {
            if relaxed || self.option(index).kind.is_multi_valued() {
                self.commit(index);
            }
        }

        if !relaxed {
            self.check_required();
        }

        self.finish()
    }

    fn option(&self, index: usize) -> &'g OptionSpec {
        &self.grammar.options[index]
    }

    fn display(&self, index: usize) -> String {
        let option = self.option(index);
        display_name(
            &option.name,
            option.short_name,
            self.scratch.long_name_used[index],
        )
    }

    fn record(&mut self, error: ParseError) {
        debug!(command = %self.grammar.name, error = %error, "Recorded parse error");
        self.error = Some(error);
    }

    fn commit(&mut self, index: usize) {
        if !self.committed.contains(&index) {
            debug!(option = %self.option(index).name, "Committed option");
            self.committed.push(index);
        }
    }

    /// Commits an option completed by its own token. Options must not
    /// follow positional values.
    fn commit_option(&mut self, index: usize) {
        self.commit(index);
        if self.added_argument {
            self.record(ParseError::ArgumentToOption);
        }
    }

    fn long_option(&mut self, token: &str, fragment: &str) -> ControlFlow<()> {
        if let Some(index) = self.active {
            if !self.option(index).kind.is_multi_valued() {
                self.record(ParseError::MissingValue {
                    option: self.display(index),
                });
                return ControlFlow::Break(());
            }
            self.active = None;
            self.commit(index);
        }

        match resolve_long(&self.grammar.options, fragment) {
            Some(resolved) => self.accept(fragment, resolved, true),
            None => self.record(ParseError::UnknownOption {
                option: token.to_string(),
            }),
        }
        ControlFlow::Continue(())
    }

    fn short_option(&mut self, token: &str, fragment: &str) {
        if let Some(index) = self.active {
            if !self.option(index).kind.is_multi_valued() {
                // The option keeps waiting; this token is skipped.
                self.record(ParseError::MissingValue {
                    option: self.display(index),
                });
                return;
            }
            self.active = None;
            self.commit(index);
        }

        if fragment.is_empty() {
            self.record(ParseError::DanglingDash);
        } else if fragment.chars().nth(1).is_some() && !fragment.contains('=') {
            self.grouped_flags(fragment);
        } else {
            match resolve_short(&self.grammar.options, fragment) {
                Some(resolved) => self.accept(fragment, resolved, false),
                None => self.record(ParseError::UnknownOption {
                    option: token.to_string(),
                }),
            }
        }
    }

    /// `-abc`: every character must be a zero-value flag.
    fn grouped_flags(&mut self, fragment: &str) {
        for short in fragment.chars() {
            let found = self
                .grammar
                .options
                .iter()
                .position(|o| o.short_name == Some(short));
            match found {
                Some(index) if !self.option(index).has_value => {
                    self.scratch.long_name_used[index] = false;
                    self.scratch.values[index].push("true".to_string());
                    self.commit(index);
                }
                Some(_) => self.record(ParseError::UngroupableOption { option: short }),
                None => self.record(ParseError::UnknownOption {
                    option: format!("-{short}"),
                }),
            }
        }
        self.active = None;
    }

    /// Handles a resolved option token.
    fn accept(&mut self, fragment: &str, resolved: Resolved, long: bool) {
        let Resolved {
            index,
            name_len,
            attached,
        } = resolved;
        self.scratch.long_name_used[index] = long;
        let option = self.option(index);

        if option.is_property() {
            self.property(index, &fragment[name_len..]);
        } else if let Some(value) = attached {
            match option.kind {
                OptionKind::List => {
                    for piece in split_values(&value, option.value_separator) {
                        self.scratch.values[index].push(piece);
                    }
                }
                _ => self.scratch.values[index].push(value),
            }
            self.commit_option(index);
        } else if !option.has_value {
            self.scratch.values[index].push("true".to_string());
            self.commit_option(index);
        } else {
            self.active = Some(index);
        }
    }

    /// `rest` is the text after the option name: `key=value`. A malformed
    /// property leaves the option active.
    fn property(&mut self, index: usize, rest: &str) {
        match rest.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                if value.is_empty() {
                    self.record(ParseError::EmptyPropertyValue {
                        option: self.display(index),
                    });
                    self.active = Some(index);
                } else {
                    self.scratch.values[index].insert(key, value);
                    self.commit_option(index);
                }
            }
            _ => {
                self.record(ParseError::NotAProperty {
                    option: self.display(index),
                });
                self.active = Some(index);
            }
        }
    }

    fn plain(&mut self, token: &str) {
        let Some(index) = self.active else {
            if self.grammar.has_argument() {
                self.arguments.push(token.to_string());
                self.added_argument = true;
            } else {
                self.record(ParseError::ArgumentToCommand);
            }
            return;
        };

        let option = self.option(index);
        if option.kind == OptionKind::List {
            if token.contains(option.value_separator) {
                for piece in split_values(token, option.value_separator) {
                    self.scratch.values[index].push(piece);
                }
                self.active = None;
                self.commit(index);
            } else {
                self.scratch.values[index].push(token.trim().to_string());
            }
        } else {
            self.scratch.values[index].push(token.to_string());
            self.active = None;
            self.commit(index);
        }

        if self.added_argument {
            self.record(ParseError::ArgumentToOption);
        }
    }

    fn check_required(&mut self) {
        let grammar = self.grammar;
        let missing = grammar
            .options
            .iter()
            .enumerate()
            .find(|(index, option)| option.required && !self.committed.contains(index));
        if let Some((_, option)) = missing {
            self.record(ParseError::RequiredOption {
                option: option.display_name(),
            });
        }
    }

    fn finish(self) -> CommandLine {
        let Self {
            grammar,
            mut scratch,
            committed,
            arguments,
            error,
            ..
        } = self;

        let options = committed
            .into_iter()
            .map(|index| {
                ParsedOption::new(
                    &grammar.options[index],
                    std::mem::take(&mut scratch.values[index]),
                    scratch.long_name_used[index],
                )
            })
            .collect();

        let argument = match &grammar.argument {
            Some(spec) if !arguments.is_empty() => Some(ParsedArgument::new(&spec.name, arguments)),
            _ => None,
        };

        CommandLine::new(&grammar.name, options, argument, error)
    }
}
