//! Binding parsed values onto a target value.
//!
//! A [`Binder`] is a table of fields registered once per target type. Each
//! field names an option (or the positional argument), knows how to reach
//! its place in the target through an accessor function, and carries a
//! converter and an optional validator.
//!
//! # Example
//!
//! ```
//! use optline_core::*;
//! use optline_parser::bind::{Binder, Field, parse};
//! use optline_parser::CommandLineParser;
//!
//! #[derive(Default)]
//! struct Cmd {
//!     level: Option<u32>,
//!     verbose: bool,
//!     files: Vec<String>,
//! }
//!
//! let parser = CommandLineParser::new(
//!     CommandGrammar::new("cmd")
//!         .with_option(OptionSpec::new("level"))
//!         .with_option(OptionSpec::flag("verbose"))
//!         .with_argument(ArgumentSpec::new("files")),
//! )
//! .unwrap();
//!
//! let binder = Binder::new()
//!     .field(
//!         Field::optional("level", |c: &mut Cmd| &mut c.level, parse)
//!             .validator(|v: &u32| if *v <= 10 { Ok(()) } else { Err("too high") }),
//!     )
//!     .field(Field::scalar("verbose", |c: &mut Cmd| &mut c.verbose, parse))
//!     .argument(Field::list("files", |c: &mut Cmd| &mut c.files, parse));
//!
//! let mut cmd = Cmd { verbose: true, ..Default::default() };
//! parser
//!     .populate(&binder, &mut cmd, &["cmd", "--level", "3", "a.txt"], true)
//!     .unwrap();
//! assert_eq!(cmd.level, Some(3));
//! assert!(!cmd.verbose);
//! assert_eq!(cmd.files, ["a.txt"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use optline_core::CommandGrammar;
use tracing::debug;

use crate::error::BindError;
use crate::result::CommandLine;
use crate::values::OptionValues;

/// The default converter: [`FromStr`].
pub fn parse<V: FromStr>(raw: &str) -> Result<V, V::Err> {
    raw.parse()
}

/// Collections a list field can be bound to.
pub trait FromValues: Default {
    /// Element type.
    type Item;

    /// Builds the collection from converted values.
    fn from_values(items: Vec<Self::Item>) -> Self;
}

impl<V> FromValues for Vec<V> {
    type Item = V;

    fn from_values(items: Vec<V>) -> Self {
        items
    }
}

impl<V: Ord> FromValues for BTreeSet<V> {
    type Item = V;

    fn from_values(items: Vec<V>) -> Self {
        items.into_iter().collect()
    }
}

impl<V: Eq + Hash> FromValues for HashSet<V> {
    type Item = V;

    fn from_values(items: Vec<V>) -> Self {
        items.into_iter().collect()
    }
}

/// Maps a property field can be bound to.
pub trait FromPairs: Default {
    /// Key type.
    type Key;
    /// Value type.
    type Value;

    /// Builds the map from converted pairs.
    fn from_pairs(pairs: Vec<(Self::Key, Self::Value)>) -> Self;
}

impl<K: Ord, V> FromPairs for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Eq + Hash, V> FromPairs for HashMap<K, V> {
    type Key = K;
    type Value = V;

    fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

type Converter<V> = Box<dyn Fn(&str) -> Result<V, String> + Send + Sync>;
type Validator<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;
type Store<T, V> = Box<dyn Fn(&mut T, Collected<V>) -> Result<(), StoreError> + Send + Sync>;
type Reset<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Converted values handed to a field's store.
enum Collected<V> {
    Values(Vec<V>),
    Pairs(Vec<(String, V)>),
}

enum StoreError {
    Mismatch(&'static str),
    Key { key: String, message: String },
}

/// A typed field definition; registered on a [`Binder`] with
/// [`Binder::field`] or [`Binder::argument`].
pub struct Field<T, V> {
    name: String,
    convert: Converter<V>,
    validator: Option<Validator<V>>,
    store: Store<T, V>,
    reset: Reset<T>,
}

fn boxed_converter<V, E, C>(convert: C) -> Converter<V>
where
    C: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
    E: Display,
{
    Box::new(move |raw: &str| convert(raw).map_err(|e| e.to_string()))
}

impl<T: 'static, V: 'static> Field<T, V> {
    /// A field holding a plain value. Reset assigns `V::default()`: `false`,
    /// `0`, or an empty string.
    pub fn scalar<E, C>(name: &str, place: fn(&mut T) -> &mut V, convert: C) -> Self
    where
        V: Default,
        C: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            name: name.to_string(),
            convert: boxed_converter(convert),
            validator: None,
            store: Box::new(move |target: &mut T, collected: Collected<V>| match collected {
                Collected::Values(values) => {
                    *place(target) = values.into_iter().next().unwrap_or_default();
                    Ok(())
                }
                Collected::Pairs(_) => Err(StoreError::Mismatch("a single value")),
            }),
            reset: Box::new(move |target: &mut T| *place(target) = V::default()),
        }
    }

    /// A field holding an optional value. Reset assigns `None`.
    pub fn optional<E, C>(name: &str, place: fn(&mut T) -> &mut Option<V>, convert: C) -> Self
    where
        C: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            name: name.to_string(),
            convert: boxed_converter(convert),
            validator: None,
            store: Box::new(move |target: &mut T, collected: Collected<V>| match collected {
                Collected::Values(values) => {
                    *place(target) = values.into_iter().next();
                    Ok(())
                }
                Collected::Pairs(_) => Err(StoreError::Mismatch("a single value")),
            }),
            reset: Box::new(move |target: &mut T| *place(target) = None),
        }
    }

    /// Registers a validator run on every converted value.
    pub fn validator<E, F>(mut self, validate: F) -> Self
    where
        F: Fn(&V) -> Result<(), E> + Send + Sync + 'static,
        E: Display,
    {
        self.validator = Some(Box::new(move |value: &V| {
            validate(value).map_err(|e| e.to_string())
        }));
        self
    }

    fn into_binding(self) -> Binding<T> {
        let Self {
            name,
            convert,
            validator,
            store,
            reset,
        } = self;
        let option = name.clone();

        let assign = move |target: &mut T,
                           values: &OptionValues,
                           validate: bool|
              -> Result<(), BindError> {
            let check = |raw: &str| -> Result<V, BindError> {
                let value = convert(raw).map_err(|message| BindError::Conversion {
                    option: option.clone(),
                    value: raw.to_string(),
                    message,
                })?;
                if let (true, Some(validator)) = (validate, &validator) {
                    validator(&value).map_err(|message| BindError::Validation {
                        option: option.clone(),
                        message,
                    })?;
                }
                Ok(value)
            };

            let collected = match values {
                OptionValues::Map(map) => Collected::Pairs(
                    map.iter()
                        .map(|(key, value)| check(value).map(|value| (key.clone(), value)))
                        .collect::<Result<_, BindError>>()?,
                ),
                other => Collected::Values(
                    other
                        .as_slice()
                        .iter()
                        .map(|value| check(value))
                        .collect::<Result<_, _>>()?,
                ),
            };

            store(target, collected).map_err(|e| match e {
                StoreError::Mismatch(expected) => BindError::Mismatch {
                    option: option.clone(),
                    expected,
                },
                StoreError::Key { key, message } => BindError::Conversion {
                    option: option.clone(),
                    value: key,
                    message,
                },
            })
        };

        Binding {
            name,
            assign: Box::new(assign),
            reset,
        }
    }
}

impl<T: 'static, I: 'static> Field<T, I> {
    /// A field holding a collection (`Vec`, `BTreeSet`, `HashSet`). Reset
    /// assigns an empty collection.
    pub fn list<L, E, C>(name: &str, place: fn(&mut T) -> &mut L, convert: C) -> Self
    where
        L: FromValues<Item = I> + 'static,
        C: Fn(&str) -> Result<I, E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            name: name.to_string(),
            convert: boxed_converter(convert),
            validator: None,
            store: Box::new(move |target: &mut T, collected: Collected<I>| match collected {
                Collected::Values(values) => {
                    *place(target) = L::from_values(values);
                    Ok(())
                }
                Collected::Pairs(_) => Err(StoreError::Mismatch("a list of values")),
            }),
            reset: Box::new(move |target: &mut T| *place(target) = L::default()),
        }
    }

    /// A field holding properties (`BTreeMap`, `HashMap`). Keys are parsed
    /// with [`FromStr`]; `convert` applies to the values. Reset assigns an
    /// empty map.
    pub fn map<M, E, C>(name: &str, place: fn(&mut T) -> &mut M, convert: C) -> Self
    where
        M: FromPairs<Value = I> + 'static,
        M::Key: FromStr,
        <M::Key as FromStr>::Err: Display,
        C: Fn(&str) -> Result<I, E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            name: name.to_string(),
            convert: boxed_converter(convert),
            validator: None,
            store: Box::new(move |target: &mut T, collected: Collected<I>| -> Result<(), StoreError> {
                let Collected::Pairs(pairs) = collected else {
                    return Err(StoreError::Mismatch("key=value properties"));
                };
                let pairs = pairs
                    .into_iter()
                    .map(|(key, value)| match key.parse::<M::Key>() {
                        Ok(parsed) => Ok((parsed, value)),
                        Err(e) => Err(StoreError::Key {
                            key,
                            message: e.to_string(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                *place(target) = M::from_pairs(pairs);
                Ok(())
            }),
            reset: Box::new(move |target: &mut T| *place(target) = M::default()),
        }
    }
}

type Assign<T> = Box<dyn Fn(&mut T, &OptionValues, bool) -> Result<(), BindError> + Send + Sync>;

struct Binding<T> {
    name: String,
    assign: Assign<T>,
    reset: Reset<T>,
}

/// Table of field bindings for a target type `T`.
pub struct Binder<T> {
    fields: Vec<Binding<T>>,
    argument: Option<Binding<T>>,
}

impl<T> std::fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field(
                "fields",
                &self.fields.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            )
            .field("argument", &self.argument.as_ref().map(|b| b.name.as_str()))
            .finish()
    }
}

impl<T: 'static> Default for Binder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Binder<T> {
    /// Creates an empty binder.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            argument: None,
        }
    }

    /// Registers a field for the option with the same long name.
    pub fn field<V: 'static>(mut self, field: Field<T, V>) -> Self {
        self.fields.push(field.into_binding());
        self
    }

    /// Registers the field receiving the positional argument.
    pub fn argument<V: 'static>(mut self, field: Field<T, V>) -> Self {
        self.argument = Some(field.into_binding());
        self
    }

    /// Binds `line` onto `target`.
    ///
    /// Options present in `line` are converted, validated (when `validate`
    /// is set) and assigned; absent options fall back to their declared
    /// defaults, or are reset to their zero value. The first conversion or
    /// validation failure stops binding; fields already assigned keep their
    /// new values.
    ///
    /// # Errors
    ///
    /// [`BindError::UnknownField`] if a registered field names nothing in
    /// `grammar` (checked before anything is assigned), or the first
    /// conversion, validation or shape error.
    pub fn bind(
        &self,
        grammar: &CommandGrammar,
        line: &CommandLine,
        target: &mut T,
        validate: bool,
    ) -> Result<(), BindError> {
        self.check(grammar)?;

        for option in &grammar.options {
            let Some(field) = self.fields.iter().find(|f| f.name == option.name) else {
                debug!(option = %option.name, "No field registered, skipping");
                continue;
            };

            match line.options().iter().find(|p| p.name() == option.name) {
                Some(parsed) => {
                    debug!(option = %option.name, "Binding parsed value");
                    (field.assign)(target, parsed.values(), validate)?;
                }
                None if !option.default_values.is_empty() => {
                    debug!(option = %option.name, "Binding default value");
                    let defaults = OptionValues::from_defaults(option.kind, &option.default_values);
                    (field.assign)(target, &defaults, validate)?;
                }
                None => (field.reset)(target),
            }
        }

        if let Some(field) = &self.argument {
            match line.argument() {
                Some(argument) if !argument.values().is_empty() => {
                    let values = OptionValues::List(argument.values().to_vec());
                    (field.assign)(target, &values, validate)?;
                }
                _ => (field.reset)(target),
            }
        }

        Ok(())
    }

    fn check(&self, grammar: &CommandGrammar) -> Result<(), BindError> {
        if let Some(field) = self
            .fields
            .iter()
            .find(|f| grammar.find_long(&f.name).is_none())
        {
            return Err(BindError::UnknownField(field.name.clone()));
        }
        if let Some(field) = &self.argument {
            if grammar.argument.as_ref().map(|a| a.name.as_str()) != Some(field.name.as_str()) {
                return Err(BindError::UnknownField(field.name.clone()));
            }
        }
        Ok(())
    }
}
